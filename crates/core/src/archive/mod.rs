//! Archival of consumed input objects.
//!
//! After a run has merged its load set, each object is renamed into an
//! archive prefix namespaced by the run's timestamp, which removes it from
//! every future sensor and loader pass. Moves are renames, never
//! copy-then-delete.

mod archiver;
mod types;

pub use archiver::*;
pub use types::*;
