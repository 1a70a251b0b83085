//! Append-only data-quality findings log.
//!
//! A finding records a detected data issue; it is data, not a pipeline
//! failure. Findings are never mutated or deleted.

mod sqlite;
mod store;
mod types;

pub use sqlite::*;
pub use store::*;
pub use types::*;
