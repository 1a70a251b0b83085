//! Source object store abstraction.
//!
//! The landing namespace holds newline-delimited JSON order files. The
//! pipeline only needs three capabilities from it: list by prefix, read an
//! object, and rename an object (the archival primitive).

mod error;
mod fs_store;
mod traits;
mod types;

pub use error::*;
pub use fs_store::*;
pub use traits::*;
pub use types::*;
