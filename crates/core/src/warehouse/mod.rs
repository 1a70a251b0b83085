//! Durable stores: staging, facts, hourly aggregates, dimensions.
//!
//! The pipeline relies on four capabilities here: append (staging),
//! existence check + conditional insert (facts), upsert by key (aggregates)
//! and read-only lookups (dimensions). All four are served by one SQLite
//! database in production.

mod error;
mod sqlite;
mod traits;
mod types;

pub use error::*;
pub use sqlite::*;
pub use traits::*;
pub use types::*;
