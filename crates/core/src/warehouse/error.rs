//! Error type for warehouse operations.

use thiserror::Error;

/// Errors from the staging/fact/aggregate/dimension stores.
///
/// Any of these during an idempotency-critical operation (the fact-store
/// existence check in particular) is fatal for the run: continuing would
/// risk duplicate insertion.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// Database error.
    #[error("warehouse database error: {0}")]
    Database(String),

    /// Row could not be serialized or deserialized.
    #[error("warehouse serialization error: {0}")]
    Serialization(String),
}
