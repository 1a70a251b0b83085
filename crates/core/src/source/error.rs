//! Error types for the source module.

use thiserror::Error;

/// Errors from object store operations.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Object does not exist.
    #[error("object not found: {key}")]
    ObjectNotFound { key: String },

    /// Key escapes the store namespace or is otherwise malformed.
    #[error("invalid object key: {key}")]
    InvalidKey { key: String },

    /// Underlying I/O failure.
    #[error("object store I/O error: {0}")]
    Io(#[from] std::io::Error),
}
