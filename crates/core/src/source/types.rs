//! Types for the source module.

use serde::{Deserialize, Serialize};

/// An object in the source namespace.
///
/// Keys are slash-separated paths relative to the store root, e.g.
/// `landing/orders/orders_20240101.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceObject {
    /// Store-relative key.
    pub key: String,
    /// Object size in bytes.
    pub size_bytes: u64,
}
