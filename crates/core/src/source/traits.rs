//! Trait definitions for the source module.

use async_trait::async_trait;

use super::error::SourceError;
use super::types::SourceObject;

/// A store of source objects addressable by slash-separated keys.
///
/// `rename` must move the object in one step: after a successful call the
/// object is visible only under the new key. This is what makes archival
/// safe against double-processing.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Returns the name of this store implementation.
    fn name(&self) -> &str;

    /// Lists objects whose key starts with `prefix`, in key order.
    async fn list(&self, prefix: &str) -> Result<Vec<SourceObject>, SourceError>;

    /// Reads an object's full contents as UTF-8 text.
    async fn read(&self, key: &str) -> Result<String, SourceError>;

    /// Renames an object to a new key, creating intermediate namespaces.
    async fn rename(&self, from: &str, to: &str) -> Result<(), SourceError>;
}
