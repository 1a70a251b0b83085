//! Mock object store for testing.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::source::{ObjectStore, SourceError, SourceObject};

/// A recorded rename for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedRename {
    pub from: String,
    pub to: String,
}

/// In-memory implementation of the `ObjectStore` trait.
///
/// Provides controllable behavior for testing:
/// - Seed objects with `put`
/// - Track renames for assertions
/// - Inject rename failures per key
#[derive(Clone, Default)]
pub struct MockObjectStore {
    objects: Arc<RwLock<BTreeMap<String, String>>>,
    renames: Arc<RwLock<Vec<RecordedRename>>>,
    failing_renames: Arc<RwLock<HashSet<String>>>,
}

impl MockObjectStore {
    /// Create an empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object.
    pub async fn put(&self, key: &str, content: &str) {
        self.objects
            .write()
            .await
            .insert(key.to_string(), content.to_string());
    }

    /// Whether an object exists under this key.
    pub async fn contains(&self, key: &str) -> bool {
        self.objects.read().await.contains_key(key)
    }

    /// All keys currently in the store.
    pub async fn keys(&self) -> Vec<String> {
        self.objects.read().await.keys().cloned().collect()
    }

    /// All renames performed so far.
    pub async fn recorded_renames(&self) -> Vec<RecordedRename> {
        self.renames.read().await.clone()
    }

    /// Make every rename of this key fail until cleared.
    pub async fn fail_rename_for(&self, key: &str) {
        self.failing_renames.write().await.insert(key.to_string());
    }

    /// Clear injected rename failures.
    pub async fn clear_rename_failures(&self) {
        self.failing_renames.write().await.clear();
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list(&self, prefix: &str) -> Result<Vec<SourceObject>, SourceError> {
        let objects = self.objects.read().await;
        Ok(objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, content)| SourceObject {
                key: key.clone(),
                size_bytes: content.len() as u64,
            })
            .collect())
    }

    async fn read(&self, key: &str) -> Result<String, SourceError> {
        let objects = self.objects.read().await;
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| SourceError::ObjectNotFound {
                key: key.to_string(),
            })
    }

    async fn rename(&self, from: &str, to: &str) -> Result<(), SourceError> {
        if self.failing_renames.read().await.contains(from) {
            return Err(SourceError::Io(std::io::Error::other(
                "injected rename failure",
            )));
        }

        let mut objects = self.objects.write().await;
        let content = objects
            .remove(from)
            .ok_or_else(|| SourceError::ObjectNotFound {
                key: from.to_string(),
            })?;
        objects.insert(to.to_string(), content);

        self.renames.write().await.push(RecordedRename {
            from: from.to_string(),
            to: to.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_list_read() {
        let store = MockObjectStore::new();
        store.put("landing/orders/a.json", "{}").await;
        store.put("other/b.json", "{}").await;

        let listed = store.list("landing/").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(store.read("landing/orders/a.json").await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_rename_records_and_moves() {
        let store = MockObjectStore::new();
        store.put("a.json", "x").await;

        store.rename("a.json", "b.json").await.unwrap();
        assert!(!store.contains("a.json").await);
        assert!(store.contains("b.json").await);

        let renames = store.recorded_renames().await;
        assert_eq!(renames.len(), 1);
        assert_eq!(renames[0].from, "a.json");
    }

    #[tokio::test]
    async fn test_injected_rename_failure() {
        let store = MockObjectStore::new();
        store.put("a.json", "x").await;
        store.fail_rename_for("a.json").await;

        assert!(store.rename("a.json", "b.json").await.is_err());
        assert!(store.contains("a.json").await);

        store.clear_rename_failures().await;
        assert!(store.rename("a.json", "b.json").await.is_ok());
    }
}
