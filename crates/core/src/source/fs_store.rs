//! Filesystem-backed object store.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use super::error::SourceError;
use super::traits::ObjectStore;
use super::types::SourceObject;

/// Object store rooted at a local directory.
///
/// Keys map to paths under the root; listing walks the tree under the prefix
/// and rename maps to `fs::rename`, which is atomic on a single filesystem.
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Creates a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves a key to a path under the root, rejecting traversal.
    fn resolve(&self, key: &str) -> Result<PathBuf, SourceError> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
        if key.is_empty() || escapes {
            return Err(SourceError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }

    /// Converts an absolute path back into a store key.
    fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();
        Some(parts.join("/"))
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    fn name(&self) -> &str {
        "fs"
    }

    async fn list(&self, prefix: &str) -> Result<Vec<SourceObject>, SourceError> {
        // The prefix may name a directory that does not exist yet; that is an
        // empty listing, not an error.
        let start = self.root.join(prefix.trim_end_matches('/'));
        if !start.exists() {
            return Ok(Vec::new());
        }

        let mut objects = Vec::new();
        let mut pending = vec![start];
        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let meta = entry.metadata().await?;
                if meta.is_dir() {
                    pending.push(path);
                } else if let Some(key) = self.key_for(&path) {
                    if key.starts_with(prefix) {
                        objects.push(SourceObject {
                            key,
                            size_bytes: meta.len(),
                        });
                    }
                }
            }
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }

    async fn read(&self, key: &str) -> Result<String, SourceError> {
        let path = self.resolve(key)?;
        fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::ObjectNotFound {
                    key: key.to_string(),
                }
            } else {
                SourceError::Io(e)
            }
        })
    }

    async fn rename(&self, from: &str, to: &str) -> Result<(), SourceError> {
        let from_path = self.resolve(from)?;
        let to_path = self.resolve(to)?;

        if let Some(parent) = to_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::rename(&from_path, &to_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::ObjectNotFound {
                    key: from.to_string(),
                }
            } else {
                SourceError::Io(e)
            }
        })
    }
}
