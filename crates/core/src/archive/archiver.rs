//! Rename-based archiver implementation.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::source::{ObjectStore, SourceObject};

use super::types::{ArchiveFailure, ArchiveOutcome, ArchivedObject};

/// Relocates consumed load-set objects into a run-stamped archive prefix.
pub struct Archiver {
    landing_prefix: String,
    archive_prefix: String,
}

impl Archiver {
    pub fn new(landing_prefix: impl Into<String>, archive_prefix: impl Into<String>) -> Self {
        Self {
            landing_prefix: landing_prefix.into(),
            archive_prefix: archive_prefix.into(),
        }
    }

    /// Formats the timestamp namespace shared by one run's moves.
    pub fn run_stamp(at: DateTime<Utc>) -> String {
        at.format("%Y%m%d_%H%M%S").to_string()
    }

    /// Moves every object in the load set under `archive/<stamp>/`.
    ///
    /// Failures are collected, not propagated: objects moved before a
    /// failure stay archived, and failed objects stay in landing for the
    /// next run. The caller downgrades the run to degraded when the outcome
    /// is incomplete.
    pub async fn archive(
        &self,
        store: &dyn ObjectStore,
        load_set: &[SourceObject],
        run_stamp: &str,
    ) -> ArchiveOutcome {
        let mut archived = Vec::new();
        let mut failed = Vec::new();

        for object in load_set {
            let destination = self.destination_key(&object.key, run_stamp);
            match store.rename(&object.key, &destination).await {
                Ok(()) => {
                    info!(from = %object.key, to = %destination, "archived object");
                    archived.push(ArchivedObject {
                        from: object.key.clone(),
                        to: destination,
                    });
                }
                Err(e) => {
                    warn!(key = %object.key, error = %e, "failed to archive object");
                    failed.push(ArchiveFailure {
                        key: object.key.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        ArchiveOutcome {
            run_stamp: run_stamp.to_string(),
            archived,
            failed,
        }
    }

    /// Archive key for a landing key: the landing prefix is replaced by the
    /// stamped archive prefix, keeping any remaining sub-path.
    fn destination_key(&self, key: &str, run_stamp: &str) -> String {
        let remainder = key.strip_prefix(&self.landing_prefix).unwrap_or(key);
        format!("{}{}/{}", self.archive_prefix, run_stamp, remainder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockObjectStore;

    fn archiver() -> Archiver {
        Archiver::new("landing/orders/", "archive/")
    }

    fn object(key: &str) -> SourceObject {
        SourceObject {
            key: key.to_string(),
            size_bytes: 2,
        }
    }

    #[test]
    fn test_run_stamp_format() {
        let at: DateTime<Utc> = "2024-01-01T10:00:00Z".parse().unwrap();
        assert_eq!(Archiver::run_stamp(at), "20240101_100000");
    }

    #[test]
    fn test_destination_key() {
        let archiver = archiver();
        assert_eq!(
            archiver.destination_key("landing/orders/a.json", "20240101_100000"),
            "archive/20240101_100000/a.json"
        );
    }

    #[tokio::test]
    async fn test_archive_moves_every_object() {
        let store = MockObjectStore::new();
        store.put("landing/orders/a.json", "{}").await;
        store.put("landing/orders/b.json", "{}").await;

        let load_set = vec![object("landing/orders/a.json"), object("landing/orders/b.json")];
        let outcome = archiver()
            .archive(&store, &load_set, "20240101_100000")
            .await;

        assert!(outcome.is_complete());
        assert_eq!(outcome.archived.len(), 2);
        assert!(store.list("landing/orders/").await.unwrap().is_empty());
        assert_eq!(store.list("archive/20240101_100000/").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_completed_moves() {
        let store = MockObjectStore::new();
        store.put("landing/orders/a.json", "{}").await;
        store.put("landing/orders/b.json", "{}").await;
        store.fail_rename_for("landing/orders/b.json").await;

        let load_set = vec![object("landing/orders/a.json"), object("landing/orders/b.json")];
        let outcome = archiver()
            .archive(&store, &load_set, "20240101_100000")
            .await;

        assert!(!outcome.is_complete());
        assert_eq!(outcome.archived.len(), 1);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].key, "landing/orders/b.json");

        // a.json stays archived; b.json remains for the next run.
        assert_eq!(store.list("archive/20240101_100000/").await.unwrap().len(), 1);
        let remaining = store.list("landing/orders/").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].key, "landing/orders/b.json");
    }
}
