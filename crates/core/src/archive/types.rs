//! Types for the archive module.

use serde::{Deserialize, Serialize};

/// An object that was successfully relocated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchivedObject {
    /// Key the object was consumed from.
    pub from: String,
    /// Key the object now lives under.
    pub to: String,
}

/// An object that could not be relocated this run.
///
/// The object is still in the landing namespace and will be picked up (and
/// reprocessed at most once more) by the next run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveFailure {
    pub key: String,
    pub error: String,
}

/// Outcome of one archival pass. Never rolled back: completed moves stay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveOutcome {
    /// Timestamp namespace shared by every move in this run.
    pub run_stamp: String,
    pub archived: Vec<ArchivedObject>,
    pub failed: Vec<ArchiveFailure>,
}

impl ArchiveOutcome {
    /// True when every object in the load set was relocated.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_complete() {
        let outcome = ArchiveOutcome {
            run_stamp: "20240101_100000".to_string(),
            archived: vec![],
            failed: vec![],
        };
        assert!(outcome.is_complete());

        let outcome = ArchiveOutcome {
            run_stamp: "20240101_100000".to_string(),
            archived: vec![],
            failed: vec![ArchiveFailure {
                key: "landing/orders/a.json".to_string(),
                error: "boom".to_string(),
            }],
        };
        assert!(!outcome.is_complete());
    }
}
