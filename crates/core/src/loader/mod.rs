//! Batch loader.
//!
//! Reads every object in the load set, validates each NDJSON line against
//! the Order schema and appends the records to staging. One malformed line
//! fails the whole run: a partial or garbled append is worse than a retry.
//! The append itself is at-least-once; the quality gate and fact merge
//! tolerate the resulting duplicates.

use thiserror::Error;
use tracing::{debug, info};

use crate::model::Order;
use crate::source::{ObjectStore, SourceError, SourceObject};
use crate::warehouse::{StagingStore, WarehouseError};

/// Errors from the batch loader. All of them abort the run.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// A record did not conform to the Order schema.
    #[error("schema violation in {key} line {line}: {message}")]
    Schema {
        key: String,
        line: usize,
        message: String,
    },

    /// An object could not be read.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Records could not be appended to staging.
    #[error("warehouse error: {0}")]
    Warehouse(#[from] WarehouseError),
}

/// Summary of a completed load.
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// Objects read from the load set.
    pub objects_read: usize,
    /// Records appended to staging.
    pub records_staged: usize,
}

/// Loads the run's load set into the staging store.
pub struct BatchLoader;

impl BatchLoader {
    /// Reads and stages every record in the load set.
    ///
    /// The load set is the caller's snapshot; objects arriving after it was
    /// taken are not part of this run. All objects are parsed before
    /// anything is appended, so a schema failure stages nothing.
    pub async fn load(
        store: &dyn ObjectStore,
        staging: &dyn StagingStore,
        load_set: &[SourceObject],
    ) -> Result<LoadReport, LoaderError> {
        let mut records: Vec<Order> = Vec::new();

        for object in load_set {
            let content = store.read(&object.key).await?;
            let before = records.len();
            Self::parse_object(&object.key, &content, &mut records)?;
            debug!(
                key = %object.key,
                records = records.len() - before,
                "parsed landing object"
            );
        }

        let records_staged = if records.is_empty() {
            0
        } else {
            staging.append(&records)?
        };

        info!(
            objects = load_set.len(),
            records = records_staged,
            "load set staged"
        );

        Ok(LoadReport {
            objects_read: load_set.len(),
            records_staged,
        })
    }

    /// Parses one NDJSON object, appending records to `out`.
    fn parse_object(key: &str, content: &str, out: &mut Vec<Order>) -> Result<(), LoaderError> {
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let order: Order =
                serde_json::from_str(trimmed).map_err(|e| LoaderError::Schema {
                    key: key.to_string(),
                    line: idx + 1,
                    message: e.to_string(),
                })?;
            out.push(order);
        }
        Ok(())
    }
}
