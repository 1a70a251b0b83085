//! Availability sensor.
//!
//! Polls the landing prefix until at least one object matching the filename
//! pattern exists, or the deadline passes. Read-only; safe to re-poll
//! indefinitely.

mod config;

pub use config::*;

use regex_lite::Regex;
use thiserror::Error;
use tokio::time::{sleep, Duration, Instant};
use tracing::debug;

use crate::source::{ObjectStore, SourceError, SourceObject};

/// Errors from the availability sensor.
#[derive(Debug, Error)]
pub enum SensorError {
    /// No matching object appeared before the deadline.
    #[error("no objects matching pattern under {prefix} after {timeout_ms}ms")]
    Timeout { prefix: String, timeout_ms: u64 },

    /// Listing the source failed.
    #[error("source error: {0}")]
    Source(#[from] SourceError),
}

/// Bounded-poll sensor over an object store prefix.
pub struct AvailabilitySensor {
    config: SensorConfig,
}

impl AvailabilitySensor {
    pub fn new(config: SensorConfig) -> Self {
        Self { config }
    }

    /// Polls until at least one object under `prefix` matches `pattern`.
    ///
    /// Returns the matching objects from the poll that succeeded; this
    /// snapshot is the run's load set. Objects arriving after it are left
    /// for the next run.
    pub async fn wait_for_objects(
        &self,
        store: &dyn ObjectStore,
        prefix: &str,
        pattern: &Regex,
    ) -> Result<Vec<SourceObject>, SensorError> {
        let deadline = Instant::now() + Duration::from_millis(self.config.timeout_ms);
        let poke_interval = Duration::from_millis(self.config.poke_interval_ms);

        loop {
            let matches: Vec<SourceObject> = store
                .list(prefix)
                .await?
                .into_iter()
                .filter(|obj| pattern.is_match(&obj.key))
                .collect();

            if !matches.is_empty() {
                debug!(prefix, count = matches.len(), "sensor found matching objects");
                return Ok(matches);
            }

            if Instant::now() + poke_interval > deadline {
                return Err(SensorError::Timeout {
                    prefix: prefix.to_string(),
                    timeout_ms: self.config.timeout_ms,
                });
            }

            debug!(prefix, "no matching objects yet, re-polling");
            sleep(poke_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockObjectStore;

    fn json_pattern() -> Regex {
        Regex::new(r"\.json$").unwrap()
    }

    fn quick_sensor() -> AvailabilitySensor {
        AvailabilitySensor::new(SensorConfig {
            poke_interval_ms: 10,
            timeout_ms: 200,
        })
    }

    #[tokio::test]
    async fn test_immediate_match() {
        let store = MockObjectStore::new();
        store.put("landing/orders/a.json", "{}").await;

        let sensor = quick_sensor();
        let objects = sensor
            .wait_for_objects(&store, "landing/orders/", &json_pattern())
            .await
            .unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].key, "landing/orders/a.json");
    }

    #[tokio::test]
    async fn test_non_matching_objects_ignored() {
        let store = MockObjectStore::new();
        store.put("landing/orders/readme.txt", "hi").await;

        let sensor = quick_sensor();
        let result = sensor
            .wait_for_objects(&store, "landing/orders/", &json_pattern())
            .await;
        assert!(matches!(result, Err(SensorError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_timeout_on_empty_prefix() {
        let store = MockObjectStore::new();

        let sensor = quick_sensor();
        let result = sensor
            .wait_for_objects(&store, "landing/orders/", &json_pattern())
            .await;
        assert!(matches!(result, Err(SensorError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_object_arriving_mid_poll() {
        let store = MockObjectStore::new();
        let sensor = AvailabilitySensor::new(SensorConfig {
            poke_interval_ms: 10,
            timeout_ms: 1000,
        });

        let writer = store.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            writer.put("landing/orders/late.json", "{}").await;
        });

        let objects = sensor
            .wait_for_objects(&store, "landing/orders/", &json_pattern())
            .await
            .unwrap();
        assert_eq!(objects.len(), 1);
    }
}
