//! Scheduler configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the recurring run trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Enable/disable the recurring trigger.
    /// When disabled, runs must be triggered manually via the API.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Interval between scheduled runs (milliseconds).
    #[serde(default = "default_interval")]
    pub interval_ms: u64,

    /// How many run reports to keep in history.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_enabled() -> bool {
    true
}

fn default_interval() -> u64 {
    900_000 // 15 minutes
}

fn default_history_limit() -> usize {
    100
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_ms: default_interval(),
            history_limit: default_history_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert!(config.enabled);
        assert_eq!(config.interval_ms, 900_000);
        assert_eq!(config.history_limit, 100);
    }

    #[test]
    fn test_deserialize_minimal() {
        let toml = r#"
            interval_ms = 60000
        "#;
        let config: SchedulerConfig = toml::from_str(toml).unwrap();
        assert!(config.enabled);
        assert_eq!(config.interval_ms, 60000);
        assert_eq!(config.history_limit, 100);
    }
}
