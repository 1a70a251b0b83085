//! Sensor configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the availability sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// How often to re-list the landing prefix (milliseconds).
    #[serde(default = "default_poke_interval")]
    pub poke_interval_ms: u64,

    /// Hard deadline for a single wait (milliseconds). The sensor never
    /// blocks past this.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_poke_interval() -> u64 {
    60_000 // 1 minute
}

fn default_timeout() -> u64 {
    600_000 // 10 minutes
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            poke_interval_ms: default_poke_interval(),
            timeout_ms: default_timeout(),
        }
    }
}
