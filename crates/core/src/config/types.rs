//! Configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scheduler::SchedulerConfig;
use crate::sensor::SensorConfig;

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where the warehouse and findings databases live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file path.
    pub path: PathBuf,
}

/// The source object namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Root directory of the object namespace.
    pub root: PathBuf,

    /// Prefix new order objects land under.
    #[serde(default = "default_landing_prefix")]
    pub landing_prefix: String,

    /// Prefix archived objects are moved under, namespaced per run.
    #[serde(default = "default_archive_prefix")]
    pub archive_prefix: String,

    /// Filename pattern an object must match to be part of a load set.
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

fn default_landing_prefix() -> String {
    "landing/orders/".to_string()
}

fn default_archive_prefix() -> String {
    "archive/".to_string()
}

fn default_pattern() -> String {
    r"\.json$".to_string()
}

/// HTTP server binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Configuration view safe to expose over the API.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub source: SourceConfig,
    pub sensor: SensorConfig,
    pub scheduler: SchedulerConfig,
    pub server: ServerConfig,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            source: config.source.clone(),
            sensor: config.sensor.clone(),
            scheduler: config.scheduler.clone(),
            server: config.server.clone(),
        }
    }
}
