//! Configuration validation.

use regex_lite::Regex;

use super::{Config, ConfigError};

/// Validates a loaded configuration before anything is constructed from it.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.database.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "database.path must not be empty".to_string(),
        ));
    }

    if config.source.root.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "source.root must not be empty".to_string(),
        ));
    }

    for (name, prefix) in [
        ("source.landing_prefix", &config.source.landing_prefix),
        ("source.archive_prefix", &config.source.archive_prefix),
    ] {
        if prefix.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} must not be empty",
                name
            )));
        }
        if !prefix.ends_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "{} must end with '/'",
                name
            )));
        }
    }

    if config.source.landing_prefix.starts_with(&config.source.archive_prefix) {
        return Err(ConfigError::ValidationError(
            "landing prefix must not live under the archive prefix".to_string(),
        ));
    }

    if let Err(e) = Regex::new(&config.source.pattern) {
        return Err(ConfigError::ValidationError(format!(
            "source.pattern is not a valid regex: {}",
            e
        )));
    }

    if config.sensor.poke_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "sensor.poke_interval_ms must be greater than zero".to_string(),
        ));
    }
    if config.sensor.timeout_ms < config.sensor.poke_interval_ms {
        return Err(ConfigError::ValidationError(
            "sensor.timeout_ms must be at least the poke interval".to_string(),
        ));
    }

    if config.scheduler.interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "scheduler.interval_ms must be greater than zero".to_string(),
        ));
    }
    if config.scheduler.history_limit == 0 {
        return Err(ConfigError::ValidationError(
            "scheduler.history_limit must be greater than zero".to_string(),
        ));
    }

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port must not be zero".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn base_config() -> Config {
        load_config_from_str(
            r#"
[database]
path = "/tmp/warehouse.db"

[source]
root = "/tmp/objects"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&base_config()).is_ok());
    }

    #[test]
    fn test_prefix_must_end_with_slash() {
        let mut config = base_config();
        config.source.landing_prefix = "landing/orders".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_landing_under_archive_rejected() {
        let mut config = base_config();
        config.source.landing_prefix = "archive/incoming/".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let mut config = base_config();
        config.source.pattern = "[".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_poke_interval_rejected() {
        let mut config = base_config();
        config.sensor.poke_interval_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_timeout_below_poke_interval_rejected() {
        let mut config = base_config();
        config.sensor.poke_interval_ms = 1000;
        config.sensor.timeout_ms = 500;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut config = base_config();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }
}
