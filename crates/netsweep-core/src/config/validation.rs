use crate::config::types::NetsweepConfig;
use crate::errors::ConfigError;

/// Validate the resolved configuration.
pub fn validate_config(config: &NetsweepConfig) -> Result<(), ConfigError> {
    if config.sweep.ttl_tag_name().trim().is_empty() {
        return Err(ConfigError::InvalidConfiguration {
            message: "sweep.ttl_tag_name cannot be empty".to_string(),
        });
    }

    let poll = config.wait.poll_interval_secs();
    let max_wait = config.wait.max_wait_secs();
    if poll == 0 {
        return Err(ConfigError::InvalidConfiguration {
            message: "wait.poll_interval_secs must be greater than zero".to_string(),
        });
    }
    if poll > max_wait {
        return Err(ConfigError::InvalidConfiguration {
            message: format!(
                "wait.poll_interval_secs ({}) cannot exceed wait.max_wait_secs ({})",
                poll, max_wait
            ),
        });
    }

    if config.tags.protection_tag().trim().is_empty() {
        return Err(ConfigError::InvalidConfiguration {
            message: "tags.protection_tag cannot be empty".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> NetsweepConfig {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&NetsweepConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let config = parse("[wait]\npoll_interval_secs = 0\n");
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_poll_interval_above_max_wait_rejected() {
        let config = parse("[wait]\npoll_interval_secs = 30\nmax_wait_secs = 10\n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("cannot exceed"));
    }

    #[test]
    fn test_empty_ttl_tag_rejected() {
        let config = parse("[sweep]\nttl_tag_name = \"  \"\n");
        assert!(validate_config(&config).is_err());
    }
}
