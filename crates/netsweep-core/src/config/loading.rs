//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.netsweep/config.toml` (global user preferences)
//! 3. **Project config** - `./.netsweep/config.toml` (project-specific overrides)
//! 4. **CLI arguments** - Command-line flags (highest priority)

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::types::{NetsweepConfig, SweepConfig, TagsConfig, WaitConfig};
use crate::errors::ConfigError;

const CONFIG_DIR: &str = ".netsweep";
const CONFIG_FILE: &str = "config.toml";

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error if a config file cannot be parsed. Missing config files
/// are not errors. The result is not validated: callers layer CLI overrides
/// on top first and validate the final merge.
pub fn load_hierarchy() -> Result<NetsweepConfig, ConfigError> {
    let project_dir = std::env::current_dir()?;
    load_hierarchy_from(dirs::home_dir().as_deref(), &project_dir)
}

/// Load the hierarchy rooted at explicit user and project directories.
pub fn load_hierarchy_from(
    home_dir: Option<&Path>,
    project_dir: &Path,
) -> Result<NetsweepConfig, ConfigError> {
    let mut config = NetsweepConfig::default();

    // A missing home directory just means there is no user config.
    if let Some(home) = home_dir
        && let Some(user_config) = load_optional(&config_path(home))?
    {
        config = merge_configs(config, user_config);
    }

    if let Some(project_config) = load_optional(&config_path(project_dir))? {
        config = merge_configs(config, project_config);
    }

    Ok(config)
}

fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_DIR).join(CONFIG_FILE)
}

fn load_optional(path: &Path) -> Result<Option<NetsweepConfig>, ConfigError> {
    match load_config_file(path) {
        Ok(config) => Ok(Some(config)),
        Err(ConfigError::ConfigNotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Load a configuration file from the given path.
pub fn load_config_file(path: &Path) -> Result<NetsweepConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::ConfigNotFound {
                path: path.display().to_string(),
            }
        } else {
            ConfigError::IoError { source: e }
        }
    })?;

    let config: NetsweepConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    debug!(
        event = "core.config.load_completed",
        path = %path.display()
    );

    Ok(config)
}

/// Merge two configurations, with override_config taking precedence.
///
/// Override values replace base values only if present.
pub fn merge_configs(base: NetsweepConfig, override_config: NetsweepConfig) -> NetsweepConfig {
    NetsweepConfig {
        sweep: SweepConfig {
            ttl_tag_name: override_config
                .sweep
                .ttl_tag_name
                .or(base.sweep.ttl_tag_name),
            disable_ttl_check: override_config
                .sweep
                .disable_ttl_check
                .or(base.sweep.disable_ttl_check),
            dry_run: override_config.sweep.dry_run.or(base.sweep.dry_run),
        },
        wait: WaitConfig {
            poll_interval_secs: override_config
                .wait
                .poll_interval_secs
                .or(base.wait.poll_interval_secs),
            max_wait_secs: override_config
                .wait
                .max_wait_secs
                .or(base.wait.max_wait_secs),
        },
        tags: TagsConfig {
            protection_tag: override_config
                .tags
                .protection_tag
                .or(base.tags.protection_tag),
            creation_date_tag: override_config
                .tags
                .creation_date_tag
                .or(base.tags.creation_date_tag),
        },
    }
}
