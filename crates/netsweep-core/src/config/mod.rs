//! # Configuration System
//!
//! Hierarchical TOML configuration for netsweep.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.netsweep/config.toml` (global user preferences)
//! 3. **Project config** - `./.netsweep/config.toml` (project-specific overrides)
//! 4. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use netsweep_core::config::NetsweepConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = NetsweepConfig::load_hierarchy()?;
//!     config.validate()?;
//!     let options = config.sweep_options();
//!     println!("waiting up to {:?}", options.wait.max_wait);
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

// Public API exports
pub use types::{NetsweepConfig, SweepConfig, TagsConfig, WaitConfig};
pub use validation::validate_config;

impl NetsweepConfig {
    /// Load configuration from the hierarchy of config files, unvalidated.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    ///
    /// See [`validation::validate_config`] for details.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
