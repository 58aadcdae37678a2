//! Configuration type definitions.
//!
//! # Example Configuration
//!
//! ```toml
//! [sweep]
//! ttl_tag_name = "ttl"
//! disable_ttl_check = false
//! dry_run = true
//!
//! [wait]
//! poll_interval_secs = 15
//! max_wait_secs = 600
//!
//! [tags]
//! protection_tag = "do_not_delete"
//! creation_date_tag = "creationDate"
//! ```

use serde::{Deserialize, Serialize};

/// Configuration loaded from TOML config files.
///
/// Every field is optional so a project file only overrides what it sets.
/// Resolved values come from the accessors in [`super::defaults`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct NetsweepConfig {
    #[serde(default)]
    pub sweep: SweepConfig,

    #[serde(default)]
    pub wait: WaitConfig,

    #[serde(default)]
    pub tags: TagsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SweepConfig {
    /// Tag holding the TTL in seconds. Default: `ttl`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_tag_name: Option<String>,

    /// Delete every unprotected resource regardless of TTL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_ttl_check: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
}

/// NAT gateway deletion wait.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct WaitConfig {
    /// Default: 15 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_secs: Option<u64>,

    /// Default: 600 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_wait_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TagsConfig {
    /// Default: `do_not_delete`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protection_tag: Option<String>,

    /// Default: `creationDate`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date_tag: Option<String>,
}
