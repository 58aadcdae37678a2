//! Default values and resolved accessors for configuration types.

use std::time::Duration;

use crate::config::types::{NetsweepConfig, SweepConfig, TagsConfig, WaitConfig};
use crate::resources::tags::StandardTagEvaluator;
use crate::sweep::types::SweepOptions;
use crate::watcher::WaitPolicy;

pub const DEFAULT_TTL_TAG_NAME: &str = "ttl";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;
pub const DEFAULT_MAX_WAIT_SECS: u64 = 600;
pub const DEFAULT_PROTECTION_TAG: &str = "do_not_delete";
pub const DEFAULT_CREATION_DATE_TAG: &str = "creationDate";

impl SweepConfig {
    pub fn ttl_tag_name(&self) -> &str {
        self.ttl_tag_name.as_deref().unwrap_or(DEFAULT_TTL_TAG_NAME)
    }

    pub fn disable_ttl_check(&self) -> bool {
        self.disable_ttl_check.unwrap_or(false)
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run.unwrap_or(false)
    }
}

impl WaitConfig {
    /// Returns the poll interval in seconds, defaulting to 15.
    pub fn poll_interval_secs(&self) -> u64 {
        self.poll_interval_secs.unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
    }

    /// Returns the maximum wait in seconds, defaulting to 600.
    pub fn max_wait_secs(&self) -> u64 {
        self.max_wait_secs.unwrap_or(DEFAULT_MAX_WAIT_SECS)
    }

    pub fn policy(&self) -> WaitPolicy {
        WaitPolicy {
            poll_interval: Duration::from_secs(self.poll_interval_secs()),
            max_wait: Duration::from_secs(self.max_wait_secs()),
        }
    }
}

impl TagsConfig {
    pub fn protection_tag(&self) -> &str {
        self.protection_tag
            .as_deref()
            .unwrap_or(DEFAULT_PROTECTION_TAG)
    }

    pub fn creation_date_tag(&self) -> &str {
        self.creation_date_tag
            .as_deref()
            .unwrap_or(DEFAULT_CREATION_DATE_TAG)
    }
}

impl NetsweepConfig {
    pub fn sweep_options(&self) -> SweepOptions {
        SweepOptions {
            dry_run: self.sweep.dry_run(),
            disable_ttl_check: self.sweep.disable_ttl_check(),
            ttl_tag_name: self.sweep.ttl_tag_name().to_string(),
            wait: self.wait.policy(),
        }
    }

    pub fn tag_evaluator(&self) -> StandardTagEvaluator {
        StandardTagEvaluator::new(self.tags.protection_tag(), self.tags.creation_date_tag())
    }
}
