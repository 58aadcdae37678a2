//! netsweep-core: Core library for sweeping expired VPC networking resources
//!
//! This library decides which NAT gateways, VPC endpoints, VPC peering
//! connections and route tables inside a VPC have outlived their TTL tag, and
//! deletes them in the order the provider's dependency rules require. It is
//! used by the `netsweep` CLI.
//!
//! # Main Entry Points
//!
//! - [`sweep`] - Run a sweep pass over one or more VPCs
//! - [`eligibility`] - TTL and protection filter
//! - [`deletion`] - Per-kind deleters
//! - [`watcher`] - Bounded wait for asynchronous deletions
//! - [`provider`] - Networking API trait and the offline inventory provider
//! - [`config`] - Configuration management

pub mod config;
pub mod deletion;
pub mod eligibility;
pub mod errors;
pub mod events;
pub mod logging;
pub mod provider;
pub mod resources;
pub mod sweep;
pub mod watcher;

// Re-export commonly used types at crate root for convenience
pub use config::NetsweepConfig;
pub use deletion::{DeletionOutcome, DeletionRecord, SkipReason};
pub use eligibility::{Eligibility, EligibilityPolicy, KeptResource};
pub use errors::{ConfigError, NetsweepError};
pub use provider::{InventoryError, InventoryProvider, NetworkProvider, ProviderError};
pub use resources::{Resource, ResourceKind, ScopeId, StandardTagEvaluator, TagEvaluator};
pub use sweep::{KindReport, SweepError, SweepOptions, SweepReport};
pub use watcher::{WaitOutcome, WaitPolicy};

// Re-export handler module as the primary API
pub use sweep::handler as sweep_ops;

// Re-export logging initialization
pub use logging::init_logging;
