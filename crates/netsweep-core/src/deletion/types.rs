use serde::Serialize;

use crate::resources::types::ResourceKind;
use crate::sweep::errors::SweepError;

/// Why a deleter left a resource alone without trying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    Protected,
    MainRouteTable,
    /// Already deleted, rejected, or being deleted.
    AlreadyGone {
        status: String,
    },
    /// The sweep was cancelled before this resource was reached.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeletionOutcome {
    /// The provider accepted the delete call.
    Deleted,
    Skipped { reason: SkipReason },
    Failed { error: SweepError },
}

/// What happened to one resource during a sweep pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionRecord {
    pub kind: ResourceKind,
    pub id: String,
    pub outcome: DeletionOutcome,
    /// Non-fatal failures of preparatory steps (disassociations, route deletes).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub step_failures: Vec<SweepError>,
}

impl DeletionRecord {
    pub fn deleted(kind: ResourceKind, id: &str) -> Self {
        Self::new(kind, id, DeletionOutcome::Deleted)
    }

    pub fn skipped(kind: ResourceKind, id: &str, reason: SkipReason) -> Self {
        Self::new(kind, id, DeletionOutcome::Skipped { reason })
    }

    pub fn failed(kind: ResourceKind, id: &str, error: SweepError) -> Self {
        Self::new(kind, id, DeletionOutcome::Failed { error })
    }

    fn new(kind: ResourceKind, id: &str, outcome: DeletionOutcome) -> Self {
        Self {
            kind,
            id: id.to_string(),
            outcome,
            step_failures: Vec::new(),
        }
    }

    pub fn with_step_failures(mut self, step_failures: Vec<SweepError>) -> Self {
        self.step_failures = step_failures;
        self
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self.outcome, DeletionOutcome::Deleted)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, DeletionOutcome::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, DeletionOutcome::Skipped { .. })
    }
}
