use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::deletion::types::DeletionRecord;
use crate::eligibility::KeptResource;
use crate::resources::types::{ResourceKind, ScopeId};
use crate::sweep::errors::SweepError;
use crate::watcher::{WaitOutcome, WaitPolicy};

/// Knobs for one sweep pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepOptions {
    /// Collect and filter only; issue no mutating call.
    pub dry_run: bool,
    pub disable_ttl_check: bool,
    pub ttl_tag_name: String,
    pub wait: WaitPolicy,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            disable_ttl_check: false,
            ttl_tag_name: "ttl".to_string(),
            wait: WaitPolicy::default(),
        }
    }
}

/// Outcome of one resource kind within a sweep pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindReport {
    pub kind: ResourceKind,
    pub examined: usize,
    pub eligible: usize,
    pub deleted: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Ids selected for deletion; in a dry run, what would have been deleted.
    pub candidates: Vec<String>,
    /// Resources the eligibility filter kept, with the reason.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub kept: Vec<KeptResource>,
    pub records: Vec<DeletionRecord>,
    /// Set when the kind could not be described; nothing else ran for it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_error: Option<SweepError>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<SweepError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait: Option<WaitOutcome>,
}

impl KindReport {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            examined: 0,
            eligible: 0,
            deleted: 0,
            failed: 0,
            skipped: 0,
            candidates: Vec::new(),
            kept: Vec::new(),
            records: Vec::new(),
            query_error: None,
            warnings: Vec::new(),
            wait: None,
        }
    }

    pub fn query_failed(kind: ResourceKind, error: SweepError) -> Self {
        Self {
            query_error: Some(error),
            ..Self::new(kind)
        }
    }

    pub fn add_records(&mut self, records: Vec<DeletionRecord>) {
        for record in records {
            if record.is_deleted() {
                self.deleted += 1;
            } else if record.is_failed() {
                self.failed += 1;
            } else {
                self.skipped += 1;
            }
            self.records.push(record);
        }
    }

    /// Record the NAT gateway wait; a timeout also becomes a warning.
    pub fn set_wait(&mut self, outcome: WaitOutcome) {
        if let WaitOutcome::TimedOut {
            pending,
            waited_secs,
            ..
        } = &outcome
        {
            self.warnings.push(SweepError::WaitTimedOut {
                kind: self.kind,
                pending: pending.clone(),
                waited_secs: *waited_secs,
            });
        }
        self.wait = Some(outcome);
    }
}

/// Result of one sweep pass over one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub scope: ScopeId,
    pub dry_run: bool,
    /// The pass stopped early; kinds not reached are absent.
    pub cancelled: bool,
    pub kinds: Vec<KindReport>,
    pub elapsed_ms: u64,
}

impl SweepReport {
    pub fn new(scope: ScopeId, dry_run: bool) -> Self {
        Self {
            scope,
            dry_run,
            cancelled: false,
            kinds: Vec::new(),
            elapsed_ms: 0,
        }
    }

    pub fn kind(&self, kind: ResourceKind) -> Option<&KindReport> {
        self.kinds.iter().find(|k| k.kind == kind)
    }

    pub fn examined(&self) -> usize {
        self.kinds.iter().map(|k| k.examined).sum()
    }

    pub fn eligible(&self) -> usize {
        self.kinds.iter().map(|k| k.eligible).sum()
    }

    pub fn deleted(&self) -> usize {
        self.kinds.iter().map(|k| k.deleted).sum()
    }

    pub fn failed(&self) -> usize {
        self.kinds.iter().map(|k| k.failed).sum()
    }

    pub fn skipped(&self) -> usize {
        self.kinds.iter().map(|k| k.skipped).sum()
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }

    /// Errors worth surfacing: query failures, per-resource failures, and
    /// warnings.
    pub fn errors(&self) -> Vec<&SweepError> {
        let mut errors = Vec::new();
        for kind in &self.kinds {
            errors.extend(kind.query_error.iter());
            for record in &kind.records {
                if let crate::deletion::DeletionOutcome::Failed { error } = &record.outcome {
                    errors.push(error);
                }
                errors.extend(record.step_failures.iter());
            }
            errors.extend(kind.warnings.iter());
        }
        errors
    }
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.dry_run { " (dry run)" } else { "" };
        writeln!(f, "Sweep of {}{}", self.scope, mode)?;
        writeln!(
            f,
            "  {:<24} {:>8} {:>8} {:>8} {:>8} {:>8}",
            "KIND", "EXAMINED", "ELIGIBLE", "DELETED", "FAILED", "SKIPPED"
        )?;
        for kind in &self.kinds {
            let marker = if kind.query_error.is_some() {
                " (query failed)"
            } else {
                ""
            };
            writeln!(
                f,
                "  {:<24} {:>8} {:>8} {:>8} {:>8} {:>8}{}",
                kind.kind.display_name(),
                kind.examined,
                kind.eligible,
                kind.deleted,
                kind.failed,
                kind.skipped,
                marker
            )?;
        }
        if self.cancelled {
            writeln!(f, "  Cancelled before completion")?;
        }
        write!(
            f,
            "  Total: {} examined, {} eligible, {} deleted, {} failed in {:.1}s",
            self.examined(),
            self.eligible(),
            self.deleted(),
            self.failed(),
            self.elapsed().as_secs_f64()
        )
    }
}
