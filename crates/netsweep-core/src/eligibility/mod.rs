//! Eligibility filter: which snapshot entries are due for deletion.
//!
//! Pure functions over a snapshot. Calling [`filter_eligible`] twice with the
//! same inputs yields the same set.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::resources::types::Expirable;

/// Inputs that decide eligibility for one sweep pass.
#[derive(Debug, Clone)]
pub struct EligibilityPolicy {
    pub now: DateTime<Utc>,
    /// Tag the TTL was read from, named in verdict descriptions. Tag
    /// evaluation has already resolved it into `ttl_seconds`.
    pub ttl_tag_name: String,
    /// Treat every unprotected resource as expired.
    pub disable_ttl_check: bool,
}

/// Per-resource verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Eligibility {
    Eligible,
    Protected,
    /// TTL is zero or negative: keep forever.
    NoTtl,
    NotExpired { remaining_seconds: i64 },
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }

    /// Short human-readable reason, as printed in dry-run listings.
    pub fn describe(&self, ttl_tag_name: &str) -> String {
        match self {
            Eligibility::Eligible => "expired".to_string(),
            Eligibility::Protected => "protected".to_string(),
            Eligibility::NoTtl => format!("no positive '{}' tag", ttl_tag_name),
            Eligibility::NotExpired { remaining_seconds } => {
                format!("expires in {}s", remaining_seconds)
            }
        }
    }
}

/// A resource the filter kept, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeptResource {
    pub id: String,
    pub verdict: Eligibility,
}

/// Split a snapshot into the resources due for deletion and the verdicts of
/// the ones kept. Snapshot order is preserved on both sides.
pub fn partition<R: Expirable + Clone>(
    resources: &[R],
    policy: &EligibilityPolicy,
) -> (Vec<R>, Vec<KeptResource>) {
    let mut eligible = Vec::new();
    let mut kept = Vec::new();
    for resource in resources {
        match evaluate(resource, policy) {
            Eligibility::Eligible => eligible.push(resource.clone()),
            verdict => kept.push(KeptResource {
                id: resource.identifier().to_string(),
                verdict,
            }),
        }
    }
    (eligible, kept)
}

pub fn evaluate<R: Expirable>(resource: &R, policy: &EligibilityPolicy) -> Eligibility {
    let base = resource.resource();

    if base.is_protected {
        return Eligibility::Protected;
    }
    if policy.disable_ttl_check {
        return Eligibility::Eligible;
    }
    if base.ttl_seconds <= 0 {
        return Eligibility::NoTtl;
    }

    // A creation date in the future (clock skew) counts as age zero.
    let age = (policy.now - base.creation_date).num_seconds().max(0);
    if age >= base.ttl_seconds {
        Eligibility::Eligible
    } else {
        Eligibility::NotExpired {
            remaining_seconds: base.ttl_seconds.saturating_sub(age),
        }
    }
}

/// Select the resources whose TTL has elapsed and which are not protected.
pub fn filter_eligible<R: Expirable + Clone>(resources: &[R], policy: &EligibilityPolicy) -> Vec<R> {
    partition(resources, policy).0
}
