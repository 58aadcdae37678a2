//! Per-kind deleters.
//!
//! Each deleter issues the provider calls for its kind in dependency order and
//! turns every call result into a [`DeletionRecord`]. A failing call only
//! affects the resource it targets.

pub mod endpoints;
pub mod nat_gateways;
pub mod peering;
pub mod route_tables;
pub mod types;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::provider::traits::NetworkProvider;
use crate::provider::types::{DescribeQuery, Filter, RawResource, VPC_ID_FILTER};
use crate::resources::types::{Expirable, ResourceKind, ScopeId};
use crate::sweep::errors::SweepError;

// Public API exports
pub use nat_gateways::NatGatewayPass;
pub use types::{DeletionOutcome, DeletionRecord, SkipReason};

/// Describe every resource of `kind` in the VPC.
pub(crate) async fn describe_in_vpc<P: NetworkProvider>(
    provider: &P,
    kind: ResourceKind,
    scope: &ScopeId,
) -> Result<Vec<RawResource>, SweepError> {
    let query = DescribeQuery::Filter(Filter::new(VPC_ID_FILTER, scope.as_str()));
    provider
        .describe(kind, &query)
        .await
        .map_err(|source| SweepError::QueryFailed {
            kind,
            scope: scope.to_string(),
            source,
        })
}

/// Skip record for a protected resource; protection wins over everything.
pub(crate) fn protected_guard<R: Expirable>(kind: ResourceKind, resource: &R) -> Option<DeletionRecord> {
    if !resource.is_protected() {
        return None;
    }
    debug!(
        event = "core.deletion.skip_protected",
        kind = %kind,
        id = resource.identifier()
    );
    Some(DeletionRecord::skipped(
        kind,
        resource.identifier(),
        SkipReason::Protected,
    ))
}

/// Skip record for a resource the sweep never reached.
pub(crate) fn cancelled_guard<R: Expirable>(
    kind: ResourceKind,
    resource: &R,
    cancel: &CancellationToken,
) -> Option<DeletionRecord> {
    if !cancel.is_cancelled() {
        return None;
    }
    debug!(
        event = "core.deletion.skip_cancelled",
        kind = %kind,
        id = resource.identifier()
    );
    Some(DeletionRecord::skipped(
        kind,
        resource.identifier(),
        SkipReason::Cancelled,
    ))
}
