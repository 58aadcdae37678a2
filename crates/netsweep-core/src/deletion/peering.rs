//! VPC peering connection deletion.
//!
//! A connection references the VPC either as requester or as accepter, so
//! collection queries both roles and merges the results.

use std::collections::HashSet;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::deletion::types::{DeletionRecord, SkipReason};
use crate::deletion::{cancelled_guard, protected_guard};
use crate::provider::traits::NetworkProvider;
use crate::provider::types::{
    ACCEPTER_VPC_FILTER, DescribeQuery, Filter, REQUESTER_VPC_FILTER, RawResource,
};
use crate::resources::types::{Expirable, ResourceKind, ScopeId, VpcPeeringConnection};
use crate::sweep::errors::{MutationOp, SweepError};

const KIND: ResourceKind = ResourceKind::PeeringConnection;

/// Describe every peering connection touching `scope`, deduplicated by id.
///
/// A failed requester query fails the kind; a failed accepter query only
/// narrows the result to the requester side.
pub async fn describe_in_scope<P: NetworkProvider>(
    provider: &P,
    scope: &ScopeId,
) -> Result<Vec<RawResource>, SweepError> {
    let requester = DescribeQuery::Filter(Filter::new(REQUESTER_VPC_FILTER, scope.as_str()));
    let mut connections =
        provider
            .describe(KIND, &requester)
            .await
            .map_err(|source| SweepError::QueryFailed {
                kind: KIND,
                scope: scope.to_string(),
                source,
            })?;

    let accepter = DescribeQuery::Filter(Filter::new(ACCEPTER_VPC_FILTER, scope.as_str()));
    match provider.describe(KIND, &accepter).await {
        Ok(accepted) => connections.extend(accepted),
        Err(e) => warn!(
            event = "core.deletion.peering_accepter_query_failed",
            scope = %scope,
            error = %e
        ),
    }

    Ok(dedup_by_id(connections))
}

fn dedup_by_id(resources: Vec<RawResource>) -> Vec<RawResource> {
    let mut seen = HashSet::new();
    resources
        .into_iter()
        .filter(|r| seen.insert(r.id.clone()))
        .collect()
}

pub async fn delete_peering_connections<P: NetworkProvider>(
    provider: &P,
    connections: &[VpcPeeringConnection],
    cancel: &CancellationToken,
) -> Vec<DeletionRecord> {
    let mut records = Vec::with_capacity(connections.len());

    for connection in connections {
        let id = connection.identifier();

        if let Some(record) = cancelled_guard(KIND, connection, cancel) {
            records.push(record);
            continue;
        }
        if let Some(record) = protected_guard(KIND, connection) {
            records.push(record);
            continue;
        }
        if connection.status.is_terminal_or_in_transition() {
            debug!(
                event = "core.deletion.peering_skip_status",
                id = id,
                status = connection.status.as_str()
            );
            records.push(DeletionRecord::skipped(
                KIND,
                id,
                SkipReason::AlreadyGone {
                    status: connection.status.as_str().to_string(),
                },
            ));
            continue;
        }

        match provider.delete(KIND, id).await {
            Ok(()) => {
                info!(event = "core.deletion.peering_delete_completed", id = id);
                records.push(DeletionRecord::deleted(KIND, id));
            }
            Err(source) => {
                error!(
                    event = "core.deletion.peering_delete_failed",
                    id = id,
                    error = %source
                );
                records.push(DeletionRecord::failed(
                    KIND,
                    id,
                    SweepError::MutationFailed {
                        kind: KIND,
                        id: id.to_string(),
                        operation: MutationOp::Delete,
                        source,
                    },
                ));
            }
        }
    }

    records
}
