//! Route table deletion.
//!
//! The provider refuses to delete a table while non-main associations or
//! non-local routes remain, so each table goes through the cascade
//! disassociate → delete routes → delete table, strictly in that order.

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::deletion::types::{DeletionRecord, SkipReason};
use crate::deletion::{cancelled_guard, protected_guard};
use crate::provider::traits::NetworkProvider;
use crate::provider::types::DescribeQuery;
use crate::resources::types::{Expirable, ResourceKind, RouteTable};
use crate::sweep::errors::{MutationOp, SweepError};

const KIND: ResourceKind = ResourceKind::RouteTable;

/// Delete `tables` one after the other. Cancellation is checked between
/// tables, never inside one table's cascade.
pub async fn delete_route_tables<P: NetworkProvider>(
    provider: &P,
    tables: &[RouteTable],
    cancel: &CancellationToken,
) -> Vec<DeletionRecord> {
    let mut records = Vec::with_capacity(tables.len());
    for table in tables {
        if let Some(record) = cancelled_guard(KIND, table, cancel) {
            records.push(record);
            continue;
        }
        records.push(delete_route_table(provider, table).await);
    }
    records
}

pub async fn delete_route_table<P: NetworkProvider>(
    provider: &P,
    table: &RouteTable,
) -> DeletionRecord {
    let id = table.identifier();

    if let Some(record) = protected_guard(KIND, table) {
        return record;
    }
    if table.is_main() {
        debug!(event = "core.deletion.route_table_skip_main", id = id);
        return DeletionRecord::skipped(KIND, id, SkipReason::MainRouteTable);
    }

    info!(
        event = "core.deletion.route_table_started",
        id = id,
        associations = table.associations.len()
    );

    let mut step_failures = Vec::new();
    disassociate_all(provider, table, &mut step_failures).await;
    delete_non_local_routes(provider, id, &mut step_failures).await;

    match provider.delete(KIND, id).await {
        Ok(()) => {
            info!(
                event = "core.deletion.route_table_completed",
                id = id,
                step_failures = step_failures.len()
            );
            DeletionRecord::deleted(KIND, id).with_step_failures(step_failures)
        }
        Err(source) => {
            error!(
                event = "core.deletion.route_table_failed",
                id = id,
                error = %source
            );
            DeletionRecord::failed(
                KIND,
                id,
                SweepError::MutationFailed {
                    kind: KIND,
                    id: id.to_string(),
                    operation: MutationOp::Delete,
                    source,
                },
            )
            .with_step_failures(step_failures)
        }
    }
}

async fn disassociate_all<P: NetworkProvider>(
    provider: &P,
    table: &RouteTable,
    failures: &mut Vec<SweepError>,
) {
    let table_id = table.identifier();

    for association in &table.associations {
        let Some(association_id) = association.association_id.as_deref() else {
            continue;
        };
        // Main associations cannot be disassociated.
        if association.is_main {
            debug!(
                event = "core.deletion.association_skip_main",
                route_table = table_id,
                association = association_id
            );
            continue;
        }

        match provider.disassociate_route_table(association_id).await {
            Ok(()) => debug!(
                event = "core.deletion.association_removed",
                route_table = table_id,
                association = association_id
            ),
            Err(source) => {
                error!(
                    event = "core.deletion.association_remove_failed",
                    route_table = table_id,
                    association = association_id,
                    error = %source
                );
                failures.push(SweepError::MutationFailed {
                    kind: KIND,
                    id: format!("{}/{}", table_id, association_id),
                    operation: MutationOp::Disassociate,
                    source,
                });
            }
        }
    }
}

/// Delete every non-local route of the table's current route set.
///
/// The route set is described again here: the snapshot's copy may be stale.
async fn delete_non_local_routes<P: NetworkProvider>(
    provider: &P,
    table_id: &str,
    failures: &mut Vec<SweepError>,
) {
    let query = DescribeQuery::Ids(vec![table_id.to_string()]);
    let current = match provider.describe(KIND, &query).await {
        Ok(tables) => tables.into_iter().find(|t| t.id == table_id),
        Err(source) => {
            error!(
                event = "core.deletion.route_describe_failed",
                route_table = table_id,
                error = %source
            );
            failures.push(SweepError::QueryFailed {
                kind: KIND,
                scope: table_id.to_string(),
                source,
            });
            return;
        }
    };

    let Some(current) = current else {
        return;
    };

    for route in &current.routes {
        if route.is_local() {
            continue;
        }
        let Some(destination) = route.destination() else {
            debug!(
                event = "core.deletion.route_skip_no_destination",
                route_table = table_id
            );
            continue;
        };

        match provider.delete_route(table_id, &destination).await {
            Ok(()) => debug!(
                event = "core.deletion.route_removed",
                route_table = table_id,
                destination = %destination
            ),
            Err(source) => {
                error!(
                    event = "core.deletion.route_remove_failed",
                    route_table = table_id,
                    destination = %destination,
                    error = %source
                );
                failures.push(SweepError::MutationFailed {
                    kind: KIND,
                    id: format!("{}/{}", table_id, destination),
                    operation: MutationOp::DeleteRoute,
                    source,
                });
            }
        }
    }
}
