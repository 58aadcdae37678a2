use chrono::{DateTime, Utc};
use tracing::debug;

use crate::deletion::{describe_in_vpc, peering};
use crate::provider::traits::NetworkProvider;
use crate::resources::normalize;
use crate::resources::tags::TagEvaluator;
use crate::resources::types::{
    NatGateway, Resource, ResourceKind, RouteTable, ScopeId, VpcEndpoint, VpcPeeringConnection,
};
use crate::sweep::errors::SweepError;

/// Describe every resource of `kind` in `scope` and turn it into a typed
/// snapshot.
pub async fn collect<P: NetworkProvider>(
    provider: &P,
    evaluator: &dyn TagEvaluator,
    scope: &ScopeId,
    kind: ResourceKind,
    ttl_tag_name: &str,
    snapshot_at: DateTime<Utc>,
) -> Result<Vec<Resource>, SweepError> {
    let raw = match kind {
        ResourceKind::PeeringConnection => peering::describe_in_scope(provider, scope).await?,
        _ => describe_in_vpc(provider, kind, scope).await?,
    };

    debug!(
        event = "core.sweep.collect_completed",
        kind = %kind,
        scope = %scope,
        count = raw.len()
    );

    Ok(raw
        .iter()
        .map(|r| normalize(r, evaluator, ttl_tag_name, snapshot_at))
        .collect())
}

pub fn peering_connections(resources: &[Resource]) -> Vec<VpcPeeringConnection> {
    resources
        .iter()
        .filter_map(Resource::as_peering_connection)
        .cloned()
        .collect()
}

pub fn vpc_endpoints(resources: &[Resource]) -> Vec<VpcEndpoint> {
    resources
        .iter()
        .filter_map(Resource::as_vpc_endpoint)
        .cloned()
        .collect()
}

pub fn nat_gateways(resources: &[Resource]) -> Vec<NatGateway> {
    resources
        .iter()
        .filter_map(Resource::as_nat_gateway)
        .cloned()
        .collect()
}

pub fn route_tables(resources: &[Resource]) -> Vec<RouteTable> {
    resources
        .iter()
        .filter_map(Resource::as_route_table)
        .cloned()
        .collect()
}
