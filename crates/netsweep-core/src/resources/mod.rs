pub mod tags;
pub mod types;

use chrono::{DateTime, Utc};

use crate::provider::types::RawResource;

// Public API exports
pub use tags::{EssentialTags, StandardTagEvaluator, TagEvaluator};
pub use types::{
    CloudResource, Expirable, LOCAL_ROUTE_TARGET, NatGateway, NatGatewayState, PeeringStatus,
    Resource, ResourceKind, Route, RouteDestination, RouteTable, RouteTableAssociation, ScopeId,
    VpcEndpoint, VpcPeeringConnection,
};

/// Build a typed snapshot from a raw provider record.
///
/// The creation date is the provider's creation time when it reports one,
/// else the creation date tag, else `snapshot_at`.
pub fn normalize(
    raw: &RawResource,
    evaluator: &dyn TagEvaluator,
    ttl_tag_name: &str,
    snapshot_at: DateTime<Utc>,
) -> Resource {
    let essential = evaluator.evaluate(&raw.tags, ttl_tag_name);

    let resource = CloudResource {
        identifier: raw.id.clone(),
        description: format!("{}: {}", raw.kind.display_name(), raw.id),
        creation_date: raw
            .created_at
            .or(essential.creation_date)
            .unwrap_or(snapshot_at),
        ttl_seconds: essential.ttl,
        tag_present: essential.tag.is_some(),
        is_protected: essential.is_protected,
    };

    match raw.kind {
        ResourceKind::PeeringConnection => Resource::PeeringConnection(VpcPeeringConnection {
            resource,
            status: PeeringStatus::from_provider(raw.state.as_deref().unwrap_or("active")),
        }),
        ResourceKind::VpcEndpoint => Resource::VpcEndpoint(VpcEndpoint { resource }),
        ResourceKind::NatGateway => Resource::NatGateway(NatGateway {
            resource,
            state: NatGatewayState::from_provider(raw.state.as_deref().unwrap_or("available")),
        }),
        ResourceKind::RouteTable => Resource::RouteTable(RouteTable {
            resource,
            associations: raw.associations.clone(),
            routes: raw.routes.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_normalize_nat_gateway_uses_provider_creation_time() {
        let created = Utc::now() - Duration::hours(2);
        let raw = RawResource::new(ResourceKind::NatGateway, "nat-1")
            .created_at(created)
            .with_tag("ttl", "60")
            .with_tag("creationDate", "2020-01-01T00:00:00Z")
            .with_state("available");

        let resource = normalize(&raw, &StandardTagEvaluator::default(), "ttl", Utc::now());
        let gateway = resource.as_nat_gateway().unwrap();

        assert_eq!(gateway.resource.creation_date, created);
        assert_eq!(gateway.resource.ttl_seconds, 60);
        assert!(gateway.resource.tag_present);
        assert_eq!(gateway.state, NatGatewayState::Available);
        assert_eq!(gateway.resource.description, "NAT gateway: nat-1");
    }

    #[test]
    fn test_normalize_falls_back_to_snapshot_time() {
        let snapshot_at = Utc::now();
        let raw = RawResource::new(ResourceKind::VpcEndpoint, "vpce-1");

        let resource = normalize(&raw, &StandardTagEvaluator::default(), "ttl", snapshot_at);
        assert_eq!(resource.resource().creation_date, snapshot_at);
        assert!(!resource.resource().tag_present);
        assert_eq!(resource.resource().ttl_seconds, 0);
    }

    #[test]
    fn test_normalize_route_table_keeps_associations_and_routes() {
        let raw = RawResource::new(ResourceKind::RouteTable, "rtb-1")
            .with_association("rtbassoc-a", true)
            .with_route(Route::cidr("10.0.0.0/16", "local"))
            .with_tag("do_not_delete", "true");

        let resource = normalize(&raw, &StandardTagEvaluator::default(), "ttl", Utc::now());
        let table = resource.as_route_table().unwrap();

        assert!(table.is_main());
        assert_eq!(table.routes.len(), 1);
        assert!(table.resource.is_protected);
    }

    #[test]
    fn test_normalize_peering_status() {
        let raw = RawResource::new(ResourceKind::PeeringConnection, "pcx-1").with_state("rejected");
        let resource = normalize(&raw, &StandardTagEvaluator::default(), "ttl", Utc::now());
        assert_eq!(
            resource.as_peering_connection().unwrap().status,
            PeeringStatus::Rejected
        );
    }
}
