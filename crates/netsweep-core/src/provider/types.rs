use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resources::types::{ResourceKind, Route, RouteTableAssociation};

/// Filter key matching resources that live in a given VPC.
pub const VPC_ID_FILTER: &str = "vpc-id";
/// Filter key matching peering connections where the VPC is the requester.
pub const REQUESTER_VPC_FILTER: &str = "requester-vpc-info.vpc-id";
/// Filter key matching peering connections where the VPC is the accepter.
pub const ACCEPTER_VPC_FILTER: &str = "accepter-vpc-info.vpc-id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub key: String,
    pub values: Vec<String>,
}

impl Filter {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            values: vec![value.to_string()],
        }
    }
}

/// What a describe call selects: everything matching a filter, or explicit ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescribeQuery {
    Filter(Filter),
    Ids(Vec<String>),
}

/// A resource record as the provider reports it, before tag evaluation.
///
/// Kind-specific fields are left empty for kinds that do not carry them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResource {
    pub kind: ResourceKind,
    pub id: String,
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub requester_vpc_id: Option<String>,
    #[serde(default)]
    pub accepter_vpc_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// NAT gateway state or peering status code.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub associations: Vec<RouteTableAssociation>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl RawResource {
    pub fn new(kind: ResourceKind, id: &str) -> Self {
        Self {
            kind,
            id: id.to_string(),
            vpc_id: None,
            requester_vpc_id: None,
            accepter_vpc_id: None,
            created_at: None,
            tags: Vec::new(),
            state: None,
            associations: Vec::new(),
            routes: Vec::new(),
        }
    }

    pub fn in_vpc(mut self, vpc_id: &str) -> Self {
        self.vpc_id = Some(vpc_id.to_string());
        self
    }

    pub fn with_peers(mut self, requester: &str, accepter: &str) -> Self {
        self.requester_vpc_id = Some(requester.to_string());
        self.accepter_vpc_id = Some(accepter.to_string());
        self
    }

    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.push(Tag::new(key, value));
        self
    }

    pub fn with_state(mut self, state: &str) -> Self {
        self.state = Some(state.to_string());
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_association(mut self, association_id: &str, is_main: bool) -> Self {
        self.associations.push(RouteTableAssociation {
            association_id: Some(association_id.to_string()),
            route_table_id: Some(self.id.clone()),
            is_main,
        });
        self
    }

    pub fn with_route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Whether this record matches a describe filter.
    pub fn matches_filter(&self, filter: &Filter) -> bool {
        let field = match filter.key.as_str() {
            VPC_ID_FILTER => self.vpc_id.as_deref(),
            REQUESTER_VPC_FILTER => self.requester_vpc_id.as_deref(),
            ACCEPTER_VPC_FILTER => self.accepter_vpc_id.as_deref(),
            _ => None,
        };
        field.is_some_and(|value| filter.values.iter().any(|v| v == value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_vpc_filter() {
        let raw = RawResource::new(ResourceKind::VpcEndpoint, "vpce-1").in_vpc("vpc-1");
        assert!(raw.matches_filter(&Filter::new(VPC_ID_FILTER, "vpc-1")));
        assert!(!raw.matches_filter(&Filter::new(VPC_ID_FILTER, "vpc-2")));
    }

    #[test]
    fn test_matches_peering_role_filters() {
        let raw = RawResource::new(ResourceKind::PeeringConnection, "pcx-1")
            .with_peers("vpc-a", "vpc-b");
        assert!(raw.matches_filter(&Filter::new(REQUESTER_VPC_FILTER, "vpc-a")));
        assert!(!raw.matches_filter(&Filter::new(REQUESTER_VPC_FILTER, "vpc-b")));
        assert!(raw.matches_filter(&Filter::new(ACCEPTER_VPC_FILTER, "vpc-b")));
        assert!(!raw.matches_filter(&Filter::new("unknown-key", "vpc-a")));
    }

    #[test]
    fn test_raw_resource_deserializes_with_defaults() {
        let raw: RawResource =
            serde_json::from_str(r#"{"kind":"nat_gateway","id":"nat-1","state":"available"}"#)
                .unwrap();
        assert_eq!(raw.kind, ResourceKind::NatGateway);
        assert!(raw.tags.is_empty());
        assert!(raw.created_at.is_none());
        assert_eq!(raw.state.as_deref(), Some("available"));
    }
}
