use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The networking resource kinds a sweep knows how to delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    PeeringConnection,
    VpcEndpoint,
    NatGateway,
    RouteTable,
}

impl ResourceKind {
    /// Order in which one sweep pass processes the kinds.
    ///
    /// Route tables come last: they may still target gateways or endpoints
    /// that are being removed earlier in the pass.
    pub const SWEEP_ORDER: [ResourceKind; 4] = [
        ResourceKind::PeeringConnection,
        ResourceKind::VpcEndpoint,
        ResourceKind::NatGateway,
        ResourceKind::RouteTable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::PeeringConnection => "peering_connection",
            ResourceKind::VpcEndpoint => "vpc_endpoint",
            ResourceKind::NatGateway => "nat_gateway",
            ResourceKind::RouteTable => "route_table",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceKind::PeeringConnection => "VPC peering connection",
            ResourceKind::VpcEndpoint => "VPC endpoint",
            ResourceKind::NatGateway => "NAT gateway",
            ResourceKind::RouteTable => "Route table",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of the parent network a sweep pass is scoped to (a VPC id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeId(String);

impl ScopeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ScopeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Expiration metadata and identity shared by every deletable resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudResource {
    pub identifier: String,
    pub description: String,
    pub creation_date: DateTime<Utc>,
    /// TTL in seconds. Zero or negative means the resource never expires.
    pub ttl_seconds: i64,
    pub tag_present: bool,
    /// Protected resources are never deleted, whatever their TTL says.
    pub is_protected: bool,
}

/// Access to the shared [`CloudResource`] fields of a kind-specific entity.
pub trait Expirable {
    fn resource(&self) -> &CloudResource;

    fn identifier(&self) -> &str {
        &self.resource().identifier
    }

    fn is_protected(&self) -> bool {
        self.resource().is_protected
    }
}

impl Expirable for CloudResource {
    fn resource(&self) -> &CloudResource {
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTableAssociation {
    #[serde(default)]
    pub association_id: Option<String>,
    #[serde(default)]
    pub route_table_id: Option<String>,
    #[serde(default)]
    pub is_main: bool,
}

/// Destination selector used to delete a single route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RouteDestination {
    Cidr(String),
    Ipv6Cidr(String),
    PrefixList(String),
}

impl RouteDestination {
    pub fn as_str(&self) -> &str {
        match self {
            RouteDestination::Cidr(v)
            | RouteDestination::Ipv6Cidr(v)
            | RouteDestination::PrefixList(v) => v,
        }
    }
}

impl fmt::Display for RouteDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The literal target of the implicit route covering the VPC's own range.
pub const LOCAL_ROUTE_TARGET: &str = "local";

/// A route as reported by the provider. At most one destination field is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub destination_cidr_block: Option<String>,
    #[serde(default)]
    pub destination_ipv6_cidr_block: Option<String>,
    #[serde(default)]
    pub destination_prefix_list_id: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

impl Route {
    pub fn cidr(destination: &str, target: &str) -> Self {
        Self {
            destination_cidr_block: Some(destination.to_string()),
            target: Some(target.to_string()),
            ..Self::default()
        }
    }

    /// The populated destination, checked in CIDR, IPv6 CIDR, prefix-list order.
    pub fn destination(&self) -> Option<RouteDestination> {
        if let Some(cidr) = &self.destination_cidr_block {
            Some(RouteDestination::Cidr(cidr.clone()))
        } else if let Some(cidr) = &self.destination_ipv6_cidr_block {
            Some(RouteDestination::Ipv6Cidr(cidr.clone()))
        } else {
            self.destination_prefix_list_id
                .as_ref()
                .map(|id| RouteDestination::PrefixList(id.clone()))
        }
    }

    pub fn is_local(&self) -> bool {
        self.target.as_deref() == Some(LOCAL_ROUTE_TARGET)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteTable {
    pub resource: CloudResource,
    pub associations: Vec<RouteTableAssociation>,
    pub routes: Vec<Route>,
}

impl RouteTable {
    /// A table is main when any association in its own list is main.
    pub fn is_main(&self) -> bool {
        self.associations.iter().any(|a| a.is_main)
    }
}

impl Expirable for RouteTable {
    fn resource(&self) -> &CloudResource {
        &self.resource
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NatGatewayState {
    Pending,
    Available,
    Deleting,
    Deleted,
    Failed,
    Other(String),
}

impl NatGatewayState {
    pub fn from_provider(state: &str) -> Self {
        match state {
            "pending" => NatGatewayState::Pending,
            "available" => NatGatewayState::Available,
            "deleting" => NatGatewayState::Deleting,
            "deleted" => NatGatewayState::Deleted,
            "failed" => NatGatewayState::Failed,
            other => NatGatewayState::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            NatGatewayState::Pending => "pending",
            NatGatewayState::Available => "available",
            NatGatewayState::Deleting => "deleting",
            NatGatewayState::Deleted => "deleted",
            NatGatewayState::Failed => "failed",
            NatGatewayState::Other(s) => s,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, NatGatewayState::Deleted | NatGatewayState::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatGateway {
    pub resource: CloudResource,
    pub state: NatGatewayState,
}

impl Expirable for NatGateway {
    fn resource(&self) -> &CloudResource {
        &self.resource
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeeringStatus {
    Active,
    Deleted,
    Rejected,
    Deleting,
    PendingAcceptance,
    Other(String),
}

impl PeeringStatus {
    pub fn from_provider(code: &str) -> Self {
        match code {
            "active" => PeeringStatus::Active,
            "deleted" => PeeringStatus::Deleted,
            "rejected" => PeeringStatus::Rejected,
            "deleting" => PeeringStatus::Deleting,
            "pending-acceptance" => PeeringStatus::PendingAcceptance,
            other => PeeringStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PeeringStatus::Active => "active",
            PeeringStatus::Deleted => "deleted",
            PeeringStatus::Rejected => "rejected",
            PeeringStatus::Deleting => "deleting",
            PeeringStatus::PendingAcceptance => "pending-acceptance",
            PeeringStatus::Other(s) => s,
        }
    }

    /// Connections that are gone or already going away.
    pub fn is_terminal_or_in_transition(&self) -> bool {
        matches!(
            self,
            PeeringStatus::Deleted | PeeringStatus::Rejected | PeeringStatus::Deleting
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VpcPeeringConnection {
    pub resource: CloudResource,
    pub status: PeeringStatus,
}

impl Expirable for VpcPeeringConnection {
    fn resource(&self) -> &CloudResource {
        &self.resource
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VpcEndpoint {
    pub resource: CloudResource,
}

impl Expirable for VpcEndpoint {
    fn resource(&self) -> &CloudResource {
        &self.resource
    }
}

/// A snapshot of one deletable resource, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resource {
    PeeringConnection(VpcPeeringConnection),
    VpcEndpoint(VpcEndpoint),
    NatGateway(NatGateway),
    RouteTable(RouteTable),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::PeeringConnection(_) => ResourceKind::PeeringConnection,
            Resource::VpcEndpoint(_) => ResourceKind::VpcEndpoint,
            Resource::NatGateway(_) => ResourceKind::NatGateway,
            Resource::RouteTable(_) => ResourceKind::RouteTable,
        }
    }

    pub fn as_peering_connection(&self) -> Option<&VpcPeeringConnection> {
        match self {
            Resource::PeeringConnection(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_vpc_endpoint(&self) -> Option<&VpcEndpoint> {
        match self {
            Resource::VpcEndpoint(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_nat_gateway(&self) -> Option<&NatGateway> {
        match self {
            Resource::NatGateway(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_route_table(&self) -> Option<&RouteTable> {
        match self {
            Resource::RouteTable(t) => Some(t),
            _ => None,
        }
    }
}

impl Expirable for Resource {
    fn resource(&self) -> &CloudResource {
        match self {
            Resource::PeeringConnection(p) => &p.resource,
            Resource::VpcEndpoint(e) => &e.resource,
            Resource::NatGateway(g) => &g.resource,
            Resource::RouteTable(t) => &t.resource,
        }
    }
}
