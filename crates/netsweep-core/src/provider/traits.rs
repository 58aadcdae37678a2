//! Provider trait definition.

use std::future::Future;

use crate::provider::errors::ProviderError;
use crate::provider::types::{DescribeQuery, RawResource};
use crate::resources::types::{ResourceKind, RouteDestination};

/// Black-box RPC surface of the cloud provider's networking API.
///
/// Implementations are stateless per call, so one handle is shared by every
/// sweep pass running at the same time.
pub trait NetworkProvider: Send + Sync {
    /// List resources of `kind` selected by `query`.
    fn describe(
        &self,
        kind: ResourceKind,
        query: &DescribeQuery,
    ) -> impl Future<Output = Result<Vec<RawResource>, ProviderError>> + Send;

    /// Request deletion of one resource.
    ///
    /// Acceptance is synchronous; NAT gateways keep reporting `deleting` for a
    /// while after the call returns.
    fn delete(
        &self,
        kind: ResourceKind,
        id: &str,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    fn disassociate_route_table(
        &self,
        association_id: &str,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    fn delete_route(
        &self,
        route_table_id: &str,
        destination: &RouteDestination,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;
}
