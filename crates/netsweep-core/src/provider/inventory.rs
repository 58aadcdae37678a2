//! Offline provider backed by a JSON inventory of VPC resources.
//!
//! The inventory behaves like the real networking API for the calls a sweep
//! makes: describe filters, asynchronous NAT gateway deletion, and the
//! dependency rules that block deleting a route table that still has
//! associations or routes. Every call is journaled so a run can be inspected
//! afterwards.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::provider::errors::{InventoryError, ProviderError};
use crate::provider::traits::NetworkProvider;
use crate::provider::types::{DescribeQuery, RawResource};
use crate::resources::types::{ResourceKind, RouteDestination};

fn default_nat_deletion_polls() -> u32 {
    1
}

/// On-disk inventory format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub resources: Vec<RawResource>,

    /// Number of describe calls a deleted NAT gateway reports `deleting`
    /// before it reports `deleted`.
    #[serde(default = "default_nat_deletion_polls")]
    pub nat_deletion_polls: u32,
}

/// One journaled provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Describe {
        kind: ResourceKind,
        query: DescribeQuery,
    },
    Delete {
        kind: ResourceKind,
        id: String,
    },
    Disassociate {
        association_id: String,
    },
    DeleteRoute {
        route_table_id: String,
        destination: RouteDestination,
    },
}

impl ProviderCall {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, ProviderCall::Describe { .. })
    }
}

#[derive(Debug, Default)]
struct InventoryState {
    resources: Vec<RawResource>,
    pending_nat_deletions: HashMap<String, u32>,
    calls: Vec<ProviderCall>,
}

#[derive(Debug, Default)]
pub struct InventoryProvider {
    nat_deletion_polls: u32,
    state: Mutex<InventoryState>,
}

impl InventoryProvider {
    pub fn new(inventory: Inventory) -> Self {
        Self {
            nat_deletion_polls: inventory.nat_deletion_polls,
            state: Mutex::new(InventoryState {
                resources: inventory.resources,
                ..InventoryState::default()
            }),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, InventoryError> {
        let content = std::fs::read_to_string(path).map_err(|source| InventoryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let inventory: Inventory =
            serde_json::from_str(&content).map_err(|source| InventoryError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        debug!(
            event = "core.inventory.load_completed",
            path = %path.display(),
            resources = inventory.resources.len()
        );

        Ok(Self::new(inventory))
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.lock().calls.clone()
    }

    /// Current state of the inventory.
    pub fn snapshot(&self) -> Vec<RawResource> {
        self.lock().resources.clone()
    }

    fn lock(&self) -> MutexGuard<'_, InventoryState> {
        // The state stays consistent even if a holder panicked mid-call.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn describe_now(
        &self,
        kind: ResourceKind,
        query: &DescribeQuery,
    ) -> Result<Vec<RawResource>, ProviderError> {
        let mut state = self.lock();
        state.calls.push(ProviderCall::Describe {
            kind,
            query: query.clone(),
        });

        match query {
            DescribeQuery::Filter(filter) => Ok(state
                .resources
                .iter()
                .filter(|r| r.kind == kind && r.matches_filter(filter))
                .cloned()
                .collect()),
            DescribeQuery::Ids(ids) => {
                if let Some(missing) = ids
                    .iter()
                    .find(|id| !state.resources.iter().any(|r| r.kind == kind && &r.id == *id))
                {
                    return Err(ProviderError::NotFound {
                        id: missing.clone(),
                    });
                }

                advance_nat_deletions(&mut state, ids);

                Ok(state
                    .resources
                    .iter()
                    .filter(|r| r.kind == kind && ids.contains(&r.id))
                    .cloned()
                    .collect())
            }
        }
    }

    fn delete_now(&self, kind: ResourceKind, id: &str) -> Result<(), ProviderError> {
        let mut state = self.lock();
        state.calls.push(ProviderCall::Delete {
            kind,
            id: id.to_string(),
        });

        let index = state
            .resources
            .iter()
            .position(|r| r.kind == kind && r.id == id)
            .ok_or_else(|| ProviderError::NotFound { id: id.to_string() })?;

        match kind {
            ResourceKind::NatGateway => {
                if self.nat_deletion_polls == 0 {
                    state.resources[index].state = Some("deleted".to_string());
                } else {
                    state.resources[index].state = Some("deleting".to_string());
                    state
                        .pending_nat_deletions
                        .insert(id.to_string(), self.nat_deletion_polls);
                }
            }
            ResourceKind::PeeringConnection => {
                state.resources[index].state = Some("deleted".to_string());
            }
            ResourceKind::VpcEndpoint => {
                state.resources.remove(index);
            }
            ResourceKind::RouteTable => {
                let table = &state.resources[index];
                if table.associations.iter().any(|a| a.is_main) {
                    return Err(ProviderError::DependencyViolation {
                        id: id.to_string(),
                        message: "cannot delete the main route table".to_string(),
                    });
                }
                if !table.associations.is_empty() || table.routes.iter().any(|r| !r.is_local()) {
                    return Err(ProviderError::DependencyViolation {
                        id: id.to_string(),
                        message: "route table has dependencies and cannot be deleted".to_string(),
                    });
                }
                state.resources.remove(index);
            }
        }

        Ok(())
    }

    fn disassociate_now(&self, association_id: &str) -> Result<(), ProviderError> {
        let mut state = self.lock();
        state.calls.push(ProviderCall::Disassociate {
            association_id: association_id.to_string(),
        });

        for table in state
            .resources
            .iter_mut()
            .filter(|r| r.kind == ResourceKind::RouteTable)
        {
            let Some(index) = table
                .associations
                .iter()
                .position(|a| a.association_id.as_deref() == Some(association_id))
            else {
                continue;
            };

            if table.associations[index].is_main {
                return Err(ProviderError::api(
                    "InvalidParameterValue",
                    format!("association '{}' is a main association", association_id),
                ));
            }
            table.associations.remove(index);
            return Ok(());
        }

        Err(ProviderError::NotFound {
            id: association_id.to_string(),
        })
    }

    fn delete_route_now(
        &self,
        route_table_id: &str,
        destination: &RouteDestination,
    ) -> Result<(), ProviderError> {
        let mut state = self.lock();
        state.calls.push(ProviderCall::DeleteRoute {
            route_table_id: route_table_id.to_string(),
            destination: destination.clone(),
        });

        let table = state
            .resources
            .iter_mut()
            .find(|r| r.kind == ResourceKind::RouteTable && r.id == route_table_id)
            .ok_or_else(|| ProviderError::NotFound {
                id: route_table_id.to_string(),
            })?;

        let index = table
            .routes
            .iter()
            .position(|r| r.destination().as_ref() == Some(destination))
            .ok_or_else(|| ProviderError::NotFound {
                id: format!("{}:{}", route_table_id, destination),
            })?;

        if table.routes[index].is_local() {
            return Err(ProviderError::api(
                "InvalidParameterValue",
                format!("cannot remove local route {}", destination),
            ));
        }
        table.routes.remove(index);
        Ok(())
    }
}

fn advance_nat_deletions(state: &mut InventoryState, ids: &[String]) {
    for id in ids {
        let Some(remaining) = state.pending_nat_deletions.get_mut(id) else {
            continue;
        };
        *remaining = remaining.saturating_sub(1);
        if *remaining > 0 {
            continue;
        }

        state.pending_nat_deletions.remove(id);
        if let Some(gateway) = state
            .resources
            .iter_mut()
            .find(|r| r.kind == ResourceKind::NatGateway && &r.id == id)
        {
            gateway.state = Some("deleted".to_string());
        }
    }
}

impl NetworkProvider for InventoryProvider {
    async fn describe(
        &self,
        kind: ResourceKind,
        query: &DescribeQuery,
    ) -> Result<Vec<RawResource>, ProviderError> {
        self.describe_now(kind, query)
    }

    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), ProviderError> {
        self.delete_now(kind, id)
    }

    async fn disassociate_route_table(&self, association_id: &str) -> Result<(), ProviderError> {
        self.disassociate_now(association_id)
    }

    async fn delete_route(
        &self,
        route_table_id: &str,
        destination: &RouteDestination,
    ) -> Result<(), ProviderError> {
        self.delete_route_now(route_table_id, destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::types::{Filter, VPC_ID_FILTER};
    use crate::resources::types::Route;

    fn table() -> RawResource {
        RawResource::new(ResourceKind::RouteTable, "rtb-1")
            .in_vpc("vpc-1")
            .with_association("rtbassoc-b", false)
            .with_route(Route::cidr("0.0.0.0/0", "igw-1"))
            .with_route(Route::cidr("10.0.0.0/16", "local"))
    }

    fn provider(resources: Vec<RawResource>, nat_deletion_polls: u32) -> InventoryProvider {
        InventoryProvider::new(Inventory {
            resources,
            nat_deletion_polls,
        })
    }

    #[tokio::test]
    async fn test_describe_by_filter_and_kind() {
        let provider = provider(
            vec![
                table(),
                RawResource::new(ResourceKind::VpcEndpoint, "vpce-1").in_vpc("vpc-1"),
                RawResource::new(ResourceKind::VpcEndpoint, "vpce-2").in_vpc("vpc-2"),
            ],
            1,
        );

        let query = DescribeQuery::Filter(Filter::new(VPC_ID_FILTER, "vpc-1"));
        let endpoints = provider
            .describe(ResourceKind::VpcEndpoint, &query)
            .await
            .unwrap();
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].id, "vpce-1");
        assert!(!provider.calls()[0].is_mutation());
    }

    #[tokio::test]
    async fn test_describe_unknown_id_is_not_found() {
        let provider = provider(vec![], 1);
        let result = provider
            .describe(
                ResourceKind::NatGateway,
                &DescribeQuery::Ids(vec!["nat-gone".to_string()]),
            )
            .await;
        assert!(matches!(result, Err(ProviderError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_nat_gateway_reports_deleting_then_deleted() {
        let provider = provider(
            vec![RawResource::new(ResourceKind::NatGateway, "nat-1").with_state("available")],
            2,
        );
        provider
            .delete(ResourceKind::NatGateway, "nat-1")
            .await
            .unwrap();

        let ids = DescribeQuery::Ids(vec!["nat-1".to_string()]);
        let first = provider.describe(ResourceKind::NatGateway, &ids).await.unwrap();
        assert_eq!(first[0].state.as_deref(), Some("deleting"));

        let second = provider.describe(ResourceKind::NatGateway, &ids).await.unwrap();
        assert_eq!(second[0].state.as_deref(), Some("deleted"));
    }

    #[tokio::test]
    async fn test_route_table_delete_blocked_by_dependencies() {
        let provider = provider(vec![table()], 1);

        let blocked = provider.delete(ResourceKind::RouteTable, "rtb-1").await;
        assert!(matches!(
            blocked,
            Err(ProviderError::DependencyViolation { .. })
        ));

        provider.disassociate_route_table("rtbassoc-b").await.unwrap();
        provider
            .delete_route("rtb-1", &RouteDestination::Cidr("0.0.0.0/0".to_string()))
            .await
            .unwrap();
        provider
            .delete(ResourceKind::RouteTable, "rtb-1")
            .await
            .unwrap();

        assert!(provider.snapshot().is_empty());
        assert_eq!(provider.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_local_route_and_main_association_are_rejected() {
        let provider = provider(
            vec![table().with_association("rtbassoc-main", true)],
            1,
        );

        let local = provider
            .delete_route("rtb-1", &RouteDestination::Cidr("10.0.0.0/16".to_string()))
            .await;
        assert!(matches!(local, Err(ProviderError::Api { .. })));

        let main = provider.disassociate_route_table("rtbassoc-main").await;
        assert!(matches!(main, Err(ProviderError::Api { .. })));
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = InventoryProvider::from_file(&path);
        assert!(matches!(result, Err(InventoryError::Parse { .. })));

        let missing = InventoryProvider::from_file(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(InventoryError::Io { .. })));
    }

    #[test]
    fn test_inventory_defaults() {
        let inventory: Inventory = serde_json::from_str("{}").unwrap();
        assert!(inventory.resources.is_empty());
        assert_eq!(inventory.nat_deletion_polls, 1);
    }
}
