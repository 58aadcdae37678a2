//! Shared test provider: a fixed resource set with a call journal, injected
//! failures, and a scripted NAT gateway state sequence.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{Duration, Utc};
use netsweep_core::provider::{DescribeQuery, NetworkProvider, ProviderError, RawResource};
use netsweep_core::resources::{ResourceKind, RouteDestination};
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Describe {
        kind: ResourceKind,
        query: DescribeQuery,
    },
    Delete {
        kind: ResourceKind,
        id: String,
    },
    Disassociate(String),
    DeleteRoute(String, String),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Call::Describe { .. })
    }
}

#[derive(Default)]
pub struct ScriptedProvider {
    resources: Vec<RawResource>,
    /// States reported for NAT gateways on successive describe-by-id polls;
    /// the last entry repeats.
    nat_script: Vec<String>,
    failing_kinds: HashSet<ResourceKind>,
    failing_filters: HashSet<String>,
    failing_targets: HashSet<String>,
    fail_id_describes: bool,
    journal: Mutex<Vec<(Instant, Call)>>,
    polls: Mutex<usize>,
}

impl ScriptedProvider {
    pub fn new(resources: Vec<RawResource>) -> Self {
        Self {
            resources,
            nat_script: vec!["deleted".to_string()],
            ..Self::default()
        }
    }

    pub fn with_nat_script(mut self, states: &[&str]) -> Self {
        self.nat_script = states.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Every describe of `kind` fails.
    pub fn failing_describe(mut self, kind: ResourceKind) -> Self {
        self.failing_kinds.insert(kind);
        self
    }

    /// Describes with this filter key fail.
    pub fn failing_filter(mut self, key: &str) -> Self {
        self.failing_filters.insert(key.to_string());
        self
    }

    /// Describe-by-id calls fail.
    pub fn failing_id_describes(mut self) -> Self {
        self.fail_id_describes = true;
        self
    }

    /// Mutations targeting this id (resource, association, or route
    /// destination) fail.
    pub fn failing_mutation(mut self, target: &str) -> Self {
        self.failing_targets.insert(target.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.journal
            .lock()
            .unwrap()
            .iter()
            .map(|(_, call)| call.clone())
            .collect()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn timed_calls(&self) -> Vec<(Instant, Call)> {
        self.journal.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.journal.lock().unwrap().push((Instant::now(), call));
    }

    fn mutation_result(&self, target: &str) -> Result<(), ProviderError> {
        if self.failing_targets.contains(target) {
            Err(ProviderError::api("InjectedFailure", format!("{} refused", target)))
        } else {
            Ok(())
        }
    }

    fn next_nat_state(&self) -> String {
        let mut polls = self.polls.lock().unwrap();
        let index = (*polls).min(self.nat_script.len().saturating_sub(1));
        *polls += 1;
        self.nat_script
            .get(index)
            .cloned()
            .unwrap_or_else(|| "deleted".to_string())
    }
}

impl NetworkProvider for ScriptedProvider {
    async fn describe(
        &self,
        kind: ResourceKind,
        query: &DescribeQuery,
    ) -> Result<Vec<RawResource>, ProviderError> {
        self.record(Call::Describe {
            kind,
            query: query.clone(),
        });

        if self.failing_kinds.contains(&kind) {
            return Err(ProviderError::api("Throttling", "rate exceeded"));
        }

        match query {
            DescribeQuery::Filter(filter) => {
                if self.failing_filters.contains(&filter.key) {
                    return Err(ProviderError::api("InvalidFilter", filter.key.clone()));
                }
                Ok(self
                    .resources
                    .iter()
                    .filter(|r| r.kind == kind && r.matches_filter(filter))
                    .cloned()
                    .collect())
            }
            DescribeQuery::Ids(ids) => {
                if self.fail_id_describes {
                    return Err(ProviderError::NotFound {
                        id: ids.join(","),
                    });
                }
                let state = (kind == ResourceKind::NatGateway).then(|| self.next_nat_state());
                Ok(self
                    .resources
                    .iter()
                    .filter(|r| r.kind == kind && ids.contains(&r.id))
                    .cloned()
                    .map(|mut r| {
                        if let Some(state) = &state {
                            r.state = Some(state.clone());
                        }
                        r
                    })
                    .collect())
            }
        }
    }

    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), ProviderError> {
        self.record(Call::Delete {
            kind,
            id: id.to_string(),
        });
        self.mutation_result(id)
    }

    async fn disassociate_route_table(&self, association_id: &str) -> Result<(), ProviderError> {
        self.record(Call::Disassociate(association_id.to_string()));
        self.mutation_result(association_id)
    }

    async fn delete_route(
        &self,
        route_table_id: &str,
        destination: &RouteDestination,
    ) -> Result<(), ProviderError> {
        self.record(Call::DeleteRoute(
            route_table_id.to_string(),
            destination.as_str().to_string(),
        ));
        self.mutation_result(destination.as_str())
    }
}

/// A resource in `vpc-1` whose one-minute TTL ran out an hour ago.
pub fn expired(kind: ResourceKind, id: &str) -> RawResource {
    RawResource::new(kind, id)
        .in_vpc("vpc-1")
        .created_at(Utc::now() - Duration::hours(1))
        .with_tag("ttl", "60")
}
