//! NAT gateway deletion.
//!
//! Deletes are accepted synchronously but complete asynchronously, so the
//! pass ends with one batched wait over every gateway still going away.

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::deletion::types::{DeletionRecord, SkipReason};
use crate::deletion::{cancelled_guard, protected_guard};
use crate::provider::traits::NetworkProvider;
use crate::resources::types::{Expirable, NatGateway, NatGatewayState, ResourceKind};
use crate::sweep::errors::{MutationOp, SweepError};
use crate::watcher::{self, WaitOutcome, WaitPolicy};

const KIND: ResourceKind = ResourceKind::NatGateway;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NatGatewayPass {
    pub records: Vec<DeletionRecord>,
    pub wait: WaitOutcome,
}

pub async fn delete_nat_gateways<P: NetworkProvider>(
    provider: &P,
    gateways: &[NatGateway],
    policy: &WaitPolicy,
    cancel: &CancellationToken,
) -> NatGatewayPass {
    let mut records = Vec::with_capacity(gateways.len());
    let mut awaiting: Vec<String> = Vec::new();

    for gateway in gateways {
        let id = gateway.identifier();

        if let Some(record) = cancelled_guard(KIND, gateway, cancel) {
            records.push(record);
            continue;
        }
        if let Some(record) = protected_guard(KIND, gateway) {
            records.push(record);
            continue;
        }

        match gateway.state {
            NatGatewayState::Deleted => {
                debug!(event = "core.deletion.nat_gateway_skip_deleted", id = id);
                records.push(DeletionRecord::skipped(
                    KIND,
                    id,
                    SkipReason::AlreadyGone {
                        status: gateway.state.as_str().to_string(),
                    },
                ));
                continue;
            }
            // Still has to be waited for before route tables are touched.
            NatGatewayState::Deleting => {
                debug!(event = "core.deletion.nat_gateway_already_deleting", id = id);
                records.push(DeletionRecord::skipped(
                    KIND,
                    id,
                    SkipReason::AlreadyGone {
                        status: gateway.state.as_str().to_string(),
                    },
                ));
                awaiting.push(id.to_string());
                continue;
            }
            // Terminal for the watcher, but a failed gateway stays listed until
            // it is deleted explicitly.
            NatGatewayState::Failed => {
                debug!(event = "core.deletion.nat_gateway_failed_state_delete", id = id);
            }
            NatGatewayState::Pending | NatGatewayState::Available | NatGatewayState::Other(_) => {}
        }

        match provider.delete(KIND, id).await {
            Ok(()) => {
                info!(event = "core.deletion.nat_gateway_delete_initiated", id = id);
                records.push(DeletionRecord::deleted(KIND, id));
                awaiting.push(id.to_string());
            }
            Err(source) => {
                error!(
                    event = "core.deletion.nat_gateway_delete_failed",
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

    let wait = watcher::await_deletion(provider, KIND, &awaiting, policy, cancel).await;

    NatGatewayPass { records, wait }
}
