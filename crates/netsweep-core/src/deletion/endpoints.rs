//! VPC endpoint deletion: one fire-and-forget delete per endpoint.

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::deletion::types::DeletionRecord;
use crate::deletion::{cancelled_guard, protected_guard};
use crate::provider::traits::NetworkProvider;
use crate::resources::types::{Expirable, ResourceKind, VpcEndpoint};
use crate::sweep::errors::{MutationOp, SweepError};

const KIND: ResourceKind = ResourceKind::VpcEndpoint;

pub async fn delete_vpc_endpoints<P: NetworkProvider>(
    provider: &P,
    endpoints: &[VpcEndpoint],
    cancel: &CancellationToken,
) -> Vec<DeletionRecord> {
    let mut records = Vec::with_capacity(endpoints.len());

    for endpoint in endpoints {
        let id = endpoint.identifier();

        if let Some(record) = cancelled_guard(KIND, endpoint, cancel) {
            records.push(record);
            continue;
        }
        if let Some(record) = protected_guard(KIND, endpoint) {
            records.push(record);
            continue;
        }

        match provider.delete(KIND, id).await {
            Ok(()) => {
                info!(event = "core.deletion.endpoint_delete_completed", id = id);
                records.push(DeletionRecord::deleted(KIND, id));
            }
            Err(source) => {
                error!(
                    event = "core.deletion.endpoint_delete_failed",
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
