use chrono::Utc;
use futures::future::join_all;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::deletion::{endpoints, nat_gateways, peering, route_tables};
use crate::eligibility::{self, EligibilityPolicy};
use crate::provider::traits::NetworkProvider;
use crate::resources::tags::TagEvaluator;
use crate::resources::types::{Expirable, ResourceKind, ScopeId};
use crate::sweep::operations;
use crate::sweep::types::{KindReport, SweepOptions, SweepReport};

/// Run one sweep pass over `scope`.
///
/// Kinds are processed in [`ResourceKind::SWEEP_ORDER`]. A kind whose describe
/// fails is recorded and skipped; the pass itself never fails.
pub async fn run_sweep<P: NetworkProvider>(
    provider: &P,
    evaluator: &dyn TagEvaluator,
    scope: &ScopeId,
    options: &SweepOptions,
    cancel: &CancellationToken,
) -> SweepReport {
    info!(
        event = "core.sweep.started",
        scope = %scope,
        dry_run = options.dry_run,
        disable_ttl_check = options.disable_ttl_check
    );

    let start = Instant::now();
    let snapshot_at = Utc::now();
    let policy = EligibilityPolicy {
        now: snapshot_at,
        ttl_tag_name: options.ttl_tag_name.clone(),
        disable_ttl_check: options.disable_ttl_check,
    };

    let mut report = SweepReport::new(scope.clone(), options.dry_run);

    for kind in ResourceKind::SWEEP_ORDER {
        if cancel.is_cancelled() {
            info!(
                event = "core.sweep.cancelled",
                scope = %scope,
                next_kind = %kind
            );
            report.cancelled = true;
            break;
        }

        let kind_report = sweep_kind(provider, evaluator, scope, kind, options, &policy, cancel).await;
        report.kinds.push(kind_report);
    }

    if cancel.is_cancelled() {
        report.cancelled = true;
    }
    report.elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    info!(
        event = "core.sweep.completed",
        scope = %scope,
        examined = report.examined(),
        eligible = report.eligible(),
        deleted = report.deleted(),
        failed = report.failed(),
        cancelled = report.cancelled,
        elapsed_ms = report.elapsed_ms
    );

    report
}

/// Run independent sweep passes for `scopes` concurrently over one provider.
pub async fn run_sweeps<P: NetworkProvider>(
    provider: &P,
    evaluator: &dyn TagEvaluator,
    scopes: &[ScopeId],
    options: &SweepOptions,
    cancel: &CancellationToken,
) -> Vec<SweepReport> {
    join_all(
        scopes
            .iter()
            .map(|scope| run_sweep(provider, evaluator, scope, options, cancel)),
    )
    .await
}

async fn sweep_kind<P: NetworkProvider>(
    provider: &P,
    evaluator: &dyn TagEvaluator,
    scope: &ScopeId,
    kind: ResourceKind,
    options: &SweepOptions,
    policy: &EligibilityPolicy,
    cancel: &CancellationToken,
) -> KindReport {
    let resources = match operations::collect(
        provider,
        evaluator,
        scope,
        kind,
        &options.ttl_tag_name,
        policy.now,
    )
    .await
    {
        Ok(resources) => resources,
        Err(e) => {
            error!(
                event = "core.sweep.query_failed",
                kind = %kind,
                scope = %scope,
                error = %e
            );
            return KindReport::query_failed(kind, e);
        }
    };

    let (eligible, kept) = eligibility::partition(&resources, policy);

    let mut report = KindReport::new(kind);
    report.examined = resources.len();
    report.eligible = eligible.len();
    report.candidates = eligible.iter().map(|r| r.identifier().to_string()).collect();
    report.kept = kept;

    info!(
        event = "core.sweep.kind_filtered",
        kind = %kind,
        scope = %scope,
        ttl_tag = %policy.ttl_tag_name,
        examined = report.examined,
        eligible = report.eligible,
        kept = report.kept.len()
    );

    // The only place mutations are gated.
    if options.dry_run || eligible.is_empty() {
        return report;
    }

    match kind {
        ResourceKind::PeeringConnection => {
            let connections = operations::peering_connections(&eligible);
            report.add_records(peering::delete_peering_connections(provider, &connections, cancel).await);
        }
        ResourceKind::VpcEndpoint => {
            let items = operations::vpc_endpoints(&eligible);
            report.add_records(endpoints::delete_vpc_endpoints(provider, &items, cancel).await);
        }
        ResourceKind::NatGateway => {
            let gateways = operations::nat_gateways(&eligible);
            let pass =
                nat_gateways::delete_nat_gateways(provider, &gateways, &options.wait, cancel).await;
            report.add_records(pass.records);
            report.set_wait(pass.wait);
        }
        ResourceKind::RouteTable => {
            let tables = operations::route_tables(&eligible);
            report.add_records(route_tables::delete_route_tables(provider, &tables, cancel).await);
        }
    }

    report
}
