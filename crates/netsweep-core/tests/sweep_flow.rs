//! End-to-end sweep passes against a scripted provider.

mod common;

use std::time::Duration;

use common::{Call, ScriptedProvider, expired};
use netsweep_core::provider::{ACCEPTER_VPC_FILTER, DescribeQuery};
use netsweep_core::resources::{ResourceKind, Route, ScopeId, StandardTagEvaluator};
use netsweep_core::sweep::{SweepOptions, run_sweep, run_sweeps};
use netsweep_core::watcher::{WaitOutcome, WaitPolicy};
use tokio_util::sync::CancellationToken;

fn options() -> SweepOptions {
    SweepOptions {
        wait: WaitPolicy {
            poll_interval: Duration::from_secs(2),
            max_wait: Duration::from_secs(10),
        },
        ..SweepOptions::default()
    }
}

fn scope() -> ScopeId {
    ScopeId::from("vpc-1")
}

fn full_vpc() -> Vec<netsweep_core::provider::RawResource> {
    vec![
        expired(ResourceKind::PeeringConnection, "pcx-1").with_peers("vpc-1", "vpc-2"),
        expired(ResourceKind::VpcEndpoint, "vpce-1"),
        expired(ResourceKind::NatGateway, "nat-1").with_state("available"),
        expired(ResourceKind::RouteTable, "rtb-1")
            .with_association("assoc-b", false)
            .with_route(Route::cidr("0.0.0.0/0", "nat-1")),
    ]
}

#[tokio::test(start_paused = true)]
async fn test_dry_run_reports_without_mutating() {
    let gateways = (1..=5)
        .map(|i| expired(ResourceKind::NatGateway, &format!("nat-{}", i)).with_state("available"))
        .collect();
    let provider = ScriptedProvider::new(gateways);
    let options = SweepOptions {
        dry_run: true,
        ..options()
    };

    let report = run_sweep(
        &provider,
        &StandardTagEvaluator::default(),
        &scope(),
        &options,
        &CancellationToken::new(),
    )
    .await;

    assert_eq!(report.eligible(), 5);
    assert_eq!(report.deleted(), 0);
    let nat = report.kind(ResourceKind::NatGateway).unwrap();
    assert_eq!(nat.eligible, 5);
    assert_eq!(nat.candidates.len(), 5);
    assert!(nat.wait.is_none());
    assert!(provider.mutations().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_protected_resources_get_no_mutations() {
    let resources = full_vpc()
        .into_iter()
        .map(|r| r.with_tag("do_not_delete", "true"))
        .collect();
    let provider = ScriptedProvider::new(resources);
    let options = SweepOptions {
        disable_ttl_check: true,
        ..options()
    };

    let report = run_sweep(
        &provider,
        &StandardTagEvaluator::default(),
        &scope(),
        &options,
        &CancellationToken::new(),
    )
    .await;

    assert_eq!(report.examined(), 4);
    assert_eq!(report.eligible(), 0);
    assert!(provider.mutations().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_full_pass_deletes_in_dependency_order() {
    let provider = ScriptedProvider::new(full_vpc()).with_nat_script(&["deleting", "deleted"]);

    let report = run_sweep(
        &provider,
        &StandardTagEvaluator::default(),
        &scope(),
        &options(),
        &CancellationToken::new(),
    )
    .await;

    assert_eq!(report.deleted(), 4);
    assert_eq!(report.failed(), 0);
    assert_eq!(
        report.kind(ResourceKind::NatGateway).unwrap().wait,
        Some(WaitOutcome::Completed { polls: 2 })
    );

    // Route table work starts only after the last NAT gateway poll.
    let calls = provider.calls();
    let last_nat_poll = calls
        .iter()
        .rposition(|c| {
            matches!(
                c,
                Call::Describe {
                    kind: ResourceKind::NatGateway,
                    query: DescribeQuery::Ids(_)
                }
            )
        })
        .unwrap();
    let first_table_mutation = calls
        .iter()
        .position(|c| *c == Call::Disassociate("assoc-b".to_string()))
        .unwrap();
    assert!(last_nat_poll < first_table_mutation);

    let kinds: Vec<ResourceKind> = calls
        .iter()
        .filter_map(|c| match c {
            Call::Delete { kind, .. } => Some(*kind),
            _ => None,
        })
        .collect();
    assert_eq!(kinds, ResourceKind::SWEEP_ORDER.to_vec());
}

#[tokio::test(start_paused = true)]
async fn test_query_failure_skips_only_that_kind() {
    let provider = ScriptedProvider::new(full_vpc()).failing_describe(ResourceKind::VpcEndpoint);

    let report = run_sweep(
        &provider,
        &StandardTagEvaluator::default(),
        &scope(),
        &options(),
        &CancellationToken::new(),
    )
    .await;

    let endpoints = report.kind(ResourceKind::VpcEndpoint).unwrap();
    assert!(endpoints.query_error.is_some());
    assert_eq!(endpoints.examined, 0);
    assert_eq!(report.kind(ResourceKind::RouteTable).unwrap().deleted, 1);
    assert_eq!(report.kind(ResourceKind::NatGateway).unwrap().deleted, 1);
    assert_eq!(report.deleted(), 3);
    assert_eq!(report.errors().len(), 1);
}

#[tokio::test]
async fn test_peering_connection_matched_by_both_roles_is_deleted_once() {
    let provider = ScriptedProvider::new(vec![
        expired(ResourceKind::PeeringConnection, "pcx-self").with_peers("vpc-1", "vpc-1"),
        expired(ResourceKind::PeeringConnection, "pcx-in").with_peers("vpc-7", "vpc-1"),
    ]);

    let report = run_sweep(
        &provider,
        &StandardTagEvaluator::default(),
        &scope(),
        &options(),
        &CancellationToken::new(),
    )
    .await;

    let peering = report.kind(ResourceKind::PeeringConnection).unwrap();
    assert_eq!(peering.examined, 2);
    assert_eq!(
        provider.mutations(),
        vec![
            Call::Delete {
                kind: ResourceKind::PeeringConnection,
                id: "pcx-self".to_string()
            },
            Call::Delete {
                kind: ResourceKind::PeeringConnection,
                id: "pcx-in".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn test_accepter_query_failure_falls_back_to_requester_results() {
    let provider = ScriptedProvider::new(vec![
        expired(ResourceKind::PeeringConnection, "pcx-out").with_peers("vpc-1", "vpc-2"),
        expired(ResourceKind::PeeringConnection, "pcx-in").with_peers("vpc-2", "vpc-1"),
    ])
    .failing_filter(ACCEPTER_VPC_FILTER);

    let report = run_sweep(
        &provider,
        &StandardTagEvaluator::default(),
        &scope(),
        &options(),
        &CancellationToken::new(),
    )
    .await;

    let peering = report.kind(ResourceKind::PeeringConnection).unwrap();
    assert!(peering.query_error.is_none());
    assert_eq!(peering.candidates, vec!["pcx-out".to_string()]);
    assert_eq!(peering.deleted, 1);
}

#[tokio::test(start_paused = true)]
async fn test_nat_wait_timeout_is_a_warning_and_route_tables_still_run() {
    let provider = ScriptedProvider::new(full_vpc()).with_nat_script(&["deleting"]);

    let report = run_sweep(
        &provider,
        &StandardTagEvaluator::default(),
        &scope(),
        &options(),
        &CancellationToken::new(),
    )
    .await;

    let nat = report.kind(ResourceKind::NatGateway).unwrap();
    assert_eq!(nat.warnings.len(), 1);
    assert!(matches!(nat.wait, Some(WaitOutcome::TimedOut { .. })));
    assert_eq!(report.kind(ResourceKind::RouteTable).unwrap().deleted, 1);
    assert_eq!(report.failed(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_nat_wait_stops_before_route_tables() {
    let provider = ScriptedProvider::new(full_vpc()).with_nat_script(&["deleting"]);
    let cancel = CancellationToken::new();
    let evaluator = StandardTagEvaluator::default();
    let scope = scope();
    let options = options();

    let (report, ()) = tokio::join!(
        run_sweep(&provider, &evaluator, &scope, &options, &cancel),
        async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            cancel.cancel();
        }
    );

    assert!(report.cancelled);
    assert!(matches!(
        report.kind(ResourceKind::NatGateway).unwrap().wait,
        Some(WaitOutcome::Cancelled { .. })
    ));
    assert!(report.kind(ResourceKind::RouteTable).is_none());
    assert!(
        !provider
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Disassociate(_)))
    );
}

#[tokio::test(start_paused = true)]
async fn test_scopes_are_swept_independently() {
    let provider = ScriptedProvider::new(vec![
        expired(ResourceKind::VpcEndpoint, "vpce-1"),
        expired(ResourceKind::VpcEndpoint, "vpce-2").in_vpc("vpc-2"),
    ]);
    let scopes = vec![ScopeId::from("vpc-1"), ScopeId::from("vpc-2")];

    let reports = run_sweeps(
        &provider,
        &StandardTagEvaluator::default(),
        &scopes,
        &options(),
        &CancellationToken::new(),
    )
    .await;

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].scope, scopes[0]);
    assert_eq!(reports[1].scope, scopes[1]);
    for report in &reports {
        assert_eq!(report.kind(ResourceKind::VpcEndpoint).unwrap().deleted, 1);
    }

    let json = serde_json::to_value(&reports).unwrap();
    assert_eq!(json[1]["scope"], "vpc-2");
    assert_eq!(json[1]["kinds"][1]["kind"], "vpc_endpoint");
}
