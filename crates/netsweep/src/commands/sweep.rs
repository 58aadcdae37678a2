use std::path::PathBuf;

use clap::ArgMatches;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use netsweep_core::config::loading::merge_configs;
use netsweep_core::config::{NetsweepConfig, SweepConfig, WaitConfig};
use netsweep_core::{InventoryProvider, ScopeId, SweepReport, events, sweep_ops};

pub(crate) async fn handle_sweep_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(matches)?;

    let scopes: Vec<ScopeId> = matches
        .get_many::<String>("vpc")
        .ok_or("At least one --vpc is required")?
        .map(|vpc| ScopeId::new(vpc.as_str()))
        .collect();
    let inventory_path = matches
        .get_one::<PathBuf>("inventory")
        .ok_or("Inventory argument is required")?;
    let json_output = matches.get_flag("json");

    let provider = InventoryProvider::from_file(inventory_path).inspect_err(|e| {
        error!(
            event = "cli.sweep_failed",
            path = %inventory_path.display(),
            error = %e
        );
        events::log_app_error(e);
    })?;

    let options = config.sweep_options();
    let evaluator = config.tag_evaluator();

    info!(
        event = "cli.sweep_started",
        scopes = scopes.len(),
        dry_run = options.dry_run
    );

    let cancel = CancellationToken::new();
    let interrupt = cancel_on_ctrl_c(cancel.clone());

    let reports =
        sweep_ops::run_sweeps(&provider, &evaluator, &scopes, &options, &cancel).await;
    interrupt.abort();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_reports(&reports, &options.ttl_tag_name);
    }

    events::log_sweep_reports(&reports);
    info!(
        event = "cli.sweep_completed",
        scopes = reports.len(),
        deleted = reports.iter().map(SweepReport::deleted).sum::<usize>(),
        failed = reports.iter().map(SweepReport::failed).sum::<usize>()
    );

    Ok(())
}

/// Config file hierarchy with command-line flags applied on top.
fn load_config(matches: &ArgMatches) -> Result<NetsweepConfig, Box<dyn std::error::Error>> {
    let file_config = NetsweepConfig::load_hierarchy().inspect_err(|e| {
        error!(event = "cli.config_load_failed", error = %e);
    })?;

    let cli_config = NetsweepConfig {
        sweep: SweepConfig {
            ttl_tag_name: matches.get_one::<String>("ttl-tag").cloned(),
            disable_ttl_check: matches.get_flag("disable-ttl-check").then_some(true),
            dry_run: matches.get_flag("dry-run").then_some(true),
        },
        wait: WaitConfig {
            poll_interval_secs: matches.get_one::<u64>("poll-interval").copied(),
            max_wait_secs: matches.get_one::<u64>("max-wait").copied(),
        },
        ..NetsweepConfig::default()
    };

    let config = merge_configs(file_config, cli_config);
    config.validate().inspect_err(|e| {
        error!(event = "cli.config_invalid", error = %e);
        events::log_app_error(e);
    })?;
    Ok(config)
}

fn cancel_on_ctrl_c(cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!(event = "cli.sweep_interrupted");
            eprintln!("Interrupted, finishing the current step...");
            cancel.cancel();
        }
    })
}

fn print_reports(reports: &[SweepReport], ttl_tag_name: &str) {
    for report in reports {
        println!("{}", report);

        let errors = report.errors();
        if !errors.is_empty() {
            println!("  Problems:");
            for error in errors {
                println!("    - {}", error);
            }
        }

        if report.dry_run {
            for kind in &report.kinds {
                if !kind.candidates.is_empty() {
                    println!(
                        "  Would delete {}: {}",
                        kind.kind.display_name(),
                        kind.candidates.join(", ")
                    );
                }
                for kept in &kind.kept {
                    println!(
                        "  Keeping {} {}: {}",
                        kind.kind.display_name(),
                        kept.id,
                        kept.verdict.describe(ttl_tag_name)
                    );
                }
            }
        }
        println!();
    }
}
