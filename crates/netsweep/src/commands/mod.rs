use clap::ArgMatches;
use tracing::error;

use netsweep_core::events;

mod completions;
mod sweep;

pub async fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    let result = match matches.subcommand() {
        Some(("sweep", sub_matches)) => sweep::handle_sweep_command(sub_matches).await,
        Some(("completions", sub_matches)) => {
            completions::handle_completions_command(sub_matches)
        }
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    };

    events::log_app_shutdown();
    result
}
