use netsweep_core::init_logging;

mod app;
mod commands;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app = app::build_cli();
    let matches = app.get_matches();

    // Logs are error-only unless --verbose
    let quiet = !matches.get_flag("verbose");
    init_logging(quiet);

    commands::run_command(&matches).await?;

    Ok(())
}
