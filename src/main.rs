use clap::Parser;

use library_rs::cli::{Cli, execute_command, load_settings};
use library_rs::logger::init_logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(&cli).map_err(|e| {
        eprintln!("Configuration error: {}", e);
        e
    })?;

    let log_handle = init_logger(settings.logger.clone().into_logger_config()?)?;

    if let Err(e) = execute_command(&cli, settings, &log_handle).await {
        tracing::error!(error = %e, "Command failed");
        return Err(e);
    }
    Ok(())
}
