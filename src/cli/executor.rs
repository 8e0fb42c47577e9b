//! Dispatches a parsed command.

use super::handlers::{MigrateCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::logger::LogLevelHandle;

/// Applies CLI log level flags to the running logger, then runs the command.
///
/// No subcommand means `serve`.
pub async fn execute_command(
    cli: &Cli,
    settings: Settings,
    log_handle: &LogLevelHandle,
) -> anyhow::Result<()> {
    if let Some(level) = cli.log_level_override() {
        log_handle.set_level(level)?;
        tracing::debug!(
            filter = ?log_handle.current_level(),
            "Log level overridden from command line"
        );
    }

    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings).execute(*dry_run).await
        }
        None => ServeCommandHandler::new(settings).execute(false).await,
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await?;
            Ok(())
        }
    }
}
