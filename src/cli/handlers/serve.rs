//! `serve` subcommand.

use crate::config::Settings;
use crate::error::AppResult;
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Runs the server until shutdown, or only checks the configuration.
    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            self.validate_only()?;
            return Ok(());
        }
        Server::new(self.config).run().await
    }

    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!(
            "✓ Database pool: {}..{} connections, lock timeout {}ms",
            self.config.database.min_connections,
            self.config.database.max_connections,
            self.config.database.lock_timeout_ms
        );
        if self.config.database.auto_migrate {
            println!("✓ Pending migrations would be applied on startup");
        }
        println!("Dry run completed successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/library".to_string();
        config.jwt.secret = "k".repeat(32);
        config
    }

    #[tokio::test]
    async fn test_dry_run_with_valid_config() {
        assert!(ServeCommandHandler::new(valid_config()).execute(true).await.is_ok());
    }

    #[tokio::test]
    async fn test_dry_run_with_invalid_port() {
        let mut config = valid_config();
        config.server.port = 0;
        assert!(ServeCommandHandler::new(config).execute(true).await.is_err());
    }
}
