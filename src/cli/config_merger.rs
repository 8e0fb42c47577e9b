//! Applies CLI overrides on top of file and environment configuration.
//!
//! Precedence, lowest first: config files, `LIBRARY_*` variables, CLI flags.
//! Validation runs once, after the overrides.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Settings};

pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the unvalidated base configuration selected by `--config` and `--env`.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = match &cli.config {
            Some(path) => ConfigLoader::from_file(path),
            None => ConfigLoader::new()?,
        };
        if let Some(env) = cli.env {
            loader = loader.with_environment(env.into());
        }
        Ok(Self::new(loader.load_unvalidated()?))
    }

    /// Returns the validated settings with `serve --host/--port` applied.
    ///
    /// Log level flags are not merged here; they are applied to the running
    /// logger by the executor.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if let Some(Commands::Serve { host, port, .. }) = &cli.command {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn base() -> Settings {
        let mut settings = Settings::default();
        settings.database.url = "postgres://localhost/library".to_string();
        settings.jwt.secret = "s".repeat(32);
        settings
    }

    #[test]
    fn test_serve_overrides_host_and_port() {
        let cli = Cli::try_parse_from(["library-rs", "serve", "--host", "0.0.0.0", "--port", "8081"])
            .unwrap();
        let merged = ConfigurationMerger::new(base()).merge_cli_args(&cli).unwrap();
        assert_eq!(merged.server.address(), "0.0.0.0:8081");
    }

    #[test]
    fn test_without_overrides_base_is_kept() {
        let cli = Cli::try_parse_from(["library-rs", "migrate"]).unwrap();
        let merged = ConfigurationMerger::new(base()).merge_cli_args(&cli).unwrap();
        assert_eq!(merged, base());
    }

    #[test]
    fn test_merged_config_is_validated() {
        let mut settings = base();
        settings.jwt.secret.clear();
        let cli = Cli::try_parse_from(["library-rs"]).unwrap();
        assert!(matches!(
            ConfigurationMerger::new(settings).merge_cli_args(&cli),
            Err(ConfigError::ValidationError { field, .. }) if field == "jwt.secret"
        ));
    }

    #[test]
    fn test_from_cli_reads_single_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("library.toml");
        std::fs::write(
            &file,
            "[database]\nurl = \"postgres://db/library\"\n[jwt]\nsecret = \"0123456789abcdef0123456789abcdef\"\n[server]\nport = 4000\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from(["library-rs", "--config", file.to_str().unwrap()]).unwrap();
        let merged = ConfigurationMerger::from_cli(&cli)
            .unwrap()
            .merge_cli_args(&cli)
            .unwrap();
        assert_eq!(merged.server.port, 4000);
        assert_eq!(merged.database.url, "postgres://db/library");
    }
}
