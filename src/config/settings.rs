//! Configuration settings structures
//!
//! Every field has a serde default so partial TOML files and environment
//! overrides deserialize into a complete `Settings`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig, RotationConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "library-rs".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_keep_alive_timeout() -> u64 {
    75
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_lock_timeout_ms() -> u64 {
    5_000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/library.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_max_size() -> u64 {
    10 * 1024 * 1024 // 10MB
}

fn default_max_files() -> usize {
    5
}

fn default_access_token_expiration() -> i64 {
    1
}

fn default_refresh_token_expiration() -> i64 {
    168 // 7 days
}

// ============================================================================
// Application / Server
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Keep-alive timeout in seconds
    #[serde(default = "default_keep_alive_timeout")]
    pub keep_alive_timeout: u64,
}

impl ServerConfig {
    /// Full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            keep_alive_timeout: default_keep_alive_timeout(),
        }
    }
}

// ============================================================================
// Database
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Seconds to wait for a pooled connection
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,

    /// Upper bound on row-lock waits inside a borrow/return transaction
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,

    /// Run pending migrations before serving
    #[serde(default)]
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connection_timeout: default_connection_timeout(),
            lock_timeout_ms: default_lock_timeout_ms(),
            auto_migrate: false,
        }
    }
}

// ============================================================================
// JWT
// ============================================================================

/// JWT authentication configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 signing secret; set it through `LIBRARY_JWT__SECRET` outside development
    #[serde(default)]
    pub secret: String,

    /// Access token lifetime in hours
    #[serde(default = "default_access_token_expiration")]
    pub access_token_expiration: i64,

    /// Refresh token lifetime in hours
    #[serde(default = "default_refresh_token_expiration")]
    pub refresh_token_expiration: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            access_token_expiration: default_access_token_expiration(),
            refresh_token_expiration: default_refresh_token_expiration(),
        }
    }
}

// ============================================================================
// Logger
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            colored: true,
        }
    }
}

/// Size-based rotation of the log file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationSettings {
    /// Bytes written before the file is rotated
    #[serde(default = "default_max_size")]
    pub max_size: u64,

    /// Rotated files kept next to the active one
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            max_files: default_max_files(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    #[serde(default = "default_true")]
    pub append: bool,

    /// "full", "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,

    #[serde(default)]
    pub rotation: RotationSettings,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: true,
            format: default_log_format(),
            rotation: RotationSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Level or full `EnvFilter` directive, e.g. "info,library_rs=debug"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Converts the file representation into the runtime `LoggerConfig`.
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let format = self
            .file
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::validation("logger.file.format", e.to_string()))?;

        let config = LoggerConfig {
            level: self.level,
            console: ConsoleConfig {
                enabled: self.console.enabled,
                colored: self.console.colored,
            },
            file: FileConfig {
                enabled: self.file.enabled,
                path: PathBuf::from(self.file.path),
                append: self.file.append,
                format,
                rotation: RotationConfig {
                    max_size: self.file.rotation.max_size,
                    max_files: self.file.rotation.max_files,
                },
            },
        };

        config
            .validate()
            .map_err(|e| ConfigError::validation("logger", e.to_string()))?;
        Ok(config)
    }
}

// ============================================================================
// Root
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub jwt: JwtConfig,

    #[serde(default)]
    pub logger: LoggerSettings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_settings() -> impl Strategy<Value = Settings> {
        (
            prop_oneof![Just("127.0.0.1".to_string()), Just("0.0.0.0".to_string())],
            1u16..=65535u16,
            1u32..=50u32,
            1u64..=60_000u64,
            "[a-zA-Z0-9]{32,48}",
            1i64..=24i64,
            prop_oneof![Just("json"), Just("full"), Just("compact")],
            any::<bool>(),
        )
            .prop_map(
                |(host, port, max_connections, lock_timeout_ms, secret, access, format, file_enabled)| {
                    let mut settings = Settings::default();
                    settings.server.host = host;
                    settings.server.port = port;
                    settings.database.url = "postgres://localhost/library".to_string();
                    settings.database.max_connections = max_connections;
                    settings.database.lock_timeout_ms = lock_timeout_ms;
                    settings.jwt.secret = secret;
                    settings.jwt.access_token_expiration = access;
                    settings.logger.file.format = format.to_string();
                    settings.logger.file.enabled = file_enabled;
                    settings
                },
            )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Settings written back to TOML load unchanged, so dumped configs are reusable.
        #[test]
        fn prop_settings_survive_toml(settings in arb_settings()) {
            let text = toml::to_string(&settings).expect("serialize settings");
            let parsed: Settings = toml::from_str(&text).expect("deserialize settings");
            prop_assert_eq!(settings, parsed);
        }
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let parsed: Settings = toml::from_str(
            r#"
            [database]
            url = "postgres://localhost/library"
            lock_timeout_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(parsed.database.lock_timeout_ms, 250);
        assert_eq!(parsed.database.max_connections, 10);
        assert_eq!(parsed.server.port, 3000);
        assert_eq!(parsed.jwt.refresh_token_expiration, 168);
        assert_eq!(parsed.application.name, "library-rs");
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            ..ServerConfig::default()
        };
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_into_logger_config_parses_format() {
        let mut logger = LoggerSettings::default();
        logger.file.format = "compact".to_string();
        let config = logger.into_logger_config().unwrap();
        assert_eq!(config.file.format, LogFormat::Compact);
        assert_eq!(config.file.path, PathBuf::from("logs/library.log"));
    }

    #[test]
    fn test_into_logger_config_rejects_unknown_format() {
        let mut logger = LoggerSettings::default();
        logger.file.format = "xml".to_string();
        assert!(matches!(
            logger.into_logger_config(),
            Err(ConfigError::ValidationError { field, .. }) if field == "logger.file.format"
        ));
    }
}
