//! Configuration validation logic
//!
//! Each section validates itself; `Settings::validate` runs them in order and
//! stops at the first failure.

use crate::config::error::ConfigError;
use crate::config::settings::{DatabaseConfig, JwtConfig, LoggerSettings, ServerConfig, Settings};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

const MIN_JWT_SECRET_LEN: usize = 32;

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535.",
            ));
        }
        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }
        if self.keep_alive_timeout == 0 {
            return Err(ConfigError::validation(
                "server.keep_alive_timeout",
                "Keep-alive timeout must be greater than 0 seconds.",
            ));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                "Database URL is required. Set database.url or LIBRARY_DATABASE__URL.",
            ));
        }
        if !(self.url.starts_with("postgres://") || self.url.starts_with("postgresql://")) {
            return Err(ConfigError::validation(
                "database.url",
                "Expected a PostgreSQL URL: postgres://[user:password@]host[:port]/database",
            ));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::validation(
                "database.min_connections",
                format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            ));
        }
        if self.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "database.connection_timeout",
                "Connection timeout must be greater than 0 seconds.",
            ));
        }
        // PostgreSQL reads a lock_timeout of 0 as "wait forever"
        if self.lock_timeout_ms == 0 {
            return Err(ConfigError::validation(
                "database.lock_timeout_ms",
                "Lock timeout must be greater than 0 milliseconds.",
            ));
        }
        Ok(())
    }
}

impl JwtConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::validation("jwt.secret", "JWT secret cannot be empty"));
        }
        if self.secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::validation(
                "jwt.secret",
                format!("JWT secret must be at least {} characters", MIN_JWT_SECRET_LEN),
            ));
        }
        if self.access_token_expiration <= 0 {
            return Err(ConfigError::validation(
                "jwt.access_token_expiration",
                "Access token expiration must be positive",
            ));
        }
        if self.refresh_token_expiration <= self.access_token_expiration {
            return Err(ConfigError::validation(
                "jwt.refresh_token_expiration",
                "Refresh token expiration must be longer than access token expiration",
            ));
        }
        Ok(())
    }
}

impl LoggerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Full EnvFilter directives are allowed; only bare levels are checked.
        let level = self.level.to_lowercase();
        if !level.contains('=') && !level.contains(',') && !VALID_LOG_LEVELS.contains(&level.as_str())
        {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }
        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled",
            ));
        }
        if !VALID_LOG_FORMATS.contains(&self.file.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.file.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }
        if self.file.enabled && self.file.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }
        if self.file.rotation.max_size == 0 || self.file.rotation.max_files == 0 {
            return Err(ConfigError::validation(
                "logger.file.rotation",
                "Rotation max_size and max_files must be greater than 0.",
            ));
        }
        Ok(())
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.jwt.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.database.url = "postgres://localhost/library".to_string();
        settings.jwt.secret = "a".repeat(32);
        settings
    }

    fn failing_field(settings: &Settings) -> String {
        match settings.validate() {
            Err(ConfigError::ValidationError { field, .. }) => field,
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(valid_settings().validate().is_ok());
    }

    #[test]
    fn test_database_url_must_be_postgres() {
        let mut settings = valid_settings();
        settings.database.url = "mysql://localhost/library".to_string();
        assert_eq!(failing_field(&settings), "database.url");
    }

    #[test]
    fn test_min_connections_cannot_exceed_max() {
        let mut settings = valid_settings();
        settings.database.min_connections = 20;
        assert_eq!(failing_field(&settings), "database.min_connections");
    }

    #[test]
    fn test_zero_lock_timeout_rejected() {
        let mut settings = valid_settings();
        settings.database.lock_timeout_ms = 0;
        assert_eq!(failing_field(&settings), "database.lock_timeout_ms");

        settings.database.lock_timeout_ms = 1;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut settings = valid_settings();
        settings.jwt.secret = "short".to_string();
        assert_eq!(failing_field(&settings), "jwt.secret");
    }

    #[test]
    fn test_refresh_must_outlive_access() {
        let mut settings = valid_settings();
        settings.jwt.access_token_expiration = 200;
        assert_eq!(failing_field(&settings), "jwt.refresh_token_expiration");
    }

    #[test]
    fn test_log_level_directives_are_accepted() {
        let mut settings = valid_settings();
        settings.logger.level = "info,library_rs=debug".to_string();
        assert!(settings.validate().is_ok());

        settings.logger.level = "loud".to_string();
        assert_eq!(failing_field(&settings), "logger.level");
    }

    #[test]
    fn test_some_log_output_required() {
        let mut settings = valid_settings();
        settings.logger.console.enabled = false;
        assert_eq!(failing_field(&settings), "logger");
    }
}
