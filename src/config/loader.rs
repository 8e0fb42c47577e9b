//! Layered configuration loader

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

pub const CONFIG_DIR_ENV: &str = "LIBRARY_CONFIG_DIR";

pub const CONFIG_FILE_ENV: &str = "LIBRARY_CONFIG_FILE";

const DEFAULT_CONFIG_DIR: &str = "config";

const ENV_PREFIX: &str = "LIBRARY";

/// Separator for nested keys: `LIBRARY_DATABASE__URL` -> `database.url`
const ENV_SEPARATOR: &str = "__";

/// Loads `Settings` from TOML files and `LIBRARY_*` environment variables.
///
/// In directory mode the layers are `default.toml` (required),
/// `{environment}.toml` and `local.toml`. In single-file mode only the given
/// file is read. Environment variables always win.
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Creates a loader from `LIBRARY_CONFIG_DIR`, `LIBRARY_CONFIG_FILE` and
    /// `LIBRARY_APP_ENV`.
    ///
    /// # Errors
    ///
    /// The two source variables are mutually exclusive.
    pub fn new() -> Result<Self, ConfigError> {
        let dir = std::env::var(CONFIG_DIR_ENV).ok();
        let file = std::env::var(CONFIG_FILE_ENV).ok();

        if dir.is_some() && file.is_some() {
            return Err(ConfigError::ConflictingSources(format!(
                "{} and {} cannot both be set",
                CONFIG_DIR_ENV, CONFIG_FILE_ENV
            )));
        }

        Ok(Self {
            config_dir: PathBuf::from(dir.unwrap_or_else(|| DEFAULT_CONFIG_DIR.to_string())),
            config_file: file.map(PathBuf::from),
            environment: AppEnvironment::from_env(),
        })
    }

    /// Loader reading exactly one file (the `--config` CLI flag).
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: Some(path.into()),
            environment: AppEnvironment::from_env(),
        }
    }

    /// Replaces the environment layer, e.g. from `--env`.
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Loads and deserializes the layers without validating them.
    ///
    /// CLI overrides are applied on top of this result before validation.
    pub fn load_unvalidated(&self) -> Result<Settings, ConfigError> {
        let mut builder = Config::builder();
        builder = match &self.config_file {
            Some(file) => Self::add_file(builder, file, true)?,
            None => {
                let builder =
                    Self::add_file(builder, &self.config_dir.join("default.toml"), true)?;
                let env_file = self
                    .config_dir
                    .join(format!("{}.toml", self.environment.as_str()));
                let builder = Self::add_file(builder, &env_file, false)?;
                Self::add_file(builder, &self.config_dir.join("local.toml"), false)?
            }
        };

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })
    }

    /// Loads all layers and validates the result.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let settings = self.load_unvalidated()?;
        settings.validate()?;
        Ok(settings)
    }

    fn add_file(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.is_file() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let name = path
            .to_str()
            .ok_or_else(|| ConfigError::ParseError(format!("Non UTF-8 path: {}", path.display())))?;
        Ok(builder.add_source(File::new(name, FileFormat::Toml).required(required)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Tests touching process environment run one at a time
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const BASE: &str = r#"
        [database]
        url = "postgres://localhost/library"

        [jwt]
        secret = "0123456789abcdef0123456789abcdef"
    "#;

    fn config_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().expect("temp dir");
        for (name, content) in files {
            fs::write(dir.path().join(name), content).expect("write config file");
        }
        dir
    }

    fn loader_for(dir: &TempDir, environment: AppEnvironment) -> ConfigLoader {
        ConfigLoader {
            config_dir: dir.path().to_path_buf(),
            config_file: None,
            environment,
        }
    }

    #[test]
    fn test_layers_override_in_order() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = config_dir(&[
            ("default.toml", BASE),
            ("production.toml", "[server]\nport = 8080\nhost = \"0.0.0.0\"\n"),
            ("local.toml", "[server]\nport = 9090\n"),
        ]);

        let settings = loader_for(&dir, AppEnvironment::Production).load().unwrap();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 9090);
    }

    #[test]
    fn test_missing_default_file_is_an_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = config_dir(&[("local.toml", BASE)]);
        assert!(matches!(
            loader_for(&dir, AppEnvironment::Development).load(),
            Err(ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_env_vars_override_files() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = config_dir(&[("default.toml", BASE)]);

        unsafe { std::env::set_var("LIBRARY_DATABASE__LOCK_TIMEOUT_MS", "1234") };
        let result = loader_for(&dir, AppEnvironment::Development).load();
        unsafe { std::env::remove_var("LIBRARY_DATABASE__LOCK_TIMEOUT_MS") };

        assert_eq!(result.unwrap().database.lock_timeout_ms, 1234);
    }

    #[test]
    fn test_single_file_mode_skips_layers() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = config_dir(&[("custom.toml", BASE), ("local.toml", "[server]\nport = 1\n")]);

        let settings = ConfigLoader::from_file(dir.path().join("custom.toml"))
            .load()
            .unwrap();
        assert_eq!(settings.server.port, 3000);
    }

    #[test]
    fn test_dir_and_file_env_are_exclusive() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var(CONFIG_DIR_ENV, "/tmp/a");
            std::env::set_var(CONFIG_FILE_ENV, "/tmp/b.toml");
        }
        let result = ConfigLoader::new();
        unsafe {
            std::env::remove_var(CONFIG_DIR_ENV);
            std::env::remove_var(CONFIG_FILE_ENV);
        }
        assert!(matches!(result, Err(ConfigError::ConflictingSources(_))));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = config_dir(&[("default.toml", "[database]\nurl = \"postgres://x/y\"\n")]);
        // jwt.secret missing
        assert!(matches!(
            loader_for(&dir, AppEnvironment::Development).load(),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
