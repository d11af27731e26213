//! Runtime settings.
//!
//! Values are layered, later sources winning:
//! 1. built-in defaults
//! 2. `fortuna.toml` (or the file given with `--config`), if present
//! 3. `FORTUNA_*` environment variables; nested keys use `__`,
//!    e.g. `FORTUNA_CLIENT__REFRESH_ON_FORBIDDEN=false`

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use fortuna_application::ClientConfig;
use fortuna_infrastructure::{DEFAULT_TIMEOUT_MS, FileTokenStore, TransportConfig};
use serde::Deserialize;
use url::Url;

/// Default backend URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Default settings file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "fortuna.toml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "FORTUNA";

/// Settings loading errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A source could not be read or a value has the wrong type.
    #[error("invalid settings: {0}")]
    Config(#[from] config::ConfigError),

    /// No credentials path configured and no home directory to default to.
    #[error("cannot determine credentials path; set FORTUNA_CREDENTIALS_PATH")]
    NoCredentialsPath,
}

/// Everything the binary needs to build a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend base URL.
    pub base_url: Url,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Where credentials are persisted. `None` means `~/.fortuna/credentials.json`.
    pub credentials_path: Option<PathBuf>,
    /// Client behaviour and endpoint paths.
    pub client: ClientConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            credentials_path: None,
            client: ClientConfig::default(),
        }
    }
}

#[allow(clippy::expect_used)]
fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}

impl Settings {
    /// Loads settings from `file` (or `fortuna.toml`) and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed.
    pub fn load(file: Option<&Path>) -> Result<Self, SettingsError> {
        Self::from_sources(file, Self::environment())
    }

    /// Loads settings from an explicit file and environment source.
    ///
    /// A missing file is not an error unless it was named explicitly.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed.
    pub fn from_sources(file: Option<&Path>, env: Environment) -> Result<Self, SettingsError> {
        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        let settings = Config::builder()
            .add_source(file_source)
            .add_source(env)
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// The `FORTUNA_*` environment source.
    #[must_use]
    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Transport settings derived from these settings.
    #[must_use]
    pub fn transport(&self) -> TransportConfig {
        TransportConfig::new(self.base_url.clone()).with_timeout_ms(self.timeout_ms)
    }

    /// The configured credentials path, or the per-user default.
    ///
    /// # Errors
    ///
    /// Returns `NoCredentialsPath` when neither is available.
    pub fn credentials_path(&self) -> Result<PathBuf, SettingsError> {
        self.credentials_path
            .clone()
            .or_else(FileTokenStore::default_path)
            .ok_or(SettingsError::NoCredentialsPath)
    }
}
