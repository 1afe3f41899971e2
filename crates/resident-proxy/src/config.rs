//! Proxy configuration.
//!
//! Loaded from an optional TOML file, then overridden by `RESIDENT_*`
//! environment variables (`__` separates nested keys, e.g.
//! `RESIDENT_PROVIDER__TIMEOUT_MS=5000`).
//!
//! ```toml
//! [envelope]
//! id = "1"
//! version = "v1"
//!
//! [provider]
//! base_url = "http://masterdata.local/v1/masterdata/"
//! timeout_ms = 30000
//!
//! [logging]
//! profile = "production"
//!
//! [[catalog.overrides]]
//! kind = "SCHEMA_NOT_FOUND"
//! code = "KER-MSD-118"
//! message = "ID schema not found"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use resident_core::errors::{CatalogError, ErrorCatalog, ErrorKind};
use resident_core::logging_facility::Profile;
use resident_core::EnvelopeDefaults;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "RESIDENT";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8086/v1/masterdata/";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("configuration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("invalid error catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("invalid provider base url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("provider timeout must be positive")]
    ZeroTimeout,

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub profile: Profile,
}

/// Replacement for one catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogOverride {
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub overrides: Vec<CatalogOverride>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub envelope: EnvelopeDefaults,
    pub provider: ProviderConfig,
    pub logging: LoggingConfig,
    pub catalog: CatalogConfig,
}

impl ProxyConfig {
    /// Load from `path` (if given) and the process environment.
    ///
    /// # Errors
    ///
    /// Fails when the file is missing or malformed, or a value has the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// As [`load`](Self::load), reading overrides from `env` instead of the
    /// process environment when given.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config: ProxyConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider.timeout_ms)
    }

    /// Standard catalog with the configured overrides applied.
    ///
    /// # Errors
    ///
    /// Fails when an override leaves a blank or duplicated code.
    pub fn build_catalog(&self) -> Result<ErrorCatalog, ConfigError> {
        let builder = self
            .catalog
            .overrides
            .iter()
            .fold(ErrorCatalog::standard().to_builder(), |builder, o| {
                builder.register(o.kind, o.code.clone(), o.message.clone())
            });
        Ok(builder.build()?)
    }

    /// Effective configuration as TOML
    ///
    /// # Errors
    ///
    /// Fails only if a value cannot be represented in TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
