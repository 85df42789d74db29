//! Application configuration
//!
//! Loaded in three layers: built-in defaults, an optional `config.toml`, then
//! `WAYFINDER_*` environment variables. Nested keys use a double underscore,
//! e.g. `WAYFINDER_GEOCODING__TIMEOUT_SECS=5`.
//!
//! Split into sub-modules by concern:
//! - `geocoding`: vendor list, timeouts, user agent
//! - `cache`: backend selection and TTL

mod cache;
mod geocoding;

use std::path::Path;

use application::ApplicationError;
use serde::{Deserialize, Serialize};

pub use cache::{CacheBackend, CacheConfig};
pub use geocoding::{GeocodingAppConfig, ProviderEntry};

pub use crate::telemetry::TelemetryConfig;

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "WAYFINDER";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Geocoding vendors and client settings
    #[serde(default)]
    pub geocoding: GeocodingAppConfig,

    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(config::File::with_name("config").required(false))
    }

    /// Load configuration from an explicit file plus the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or a source cannot be parsed.
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        Self::build(config::File::from(path).required(true))
    }

    fn build<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .set_default("geocoding.timeout_secs", 10)?
            .set_default("cache.backend", "memory")?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Configuration`] naming the offending
    /// section.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let sections = [
            ("geocoding", self.geocoding.validate()),
            ("cache", self.cache.validate()),
            ("telemetry", self.telemetry.validate()),
        ];
        for (section, result) in sections {
            result.map_err(|e| ApplicationError::Configuration(format!("{section}: {e}")))?;
        }
        Ok(())
    }
}
