//! Cache configuration.

use std::{path::PathBuf, time::Duration};

use application::ports::ttl;
use serde::{Deserialize, Serialize};

/// Where cached geocoding answers are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// In-process Moka cache, lost on restart
    #[default]
    Memory,
    /// Embedded redb file
    Redb,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,

    /// Database file for the redb backend
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,

    /// How long geocoding answers stay cached in seconds (default: 24 hours)
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Memory budget of the in-memory backend in megabytes
    #[serde(default = "default_max_capacity_mb")]
    pub max_capacity_mb: u64,
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("data/geocode_cache.redb")
}

const fn default_ttl_secs() -> u64 {
    ttl::GEOCODE.as_secs()
}

const fn default_max_capacity_mb() -> u64 {
    64
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            path: default_cache_path(),
            ttl_secs: default_ttl_secs(),
            max_capacity_mb: default_max_capacity_mb(),
        }
    }
}

impl CacheConfig {
    /// TTL applied to geocoding answers
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Validate the cache section
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.ttl_secs == 0 {
            return Err("ttl_secs must be greater than zero".to_string());
        }
        if self.ttl() > ttl::MAX {
            return Err(format!(
                "ttl_secs must not exceed {} seconds",
                ttl::MAX.as_secs()
            ));
        }
        if self.max_capacity_mb == 0 {
            return Err("max_capacity_mb must be greater than zero".to_string());
        }
        if self.backend == CacheBackend::Redb && self.path.as_os_str().is_empty() {
            return Err("path is required for the redb backend".to_string());
        }
        Ok(())
    }
}
