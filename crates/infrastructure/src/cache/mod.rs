//! Cache implementations
//!
//! Provides caching adapters for the application layer:
//! - `MokaCache`: in-memory cache with per-entry expiry
//! - `RedbCache`: embedded persistent cache

mod moka_cache;
mod redb_cache;

use std::sync::Arc;

use application::{error::ApplicationError, ports::CachePort};
use tracing::info;

pub use moka_cache::{MokaCache, MokaCacheConfig};
pub use redb_cache::RedbCache;

use crate::config::{CacheBackend, CacheConfig};

/// Open the cache backend selected by the configuration
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the redb file cannot
/// be opened.
pub fn build_cache(config: &CacheConfig) -> Result<Arc<dyn CachePort>, ApplicationError> {
    config.validate().map_err(ApplicationError::Configuration)?;

    let cache: Arc<dyn CachePort> = match config.backend {
        CacheBackend::Memory => Arc::new(MokaCache::with_config(MokaCacheConfig {
            max_capacity_mb: config.max_capacity_mb,
            ..MokaCacheConfig::default()
        })),
        CacheBackend::Redb => Arc::new(RedbCache::new(&config.path)?),
    };

    info!(backend = ?config.backend, ttl_secs = config.ttl_secs, "Geocoding cache ready");
    Ok(cache)
}
