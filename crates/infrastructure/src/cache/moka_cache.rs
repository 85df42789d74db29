//! Moka in-memory cache implementation
//!
//! Thread-safe in-memory cache with size-based eviction. Moka's own TTL is
//! cache-wide, so every value carries its own expiry instant and is treated
//! as absent once that passes.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

use application::{
    error::ApplicationError,
    ports::{CachePort, CacheStats, ttl},
};
use async_trait::async_trait;
use moka::future::Cache;
use tracing::{debug, instrument};

/// Maximum cache size in MB
const DEFAULT_MAX_CAPACITY_MB: u64 = 64;

/// Configuration for Moka cache
#[derive(Debug, Clone, Copy)]
pub struct MokaCacheConfig {
    /// Maximum capacity in megabytes
    pub max_capacity_mb: u64,
    /// Upper bound for any entry's lifetime; per-entry TTLs are capped by it
    pub max_ttl: Duration,
}

impl Default for MokaCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity_mb: DEFAULT_MAX_CAPACITY_MB,
            max_ttl: ttl::MAX,
        }
    }
}

#[derive(Debug, Clone)]
struct StoredValue {
    data: Vec<u8>,
    expires_at: Instant,
}

impl StoredValue {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Moka-based in-memory cache
pub struct MokaCache {
    cache: Cache<String, StoredValue>,
    max_ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for MokaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCache")
            .field("entries", &self.cache.entry_count())
            .field("max_ttl", &self.max_ttl)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl MokaCache {
    /// Create a new Moka cache with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MokaCacheConfig::default())
    }

    /// Create a new Moka cache with custom configuration
    #[must_use]
    pub fn with_config(config: MokaCacheConfig) -> Self {
        let max_capacity_bytes = config.max_capacity_mb * 1024 * 1024;

        let cache = Cache::builder()
            .max_capacity(max_capacity_bytes)
            .time_to_live(config.max_ttl)
            .weigher(|key: &String, value: &StoredValue| -> u32 {
                (key.len() + value.data.len())
                    .try_into()
                    .unwrap_or(u32::MAX)
            })
            .build();

        Self {
            cache,
            max_ttl: config.max_ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn expiry_for(&self, ttl: Duration) -> Instant {
        let now = Instant::now();
        now.checked_add(ttl.min(self.max_ttl)).unwrap_or(now)
    }

    /// Sum of stored key and value sizes
    fn weighted_size(&self) -> u64 {
        self.cache.weighted_size()
    }
}

impl Default for MokaCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CachePort for MokaCache {
    #[instrument(skip(self), level = "debug")]
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, ApplicationError> {
        match self.cache.get(key).await {
            Some(stored) if !stored.is_expired(Instant::now()) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache hit");
                Ok(Some(stored.data))
            },
            Some(_) => {
                self.cache.invalidate(key).await;
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache entry expired");
                Ok(None)
            },
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache miss");
                Ok(None)
            },
        }
    }

    #[instrument(skip(self, value), level = "debug")]
    async fn set_bytes(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), ApplicationError> {
        let stored = StoredValue {
            data: value,
            expires_at: self.expiry_for(ttl),
        };
        self.cache.insert(key.to_string(), stored).await;
        debug!(key = %key, ttl_secs = ttl.as_secs(), "Cache set");
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete(&self, key: &str) -> Result<(), ApplicationError> {
        self.cache.invalidate(key).await;
        debug!(key = %key, "Cache entry deleted");
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn exists(&self, key: &str) -> Result<bool, ApplicationError> {
        Ok(self
            .cache
            .get(key)
            .await
            .is_some_and(|stored| !stored.is_expired(Instant::now())))
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.entry_count(),
            memory_bytes: self.weighted_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use application::ports::CachePortExt;
    use domain::Location;

    use super::*;

    #[tokio::test]
    async fn stores_and_returns_locations() {
        let cache = MokaCache::new();
        let locations = vec![Location::new_unchecked(37.4224, -122.0841)];

        cache
            .set("geocode.Googleplex", &locations, ttl::GEOCODE)
            .await
            .unwrap();

        let cached: Option<Vec<Location>> = cache.get("geocode.Googleplex").await.unwrap();
        assert_eq!(cached, Some(locations));
    }

    #[tokio::test]
    async fn missing_key_is_none_not_error() {
        let cache = MokaCache::new();
        assert!(cache.get_bytes("geocode.nowhere").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn per_entry_ttl_is_honored() {
        let cache = MokaCache::new();
        cache
            .set_bytes("short", b"1".to_vec(), Duration::from_millis(20))
            .await
            .unwrap();
        cache
            .set_bytes("long", b"2".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;

        assert!(cache.get_bytes("short").await.unwrap().is_none());
        assert!(!cache.exists("short").await.unwrap());
        assert_eq!(cache.get_bytes("long").await.unwrap(), Some(b"2".to_vec()));
    }

    #[tokio::test]
    async fn ttl_is_capped_by_cache_limit() {
        let cache = MokaCache::with_config(MokaCacheConfig {
            max_capacity_mb: 1,
            max_ttl: Duration::from_millis(20),
        });
        cache
            .set_bytes("k", b"v".to_vec(), ttl::GEOCODE)
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;

        assert!(cache.get_bytes("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_entry_and_tolerates_missing_keys() {
        let cache = MokaCache::new();
        cache
            .set_bytes("k", b"v".to_vec(), ttl::GEOCODE)
            .await
            .unwrap();

        cache.delete("k").await.unwrap();
        cache.delete("never-set").await.unwrap();

        assert!(!cache.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn overwrite_replaces_value() {
        let cache = MokaCache::new();
        cache.set("k", &"old", ttl::GEOCODE).await.unwrap();
        cache.set("k", &"new", ttl::GEOCODE).await.unwrap();

        let value: Option<String> = cache.get("k").await.unwrap();
        assert_eq!(value.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn stats_tracks_hits_and_misses() {
        let cache = MokaCache::new();
        cache
            .set_bytes("k", b"v".to_vec(), ttl::GEOCODE)
            .await
            .unwrap();

        cache.get_bytes("k").await.unwrap();
        cache.get_bytes("missing1").await.unwrap();
        cache.get_bytes("missing2").await.unwrap();

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
    }

    #[test]
    fn moka_cache_debug() {
        let debug = format!("{:?}", MokaCache::new());
        assert!(debug.contains("MokaCache"));
        assert!(debug.contains("max_ttl"));
    }
}
