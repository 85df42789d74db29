//! Cache port definition
//!
//! Defines the key/value store the geocoding service reads through and
//! writes back to. Implementations may be in-memory (Moka) or embedded and
//! persistent (redb).

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Separator placed between the parts of a cache key
pub const KEY_SEPARATOR: &str = ".";

/// Cache port for storing and retrieving cached values
///
/// Values are stored as raw bytes - callers handle serialization.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CachePort: Send + Sync + std::fmt::Debug {
    /// Get a cached value by key
    ///
    /// `Ok(None)` means the key is absent or expired. `Err` is reserved for
    /// backend failures.
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, ApplicationError>;

    /// Set a cached value with a time-to-live
    ///
    /// If the key already exists, its value and TTL are replaced.
    async fn set_bytes(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), ApplicationError>;

    /// Delete a single cache entry; deleting a missing key is not an error
    async fn delete(&self, key: &str) -> Result<(), ApplicationError>;

    /// Check if a live entry exists without decoding it
    async fn exists(&self, key: &str) -> Result<bool, ApplicationError>;

    /// Get cache statistics (hits, misses, size)
    fn stats(&self) -> CacheStats;
}

/// Extension trait for typed cache operations
///
/// Provides typed get/set on top of the raw byte interface using JSON.
#[async_trait]
pub trait CachePortExt: CachePort {
    /// Get a typed value from cache
    ///
    /// A stored value that no longer decodes as `T` is reported as
    /// [`ApplicationError::Cache`].
    async fn get<T>(&self, key: &str) -> Result<Option<T>, ApplicationError>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        match self.get_bytes(key).await? {
            Some(bytes) => {
                let value: T = serde_json::from_slice(&bytes).map_err(|e| {
                    ApplicationError::Cache(format!("Cache deserialization error: {e}"))
                })?;
                Ok(Some(value))
            },
            None => Ok(None),
        }
    }

    /// Set a typed value in cache
    async fn set<T>(&self, key: &str, value: &T, ttl: Duration) -> Result<(), ApplicationError>
    where
        T: serde::Serialize + Send + Sync,
    {
        let bytes = serde_json::to_vec(value)
            .map_err(|e| ApplicationError::Cache(format!("Cache serialization error: {e}")))?;
        self.set_bytes(key, bytes, ttl).await
    }
}

impl<T: CachePort + ?Sized> CachePortExt for T {}

/// Join key parts with [`KEY_SEPARATOR`]
///
/// Parts are used verbatim; no case folding or trimming happens here.
pub fn create_cache_key<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Current number of entries
    pub entries: u64,
    /// Approximate memory usage in bytes
    pub memory_bytes: u64,
}

impl CacheStats {
    /// Calculate the hit rate as a fraction (0.0 - 1.0)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Standard TTL values
pub mod ttl {
    use std::time::Duration;

    /// Geocoding results (24 hours)
    pub const GEOCODE: Duration = Duration::from_secs(24 * 60 * 60);

    /// Upper bound accepted from configuration (30 days)
    pub const MAX: Duration = Duration::from_secs(30 * 24 * 60 * 60);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_joins_parts_with_dots() {
        assert_eq!(
            create_cache_key(&["geocode", "1600 Amphitheatre Parkway"]),
            "geocode.1600 Amphitheatre Parkway"
        );
    }

    #[test]
    fn cache_key_is_not_normalized() {
        assert_ne!(
            create_cache_key(&["geocode", "Berlin"]),
            create_cache_key(&["geocode", "berlin"])
        );
        assert_eq!(create_cache_key(&["geocode", " x "]), "geocode. x ");
    }

    #[test]
    fn cache_key_with_owned_parts() {
        let parts = vec![
            "reverse_geocode".to_string(),
            1.5_f64.to_string(),
            (-2.0_f64).to_string(),
        ];
        assert_eq!(create_cache_key(&parts), "reverse_geocode.1.5.-2");
    }

    #[test]
    fn cache_stats_hit_rate_zero_when_empty() {
        let stats = CacheStats::default();
        assert!(stats.hit_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn cache_stats_hit_rate_calculates_correctly() {
        let stats = CacheStats {
            hits: 75,
            misses: 25,
            entries: 100,
            memory_bytes: 1024,
        };
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn geocode_ttl_is_one_day() {
        assert_eq!(ttl::GEOCODE.as_secs(), 86_400);
        assert!(ttl::GEOCODE < ttl::MAX);
    }

    #[tokio::test]
    async fn typed_get_reports_undecodable_value_as_cache_error() {
        let mut mock = MockCachePort::new();
        mock.expect_get_bytes()
            .returning(|_| Ok(Some(b"not json".to_vec())));

        let result: Result<Option<Vec<u32>>, _> = mock.get("k").await;
        assert!(matches!(result, Err(ApplicationError::Cache(_))));
    }

    #[tokio::test]
    async fn typed_set_serializes_as_json() {
        let mut mock = MockCachePort::new();
        mock.expect_set_bytes()
            .withf(|key, value, ttl| key == "k" && value == b"[1,2]" && *ttl == ttl::GEOCODE)
            .times(1)
            .returning(|_, _, _| Ok(()));

        mock.set("k", &vec![1_u32, 2], ttl::GEOCODE).await.unwrap();
    }
}
