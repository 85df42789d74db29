//! Redb embedded cache implementation
//!
//! Persistent key-value store so geocoding answers survive restarts.
//! Entries are bincode-encoded together with their expiry and removed lazily
//! on read or in bulk by [`RedbCache::cleanup_expired`].

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use application::{
    error::ApplicationError,
    ports::{CachePort, CacheStats},
};
use async_trait::async_trait;
use bincode::{Decode, Encode};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use tracing::{debug, instrument, warn};

const CACHE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("geocode_cache");

#[derive(Debug, Encode, Decode)]
struct CacheEntry {
    data: Vec<u8>,
    /// Unix epoch milliseconds
    expires_at_ms: u64,
}

impl CacheEntry {
    fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms
    }

    fn encode(&self) -> Result<Vec<u8>, ApplicationError> {
        bincode::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| ApplicationError::Cache(format!("Entry serialize error: {e}")))
    }

    fn decode(bytes: &[u8]) -> Result<Self, ApplicationError> {
        bincode::decode_from_slice(bytes, bincode::config::standard())
            .map(|(entry, _)| entry)
            .map_err(|e| ApplicationError::Cache(format!("Cache entry deserialize error: {e}")))
    }
}

fn cache_error(context: &'static str) -> impl Fn(redb::Error) -> ApplicationError {
    move |e| ApplicationError::Cache(format!("{context}: {e}"))
}

fn join_error(e: tokio::task::JoinError) -> ApplicationError {
    ApplicationError::Internal(format!("Task join error: {e}"))
}

/// Redb-based persistent cache
///
/// If the database file is corrupted or incompatible, it is deleted and
/// recreated on open.
pub struct RedbCache {
    db: Arc<Database>,
    path: Option<PathBuf>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for RedbCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbCache")
            .field("path", &self.path)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl RedbCache {
    /// Open (or create) a cache database at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened even after
    /// recreating it.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ApplicationError> {
        let path_buf = path.as_ref().to_path_buf();
        if let Some(parent) = path_buf.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                ApplicationError::Cache(format!("Failed to create cache directory: {e}"))
            })?;
        }

        let db = match Database::create(&path_buf) {
            Ok(db) => db,
            Err(e) => {
                warn!(
                    path = %path_buf.display(),
                    error = %e,
                    "Cache database corrupted or incompatible, recreating"
                );
                if path_buf.exists() {
                    fs::remove_file(&path_buf).map_err(|e| {
                        ApplicationError::Cache(format!("Failed to remove corrupted database: {e}"))
                    })?;
                }
                Database::create(&path_buf).map_err(|e| {
                    ApplicationError::Cache(format!("Failed to create Redb database: {e}"))
                })?
            },
        };

        Self::from_database(db, Some(path_buf))
    }

    /// Create an in-memory Redb cache (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self, ApplicationError> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|e| ApplicationError::Cache(format!("Failed to create in-memory Redb: {e}")))?;
        Self::from_database(db, None)
    }

    fn from_database(db: Database, path: Option<PathBuf>) -> Result<Self, ApplicationError> {
        let create_table = || -> Result<(), redb::Error> {
            let write_txn = db.begin_write()?;
            write_txn.open_table(CACHE_TABLE)?;
            write_txn.commit()?;
            Ok(())
        };
        create_table().map_err(cache_error("Failed to create cache table"))?;

        Ok(Self {
            db: Arc::new(db),
            path,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }

    fn expires_at_ms(ttl: Duration) -> u64 {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        Self::now_ms().saturating_add(ttl_ms)
    }

    async fn remove_key(&self, key: &str) -> Result<(), ApplicationError> {
        let db = Arc::clone(&self.db);
        let key = key.to_string();
        tokio::task::spawn_blocking(move || {
            let write_txn = db.begin_write()?;
            {
                let mut table = write_txn.open_table(CACHE_TABLE)?;
                table.remove(key.as_str())?;
            }
            write_txn.commit()?;
            Ok::<_, redb::Error>(())
        })
        .await
        .map_err(join_error)?
        .map_err(cache_error("Redb remove error"))
    }

    async fn read_entry(&self, key: &str) -> Result<Option<CacheEntry>, ApplicationError> {
        let db = Arc::clone(&self.db);
        let key_owned = key.to_string();
        let raw = tokio::task::spawn_blocking(move || {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(CACHE_TABLE)?;
            Ok::<_, redb::Error>(table.get(key_owned.as_str())?.map(|v| v.value().to_vec()))
        })
        .await
        .map_err(join_error)?
        .map_err(cache_error("Redb get error"))?;

        raw.map(|bytes| CacheEntry::decode(&bytes)).transpose()
    }

    /// Remove every expired entry, returning how many were dropped
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be scanned or written.
    pub fn cleanup_expired(&self) -> Result<u64, ApplicationError> {
        let now = Self::now_ms();

        let expired: Vec<String> = {
            let read_txn = self
                .db
                .begin_read()
                .map_err(|e| cache_error("Failed to begin read transaction")(e.into()))?;
            let table = read_txn
                .open_table(CACHE_TABLE)
                .map_err(|e| cache_error("Failed to open cache table")(e.into()))?;
            table
                .iter()
                .map_err(|e| cache_error("Redb iteration error")(e.into()))?
                .filter_map(Result::ok)
                .filter(|(_, value)| {
                    CacheEntry::decode(value.value()).is_ok_and(|entry| entry.is_expired(now))
                })
                .map(|(key, _)| key.value().to_string())
                .collect()
        };

        let remove = || -> Result<u64, redb::Error> {
            let write_txn = self.db.begin_write()?;
            let mut removed = 0u64;
            {
                let mut table = write_txn.open_table(CACHE_TABLE)?;
                for key in &expired {
                    if table.remove(key.as_str())?.is_some() {
                        removed += 1;
                    }
                }
            }
            write_txn.commit()?;
            Ok(removed)
        };
        let removed = remove().map_err(cache_error("Redb cleanup error"))?;

        if removed > 0 {
            debug!(removed, "Cleaned up expired cache entries");
        }
        Ok(removed)
    }

    fn entry_count(&self) -> u64 {
        self.db
            .begin_read()
            .ok()
            .and_then(|txn| txn.open_table(CACHE_TABLE).ok())
            .and_then(|table| table.len().ok())
            .unwrap_or(0)
    }
}

#[async_trait]
impl CachePort for RedbCache {
    #[instrument(skip(self), level = "debug")]
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, ApplicationError> {
        match self.read_entry(key).await? {
            Some(entry) if !entry.is_expired(Self::now_ms()) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache hit (Redb)");
                Ok(Some(entry.data))
            },
            Some(_) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                if let Err(e) = self.remove_key(key).await {
                    warn!(key = %key, error = %e, "Failed to drop expired cache entry");
                }
                debug!(key = %key, "Cache entry expired (Redb)");
                Ok(None)
            },
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache miss (Redb)");
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
        let entry_bytes = CacheEntry {
            data: value,
            expires_at_ms: Self::expires_at_ms(ttl),
        }
        .encode()?;

        let db = Arc::clone(&self.db);
        let key_owned = key.to_string();
        tokio::task::spawn_blocking(move || {
            let write_txn = db.begin_write()?;
            {
                let mut table = write_txn.open_table(CACHE_TABLE)?;
                table.insert(key_owned.as_str(), entry_bytes.as_slice())?;
            }
            write_txn.commit()?;
            Ok::<_, redb::Error>(())
        })
        .await
        .map_err(join_error)?
        .map_err(cache_error("Redb insert error"))?;

        debug!(key = %key, ttl_secs = ttl.as_secs(), "Cache set (Redb)");
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete(&self, key: &str) -> Result<(), ApplicationError> {
        self.remove_key(key).await?;
        debug!(key = %key, "Cache entry deleted (Redb)");
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn exists(&self, key: &str) -> Result<bool, ApplicationError> {
        Ok(self
            .read_entry(key)
            .await?
            .is_some_and(|entry| !entry.is_expired(Self::now_ms())))
    }

    fn stats(&self) -> CacheStats {
        let entries = self.entry_count();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries,
            memory_bytes: 0,
        }
    }
}
