use anyhow::{Result, anyhow};
use async_trait::async_trait;
use fjall::Keyspace;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::task;

use crate::config::CacheConfig;
use crate::error::NexusError;

/// Source of "now" for expiry decisions.
pub trait Clock: Send + Sync {
    /// Seconds since the Unix epoch
    fn now(&self) -> u64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_secs(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Lifetime of a cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    Seconds(u64),
    Never,
}

impl Ttl {
    pub const fn hours(hours: u64) -> Self {
        Ttl::Seconds(hours * 60 * 60)
    }
}

/// Raw key-value backend. Knows nothing about expiry or value types.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;
    async fn store(&self, key: &str, bytes: Vec<u8>) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local store
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow!("memory cache lock poisoned"))
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries()?.get(key).cloned())
    }

    async fn store(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.entries()?.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// On-disk store backed by a fjall keyspace.
///
/// fjall is blocking; every call goes through `spawn_blocking` here and
/// nowhere else.
pub struct PersistentStore {
    _db: fjall::Database,
    store: Keyspace,
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
    Ok(store.get(key)?.map(|v| v.to_vec()))
}

impl PersistentStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path).open()?;
        let items = db.keyspace("cache", fjall::KeyspaceCreateOptions::default)?;
        Ok(PersistentStore {
            _db: db,
            store: items,
        })
    }
}

#[async_trait]
impl CacheStore for PersistentStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        task::spawn_blocking(move || get_from_store(store, key)).await?
    }

    async fn store(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        task::spawn_blocking(move || store.insert(key, bytes)).await??;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        task::spawn_blocking(move || store.remove(key)).await??;
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct StoredEntry<T> {
    value: T,
    expires_at: Option<u64>, // Unix timestamp (seconds), None = no expiry
}

type FlightMap = Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>;

/// Shared TTL cache handed to every fetcher.
///
/// Cloning is cheap; clones share the backend and the in-flight guards.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    in_flight: Arc<FlightMap>,
}

impl Cache {
    pub fn new(store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            in_flight: Arc::default(),
        }
    }

    /// In-memory cache on the system clock
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock))
    }

    /// fjall-backed cache on the system clock
    pub fn persistent(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let store = PersistentStore::open(path).map_err(|e| {
            NexusError::cache(format!(
                "Failed to open cache database at {}: {e}",
                path.display()
            ))
        })?;
        Ok(Self::new(Arc::new(store), Arc::new(SystemClock)))
    }

    /// Backend selected by configuration
    pub fn from_config(config: &CacheConfig) -> crate::Result<Self> {
        match config.backend.as_str() {
            "memory" => Ok(Self::in_memory()),
            "persistent" => Self::persistent(&config.location),
            other => Err(NexusError::config(format!("Unknown cache backend '{other}'"))),
        }
    }

    /// Stores a serializable value with a time-to-live.
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub async fn put<T: Serialize + Sync>(&self, key: &str, value: &T, ttl: Ttl) -> crate::Result<()> {
        let expires_at = match ttl {
            Ttl::Seconds(secs) => Some(self.clock.now().saturating_add(secs)),
            Ttl::Never => None,
        };
        let entry = StoredEntry { value, expires_at };
        let bytes = postcard::to_stdvec(&entry).map_err(|e| NexusError::cache(e.to_string()))?;
        self.store
            .store(key, bytes)
            .await
            .map_err(|e| NexusError::cache(e.to_string()))
    }

    /// Retrieves a value if it exists and has not expired.
    /// Returns `None` for cache misses or expired entries.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> crate::Result<Option<T>> {
        let maybe_bytes = self
            .store
            .load(key)
            .await
            .map_err(|e| NexusError::cache(e.to_string()))?;

        let Some(bytes) = maybe_bytes else {
            tracing::debug!("Key not found");
            return Ok(None);
        };

        let entry: StoredEntry<T> =
            postcard::from_bytes(&bytes).map_err(|e| NexusError::cache(e.to_string()))?;

        match entry.expires_at {
            Some(expires_at) if self.clock.now() >= expires_at => {
                tracing::debug!("Key found but expired");
                self.remove(key).await?;
                Ok(None)
            }
            _ => {
                tracing::debug!("Key found and still fresh");
                Ok(Some(entry.value))
            }
        }
    }

    /// Manually removes a key from the cache.
    pub async fn remove(&self, key: &str) -> crate::Result<()> {
        self.store
            .remove(key)
            .await
            .map_err(|e| NexusError::cache(e.to_string()))
    }

    /// Returns the cached value or computes, stores and returns a fresh one.
    ///
    /// Concurrent callers for the same key wait for the first one instead of
    /// all hitting upstream. A failing backend degrades to "always miss".
    /// The fetch future must own its inputs so the caller stays `Send`.
    pub async fn get_or_try_insert_with<T, F, Fut>(
        &self,
        key: &str,
        ttl: Ttl,
        fetch: F,
    ) -> crate::Result<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = crate::Result<T>> + Send + 'static,
    {
        self.get_or_try_insert_where(key, ttl, fetch, |_| true).await
    }

    /// Like [`Cache::get_or_try_insert_with`], but a fresh value is only
    /// stored when `keep` accepts it.
    pub async fn get_or_try_insert_where<T, F, Fut>(
        &self,
        key: &str,
        ttl: Ttl,
        fetch: F,
        keep: fn(&T) -> bool,
    ) -> crate::Result<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = crate::Result<T>> + Send + 'static,
    {
        if let Some(value) = self.lookup(key).await {
            return Ok(value);
        }

        let flight = self.flight(key);
        let guard = flight.lock().await;

        // Someone else may have filled it while we waited
        if let Some(value) = self.lookup(key).await {
            drop(guard);
            self.release(key, flight);
            return Ok(value);
        }

        let result = fetch().await;
        match &result {
            Ok(value) if keep(value) => {
                if let Err(e) = self.put(key, value, ttl).await {
                    tracing::warn!(key, "Failed to store cache entry: {e}");
                }
            }
            Ok(_) => tracing::debug!(key, "Fresh value rejected, not cached"),
            Err(_) => {}
        }

        drop(guard);
        self.release(key, flight);
        result
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, "Cache read failed, treating as miss: {e}");
                None
            }
        }
    }

    fn flight(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self
            .in_flight
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        map.entry(key.to_string()).or_default().clone()
    }

    fn release(&self, key: &str, flight: Arc<tokio::sync::Mutex<()>>) {
        let mut map = self
            .in_flight
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // One reference in the map, one held by us: nobody else is waiting
        if Arc::strong_count(&flight) <= 2 {
            map.remove(key);
        }
    }
}

/// Deterministic cache key: prefix and percent-encoded components joined by `:`.
#[must_use]
pub fn cache_key(prefix: &str, components: &[&str]) -> String {
    let mut key = String::from(prefix);
    for component in components {
        key.push(':');
        key.push_str(&urlencoding::encode(component));
    }
    key
}
