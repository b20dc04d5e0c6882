//! In-memory store using Moka.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use moka::notification::RemovalCause;
use tracing::trace;

use crate::error::StoreError;
use crate::matching::KeyMatcher;
use crate::traits::CacheStore;

/// Configuracion del store en memoria.
#[derive(Debug, Clone)]
pub struct MemoryStoreConfig {
    /// Maximo numero de entries (default: 10000)
    pub max_capacity: u64,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

#[derive(Debug, Clone)]
struct StoredValue {
    bytes: Arc<[u8]>,
    ttl: Duration,
}

/// Expires every entry after the TTL it was written with.
struct PerEntryTtl;

impl Expiry<String, StoredValue> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        // Un overwrite reinicia el TTL con el valor nuevo
        Some(value.ttl)
    }
}

/// Process-local store.
/// Thread-safe y async-friendly; suitable for tests and single-process
/// deployments.
///
/// # Examples
///
/// ```no_run
/// use hrcache_store::{CacheStore, MemoryStore, MemoryStoreConfig};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let store = MemoryStore::new(MemoryStoreConfig::default());
/// store.set("USER-/api/v1/users:5:", b"{}".to_vec(), Duration::from_secs(900)).await.unwrap();
/// assert!(store.get("USER-/api/v1/users:5:").await.unwrap().is_some());
/// # }
/// ```
#[derive(Clone)]
pub struct MemoryStore {
    inner: Cache<String, StoredValue>,
}

impl MemoryStore {
    /// Crea un nuevo store con la configuracion dada.
    pub fn new(config: MemoryStoreConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryTtl)
            .eviction_listener(|key, _value, cause| {
                let reason = match cause {
                    RemovalCause::Expired => "ttl",
                    RemovalCause::Size => "capacity",
                    RemovalCause::Explicit => "manual",
                    RemovalCause::Replaced => "replaced",
                };
                trace!(key = %key, reason = reason, "Memory cache entry removed");
            })
            .build();

        Self { inner }
    }

    /// Retorna el numero aproximado de entries en cache.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Fuerza la limpieza de entries expiradas (para tests principalmente).
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(MemoryStoreConfig::default())
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.inner.get(key).await.map(|value| value.bytes.to_vec()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), StoreError> {
        let stored = StoredValue {
            bytes: Arc::from(value),
            ttl,
        };
        self.inner.insert(key.to_string(), stored).await;
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let matcher = KeyMatcher::new(pattern)?;

        // Snapshot: entries pueden cambiar durante la iteracion
        Ok(self
            .inner
            .iter()
            .filter(|(key, _)| matcher.matches(key))
            .map(|(key, _)| (*key).clone())
            .collect())
    }

    async fn delete_many(&self, keys: &[String]) -> Result<u64, StoreError> {
        let mut deleted = 0;
        for key in keys {
            if self.inner.remove(key).await.is_some() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
