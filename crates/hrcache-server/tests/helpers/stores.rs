//! Stores y estado de prueba.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hrcache_server::{AppState, BackendKind, CacheSettings};
use hrcache_store::{CacheStore, MemoryStore, StoreError};

/// Store que falla en todas las operaciones.
pub struct FailingStore;

#[async_trait]
impl CacheStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Err(StoreError::unavailable("failing", "connection refused"))
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), StoreError> {
        Err(StoreError::unavailable("failing", "connection refused"))
    }

    async fn keys(&self, _pattern: &str) -> Result<Vec<String>, StoreError> {
        Err(StoreError::unavailable("failing", "connection refused"))
    }

    async fn delete_many(&self, _keys: &[String]) -> Result<u64, StoreError> {
        Err(StoreError::unavailable("failing", "connection refused"))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        Err(StoreError::unavailable("failing", "connection refused"))
    }

    fn name(&self) -> &str {
        "failing"
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(StoreError::unavailable("failing", "connection refused"))
    }
}

/// Estado con store en memoria y el flag de cache dado.
pub fn memory_state(active: bool) -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let settings = CacheSettings {
        active,
        backend: BackendKind::Memory,
        ..Default::default()
    };
    (AppState::new(store.clone(), settings), store)
}

/// Escribe entries vacias bajo las keys dadas.
pub async fn seed(store: &dyn CacheStore, keys: &[&str]) {
    for key in keys {
        store
            .set(key, b"[]".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
    }
}
