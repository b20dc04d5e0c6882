//! Builds the configured store.

use std::sync::Arc;

use hrcache_store::{
    CacheStore, FileStore, MemoryStore, MemoryStoreConfig, RedisStore, StoreError,
};
use tracing::info;

use crate::config::{BackendKind, CacheSettings};

/// Opens the store selected by `settings.backend`.
pub async fn build_store(settings: &CacheSettings) -> Result<Arc<dyn CacheStore>, StoreError> {
    let store: Arc<dyn CacheStore> = match settings.backend {
        BackendKind::Memory => Arc::new(MemoryStore::new(MemoryStoreConfig {
            max_capacity: settings.memory.max_capacity,
        })),
        BackendKind::Files => Arc::new(FileStore::open(settings.files.location.clone()).await?),
        BackendKind::Redis => Arc::new(RedisStore::connect(settings.redis_config()).await?),
    };

    info!(backend = store.name(), "Cache store ready");
    Ok(store)
}
