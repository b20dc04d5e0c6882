//! Application state.

use std::sync::Arc;

use hrcache_core::{CacheError, ResourceModel};
use hrcache_store::CacheStore;

use crate::cache::{CacheAdmin, CacheManager};
use crate::config::CacheSettings;
use crate::metrics::CacheMetrics;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The cache store, shared by every manager.
    store: Arc<dyn CacheStore>,
    settings: Arc<CacheSettings>,
    metrics: CacheMetrics,
}

impl AppState {
    /// Creates a new AppState around an opened store.
    pub fn new(store: Arc<dyn CacheStore>, settings: CacheSettings) -> Self {
        let metrics = CacheMetrics::new();
        metrics.set_active(settings.active);
        Self {
            store,
            settings: Arc::new(settings),
            metrics,
        }
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    pub fn store(&self) -> &dyn CacheStore {
        self.store.as_ref()
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Builds a manager for `model` from the shared store and settings.
    pub fn manager(&self, model: ResourceModel) -> Result<CacheManager, CacheError> {
        CacheManager::builder()
            .store(Arc::clone(&self.store))
            .model(model)
            .settings(&self.settings)
            .metrics(self.metrics.clone())
            .build()
    }

    /// Administrative handle over the shared store.
    pub fn admin(&self) -> CacheAdmin {
        CacheAdmin::new(
            Arc::clone(&self.store),
            self.settings.active,
            self.settings.operation_timeout(),
            self.metrics.clone(),
        )
    }
}
