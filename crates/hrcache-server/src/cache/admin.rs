//! Administrative cache operations.
//!
//! Kept apart from [`CacheManager`](crate::cache::CacheManager) so that
//! CRUD code holding a manager has no way to wipe the whole store.

use std::sync::Arc;
use std::time::Duration;

use hrcache_core::{CachePattern, ResourceModel};
use hrcache_store::{CacheStore, StoreError};
use tracing::info;

use crate::cache::InvalidationResult;
use crate::cache::handle::StoreHandle;
use crate::metrics::CacheMetrics;

/// Escape hatch operations exposed only through the admin HTTP surface.
///
/// Unlike the manager, failures are returned so the caller can report them.
#[derive(Clone)]
pub struct CacheAdmin {
    handle: StoreHandle,
    active: bool,
}

impl CacheAdmin {
    pub fn new(
        store: Arc<dyn CacheStore>,
        active: bool,
        operation_timeout: Duration,
        metrics: CacheMetrics,
    ) -> Self {
        Self {
            handle: StoreHandle::new(store, operation_timeout, metrics),
            active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn backend(&self) -> &str {
        self.handle.backend()
    }

    /// Removes every entry of every model. No-op when inactive.
    pub async fn clear_all(&self) -> Result<(), StoreError> {
        if !self.active {
            return Ok(());
        }

        self.handle.clear().await?;
        info!(backend = self.backend(), "All cache entries cleared");
        Ok(())
    }

    /// Invalidates every entry of `model`.
    pub async fn invalidate_model(
        &self,
        model: &ResourceModel,
    ) -> Result<InvalidationResult, StoreError> {
        let pattern = CachePattern::for_model(model);
        if !self.active {
            return Ok(InvalidationResult {
                count: 0,
                pattern: pattern.to_string(),
            });
        }

        let count = self.handle.sweep(&pattern).await?;
        self.handle
            .metrics()
            .record_invalidation(&model.cache_name(), count);
        info!(pattern = %pattern, count, "Cache entries invalidated by admin request");

        Ok(InvalidationResult {
            count,
            pattern: pattern.to_string(),
        })
    }

    /// Checks that the store answers within the operation timeout.
    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.handle.health_check().await
    }
}
