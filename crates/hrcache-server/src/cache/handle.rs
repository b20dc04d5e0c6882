//! Store access bounded by the operation timeout.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use hrcache_core::CachePattern;
use hrcache_store::{CacheStore, StoreError};

use crate::metrics::CacheMetrics;

/// Shared wrapper around the injected store.
///
/// Every call is bounded by `timeout`, timed, and counted as a store error
/// when it fails. Callers decide whether the error is swallowed.
#[derive(Clone)]
pub(crate) struct StoreHandle {
    store: Arc<dyn CacheStore>,
    timeout: Duration,
    metrics: CacheMetrics,
}

impl StoreHandle {
    pub(crate) fn new(store: Arc<dyn CacheStore>, timeout: Duration, metrics: CacheMetrics) -> Self {
        Self {
            store,
            timeout,
            metrics,
        }
    }

    pub(crate) fn backend(&self) -> &str {
        self.store.name()
    }

    pub(crate) fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let start = Instant::now();
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::timeout(operation, self.timeout)),
        };

        self.metrics
            .record_operation_duration(operation, start.elapsed());
        if result.is_err() {
            self.metrics.record_store_error(operation);
        }

        result
    }

    pub(crate) async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.bounded("get", self.store.get(key)).await
    }

    pub(crate) async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), StoreError> {
        self.bounded("set", self.store.set(key, value, ttl)).await
    }

    pub(crate) async fn clear(&self) -> Result<(), StoreError> {
        self.bounded("clear", self.store.clear()).await
    }

    pub(crate) async fn health_check(&self) -> Result<(), StoreError> {
        self.bounded("health", self.store.health_check()).await
    }

    /// Enumerates the keys under `pattern` and deletes them in one call.
    pub(crate) async fn sweep(&self, pattern: &CachePattern) -> Result<u64, StoreError> {
        let glob = pattern.to_string();
        let keys = self.bounded("keys", self.store.keys(&glob)).await?;
        if keys.is_empty() {
            return Ok(0);
        }
        self.bounded("delete_many", self.store.delete_many(&keys))
            .await
    }
}
