//! Pattern invalidation.

use hrcache_core::CachePattern;
use hrcache_store::StoreError;
use tracing::{info, warn};

use crate::cache::CacheManager;

/// Resultado de una operación de invalidación.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationResult {
    /// Número de keys borradas.
    pub count: u64,
    /// Patrón aplicado.
    pub pattern: String,
}

impl InvalidationResult {
    fn empty(pattern: &CachePattern) -> Self {
        Self {
            count: 0,
            pattern: pattern.to_string(),
        }
    }
}

impl CacheManager {
    /// Deletes every key matching `pattern` in one bulk operation.
    ///
    /// Store failures are logged and reported as zero deletions.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use std::sync::Arc;
    /// # use hrcache_core::ResourceModel;
    /// # use hrcache_server::cache::CacheManager;
    /// # use hrcache_store::MemoryStore;
    /// # #[tokio::main]
    /// # async fn main() {
    /// # let manager = CacheManager::builder()
    /// #     .store(Arc::new(MemoryStore::default()))
    /// #     .model(ResourceModel::new("User").unwrap())
    /// #     .build()
    /// #     .unwrap();
    /// let result = manager.invalidate(&manager.pattern()).await;
    /// println!("Invalidated {} entries", result.count);
    /// # }
    /// ```
    pub async fn invalidate(&self, pattern: &CachePattern) -> InvalidationResult {
        match self.try_invalidate(pattern).await {
            Ok(result) => result,
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Cache invalidation failed, skipping");
                InvalidationResult::empty(pattern)
            },
        }
    }

    /// Invalidates every cached response of the bound model.
    pub async fn invalidate_model(&self) -> InvalidationResult {
        self.invalidate(&self.pattern()).await
    }

    /// Like [`CacheManager::invalidate`], but reports store failures.
    pub async fn try_invalidate(
        &self,
        pattern: &CachePattern,
    ) -> Result<InvalidationResult, StoreError> {
        if !self.is_active() {
            return Ok(InvalidationResult::empty(pattern));
        }

        let count = self.handle.sweep(pattern).await?;
        self.handle
            .metrics()
            .record_invalidation(&self.model().cache_name(), count);

        info!(pattern = %pattern, count, "Cache entries invalidated");

        Ok(InvalidationResult {
            count,
            pattern: pattern.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrcache_core::{CacheKey, RequestContext, ResourceModel, UserId};
    use hrcache_store::{CacheStore, MemoryStore};
    use std::sync::Arc;
    use std::time::Duration;

    fn manager_for(store: Arc<dyn CacheStore>, model: &str, active: bool) -> CacheManager {
        CacheManager::builder()
            .store(store)
            .model(ResourceModel::new(model).unwrap())
            .active(active)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn invalidation_is_complete_for_the_model() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::default());
        let manager = manager_for(store.clone(), "Vacation", true);

        let mut keys = Vec::new();
        for (user, query) in [(1u64, None), (2, Some("page=2")), (3, Some("status=approved"))] {
            let request = RequestContext::from_raw("/api/v1/vacations", query, UserId::from(user));
            let key = manager.cache_key(&request);
            manager.set(&key, &serde_json::json!({"user": user})).await.unwrap();
            keys.push(key);
        }

        let result = manager.invalidate_model().await;

        assert_eq!(result.count, 3);
        assert_eq!(result.pattern, "VACATION-*");
        for key in &keys {
            assert!(manager.get::<serde_json::Value>(key).await.is_none());
        }
    }

    #[tokio::test]
    async fn other_models_survive() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::default());
        let vacations = manager_for(store.clone(), "Vacation", true);
        let payments = manager_for(store.clone(), "Payment", true);

        let payment_key = CacheKey::from("PAYMENT-/api/v1/payments:1:");
        payments.set(&payment_key, &serde_json::json!([])).await.unwrap();
        vacations
            .set(&CacheKey::from("VACATION-/api/v1/vacations:1:"), &serde_json::json!([]))
            .await
            .unwrap();

        vacations.invalidate_model().await;

        assert!(payments.get::<serde_json::Value>(&payment_key).await.is_some());
    }

    #[tokio::test]
    async fn repeated_invalidation_is_idempotent() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::default());
        let manager = manager_for(store, "User", true);
        manager
            .set(&CacheKey::from("USER-/api/v1/users:5:"), &serde_json::json!([]))
            .await
            .unwrap();

        assert_eq!(manager.invalidate_model().await.count, 1);
        assert_eq!(manager.invalidate_model().await.count, 0);
    }

    #[tokio::test]
    async fn inactive_invalidation_mutates_nothing() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::default());
        let key = "USER-/api/v1/users:5:";
        store
            .set(key, b"[]".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        let inactive = manager_for(store.clone(), "User", false);
        let result = inactive.invalidate_model().await;

        assert_eq!(result.count, 0);
        assert!(store.get(key).await.unwrap().is_some());
    }
}
