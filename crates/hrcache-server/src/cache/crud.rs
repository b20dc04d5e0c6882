//! Read-through and write-then-invalidate helpers for CRUD handlers.

use std::future::Future;

use hrcache_core::{Page, RequestContext};
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::cache::CacheManager;

impl CacheManager {
    /// Serves the response to `request` from cache, or runs `fetch` and
    /// caches its result with the default lifetime.
    ///
    /// A fetch error is returned untouched and nothing is cached. Failing to
    /// serialize the fetched value skips caching but still returns it.
    pub async fn read_through<T, E, F, Fut>(&self, request: &RequestContext, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = self.cache_key(request);
        if let Some(cached) = self.get::<T>(&key).await {
            return Ok(cached);
        }

        let value = fetch().await?;
        if let Err(e) = self.set(&key, &value).await {
            warn!(key = %key, error = %e, "Response not cached");
        }

        Ok(value)
    }

    /// [`CacheManager::read_through`] for paginated listings.
    pub async fn list_through<T, E, F, Fut>(
        &self,
        request: &RequestContext,
        fetch: F,
    ) -> Result<Page<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Page<T>, E>>,
    {
        self.read_through(request, fetch).await
    }

    /// Runs `mutation` and, only if it succeeds, invalidates every cached
    /// response of the bound model.
    pub async fn write_then_invalidate<T, E, F, Fut>(&self, mutation: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let outcome = mutation().await?;
        self.invalidate_model().await;
        Ok(outcome)
    }
}
