//! Per-model cache manager.

use std::sync::Arc;
use std::time::Duration;

use hrcache_core::{
    CacheEntry, CacheError, CacheKey, CachePattern, RequestContext, ResourceModel, Result,
    compute_pattern,
};
use hrcache_store::CacheStore;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::cache::handle::StoreHandle;
use crate::config::{CacheSettings, DEBUG_DEFAULT_TTL_SECS};
use crate::metrics::CacheMetrics;

const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_millis(1000);

/// Cache manager bound to one resource model.
///
/// Holds no mutable state of its own: everything shared lives in the
/// injected store, so a manager can be built per request and dropped.
/// Store failures never surface from the read and write accessors; a
/// failed read is a miss and a failed write is logged and skipped.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use hrcache_core::{RequestContext, ResourceModel, UserId};
/// use hrcache_server::cache::CacheManager;
/// use hrcache_store::MemoryStore;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), hrcache_core::CacheError> {
/// let manager = CacheManager::builder()
///     .store(Arc::new(MemoryStore::default()))
///     .model(ResourceModel::new("User")?)
///     .build()?;
///
/// let request = RequestContext::from_raw("/api/v1/users", None, UserId::from(5u64));
/// let key = manager.cache_key(&request);
///
/// if manager.get::<serde_json::Value>(&key).await.is_none() {
///     manager.set(&key, &serde_json::json!([{"id": 5}])).await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CacheManager {
    pub(crate) handle: StoreHandle,
    model: ResourceModel,
    active: bool,
    default_ttl: Duration,
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("model", &self.model)
            .field("backend", &self.handle.backend())
            .field("active", &self.active)
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

impl CacheManager {
    /// Creates a builder with the development defaults.
    pub fn builder() -> CacheManagerBuilder {
        CacheManagerBuilder::default()
    }

    /// Whether caching is enabled. When false every accessor is a no-op.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The bound resource model.
    pub fn model(&self) -> &ResourceModel {
        &self.model
    }

    /// Lifetime used when a caller gives none.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Name of the backing store.
    pub fn backend(&self) -> &str {
        self.handle.backend()
    }

    /// Key of the response to `request`.
    pub fn cache_key(&self, request: &RequestContext) -> CacheKey {
        CacheKey::for_request(&self.model, request)
    }

    /// Pattern covering every key of the bound model.
    pub fn pattern(&self) -> CachePattern {
        compute_pattern(&self.model)
    }

    /// Reads the raw entry under `key`.
    ///
    /// Returns `None` when inactive, absent, expired, or when the store fails.
    pub async fn get_entry(&self, key: &CacheKey) -> Option<CacheEntry> {
        if !self.active {
            return None;
        }

        let model = self.model.cache_name();
        match self.handle.get(key.as_str()).await {
            Ok(Some(bytes)) => {
                debug!(key = %key, "Cache hit");
                self.handle.metrics().record_hit(&model);
                Some(CacheEntry::from_bytes(bytes))
            },
            Ok(None) => {
                debug!(key = %key, "Cache miss");
                self.handle.metrics().record_miss(&model);
                None
            },
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                self.handle.metrics().record_miss(&model);
                None
            },
        }
    }

    /// Reads and decodes the value under `key`.
    ///
    /// An entry that does not decode as `T` is treated as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let entry = self.get_entry(key).await?;
        match entry.decode(key) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, error = %e, "Cached entry could not be decoded, treating as miss");
                None
            },
        }
    }

    /// Reads using exactly one of a request context or an explicit key.
    ///
    /// Passing both or neither is a caller bug and fails before the active
    /// flag is consulted.
    pub async fn get_by<T: DeserializeOwned>(
        &self,
        request: Option<&RequestContext>,
        key: Option<&CacheKey>,
    ) -> Result<Option<T>> {
        let key = match (request, key) {
            (Some(request), None) => self.cache_key(request),
            (None, Some(key)) => key.clone(),
            (Some(_), Some(_)) => {
                return Err(CacheError::caller_contract(
                    "get_by",
                    "pass either a request or a cache key, not both",
                ));
            },
            (None, None) => {
                return Err(CacheError::caller_contract(
                    "get_by",
                    "a request or a cache key is required",
                ));
            },
        };

        Ok(self.get(&key).await)
    }

    /// Stores `value` under `key` with the default lifetime.
    ///
    /// Only a serialization failure is returned; store failures are logged
    /// and swallowed.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &CacheKey, value: &T) -> Result<()> {
        self.write(key, value, self.default_ttl).await
    }

    /// Stores `value` under `key` for `ttl_seconds`.
    ///
    /// Zero or negative means the default lifetime.
    pub async fn set_with_ttl<T: Serialize + ?Sized>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl_seconds: i64,
    ) -> Result<()> {
        self.write(key, value, self.resolve_ttl(ttl_seconds)).await
    }

    fn resolve_ttl(&self, ttl_seconds: i64) -> Duration {
        if ttl_seconds > 0 {
            Duration::from_secs(ttl_seconds as u64)
        } else {
            self.default_ttl
        }
    }

    async fn write<T: Serialize + ?Sized>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        let entry = CacheEntry::encode(key, value)?;
        let size = entry.len();

        match self.handle.set(key.as_str(), entry.into_bytes(), ttl).await {
            Ok(()) => debug!(key = %key, size, ttl_secs = ttl.as_secs(), "Cache entry stored"),
            Err(e) => warn!(key = %key, error = %e, "Cache write failed, skipping"),
        }

        Ok(())
    }
}

/// Builder for [`CacheManager`].
///
/// `store` and `model` are required; `build` refuses to guess either.
pub struct CacheManagerBuilder {
    store: Option<Arc<dyn CacheStore>>,
    model: Option<ResourceModel>,
    active: bool,
    default_ttl: Duration,
    operation_timeout: Duration,
    metrics: Option<CacheMetrics>,
}

impl Default for CacheManagerBuilder {
    fn default() -> Self {
        Self {
            store: None,
            model: None,
            active: true,
            default_ttl: Duration::from_secs(DEBUG_DEFAULT_TTL_SECS),
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            metrics: None,
        }
    }
}

impl CacheManagerBuilder {
    pub fn store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn model(mut self, model: ResourceModel) -> Self {
        self.model = Some(model);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub fn metrics(mut self, metrics: CacheMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Takes the active flag, default lifetime and timeout from `settings`.
    pub fn settings(self, settings: &CacheSettings) -> Self {
        self.active(settings.active)
            .default_ttl(settings.default_ttl())
            .operation_timeout(settings.operation_timeout())
    }

    pub fn build(self) -> Result<CacheManager> {
        let model = self
            .model
            .ok_or_else(|| CacheError::configuration("cache manager requires a resource model"))?;
        let store = self
            .store
            .ok_or_else(|| CacheError::configuration("cache manager requires a store"))?;
        if self.default_ttl.is_zero() {
            return Err(CacheError::configuration("default TTL must be positive"));
        }

        Ok(CacheManager {
            handle: StoreHandle::new(
                store,
                self.operation_timeout,
                self.metrics.unwrap_or_default(),
            ),
            model,
            active: self.active,
            default_ttl: self.default_ttl,
        })
    }
}
