//! Cache store trait definition.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreError;

/// A key-value store able to back the cache manager.
///
/// The manager only needs five operations: point read, write with TTL, key
/// enumeration by glob pattern, bulk delete and a full wipe. Each call is a
/// single idempotent store operation, so no client-side locking is needed.
///
/// # Implementors
///
/// - `MemoryStore` - process-local Moka cache
/// - `FileStore` - one file per entry under a directory
/// - `RedisStore` - shared Redis server
///
/// # Example
///
/// ```ignore
/// use hrcache_store::{CacheStore, StoreError};
///
/// struct NullStore;
///
/// #[async_trait]
/// impl CacheStore for NullStore {
///     async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
///         Ok(None)
///     }
///     // ...
///     fn name(&self) -> &str {
///         "null"
///     }
/// }
/// ```
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent or has expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stores `value` under `key` for `ttl`, overwriting silently.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), StoreError>;

    /// Lists the live keys matching a glob `pattern` (`*` and `?` wildcards).
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError>;

    /// Deletes `keys`, returning how many were present.
    ///
    /// Missing keys are ignored.
    async fn delete_many(&self, keys: &[String]) -> Result<u64, StoreError>;

    /// Removes every entry in the store.
    async fn clear(&self) -> Result<(), StoreError>;

    /// Returns the name of this backend, for logging and health output.
    fn name(&self) -> &str;

    /// Verifies the backend is reachable.
    ///
    /// The default implementation always succeeds, which is right for
    /// in-process stores.
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
