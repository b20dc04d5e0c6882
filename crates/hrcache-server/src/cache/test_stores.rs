//! Misbehaving stores for fail-open tests.

use std::time::Duration;

use async_trait::async_trait;
use hrcache_store::{CacheStore, StoreError};

/// Store whose every call fails as if the server were down.
pub(crate) struct FailingStore;

fn refused() -> StoreError {
    StoreError::unavailable("failing", "connection refused")
}

#[async_trait]
impl CacheStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Err(refused())
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), StoreError> {
        Err(refused())
    }

    async fn keys(&self, _pattern: &str) -> Result<Vec<String>, StoreError> {
        Err(refused())
    }

    async fn delete_many(&self, _keys: &[String]) -> Result<u64, StoreError> {
        Err(refused())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        Err(refused())
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Store that never answers within any sane timeout.
pub(crate) struct StalledStore;

const STALL: Duration = Duration::from_secs(5);

#[async_trait]
impl CacheStore for StalledStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        tokio::time::sleep(STALL).await;
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), StoreError> {
        tokio::time::sleep(STALL).await;
        Ok(())
    }

    async fn keys(&self, _pattern: &str) -> Result<Vec<String>, StoreError> {
        tokio::time::sleep(STALL).await;
        Ok(vec![])
    }

    async fn delete_many(&self, _keys: &[String]) -> Result<u64, StoreError> {
        tokio::time::sleep(STALL).await;
        Ok(0)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        tokio::time::sleep(STALL).await;
        Ok(())
    }

    fn name(&self) -> &str {
        "stalled"
    }
}
