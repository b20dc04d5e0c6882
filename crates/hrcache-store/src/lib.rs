//! # hrcache Store Backends
//!
//! Key-value stores that can back the hrcache cache manager.
//!
//! Every backend implements [`CacheStore`], a five-operation protocol:
//! `get`, `set` with TTL, `keys` by glob pattern, `delete_many` and `clear`.
//!
//! ## Backends
//!
//! - [`MemoryStore`] - process-local Moka cache with per-entry TTL
//! - [`FileStore`] - one file per entry, shared by workers on one host
//! - [`RedisStore`] - shared Redis server, plain or TLS
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use hrcache_store::{CacheStore, MemoryStore};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), hrcache_store::StoreError> {
//! let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::default());
//!
//! store.set("USER-/api/v1/users:5:", b"{}".to_vec(), Duration::from_secs(900)).await?;
//! let keys = store.keys("USER-*").await?;
//! store.delete_many(&keys).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod file;
mod matching;
pub mod memory;
pub mod redis_store;
pub mod traits;

// Re-exports
pub use error::StoreError;
pub use file::FileStore;
pub use memory::{MemoryStore, MemoryStoreConfig};
pub use redis_store::{RedisConfig, RedisStore};
pub use traits::CacheStore;
