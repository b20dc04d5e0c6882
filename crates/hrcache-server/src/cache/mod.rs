//! Cache layer for resource handlers.
//!
//! [`CacheManager`] is bound to one resource model and backs CRUD handlers
//! with a read-through cache plus pattern invalidation after writes.
//! [`CacheAdmin`] holds the operations only the admin surface may run.

pub mod admin;
pub mod crud;
pub mod factory;
mod handle;
pub mod invalidation;
pub mod manager;
#[cfg(test)]
mod test_stores;

// Re-exports
pub use admin::CacheAdmin;
pub use factory::build_store;
pub use invalidation::InvalidationResult;
pub use manager::{CacheManager, CacheManagerBuilder};
