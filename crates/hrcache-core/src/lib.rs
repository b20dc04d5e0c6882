//! hrcache Core - Domain types for the resource cache layer
//!
//! This crate holds the pure parts of the cache layer: model binding, request
//! context, key and pattern derivation, and the stored entry format. It does
//! no I/O.
//!
//! # Example
//!
//! ```
//! use hrcache_core::{CacheKey, CachePattern, RequestContext, ResourceModel, UserId};
//!
//! let model = ResourceModel::new("User").unwrap();
//! let ctx = RequestContext::from_raw("/api/v1/users", Some("page=1"), UserId::from(5u64));
//!
//! let key = CacheKey::for_request(&model, &ctx);
//! let pattern = CachePattern::for_model(&model);
//!
//! assert_eq!(key.as_str(), "USER-/api/v1/users:5:page=1");
//! assert!(pattern.matches_key(&key));
//! ```

pub mod entry;
pub mod error;
pub mod key;
pub mod model;
pub mod pattern;
pub mod request;

pub use entry::{CacheEntry, Page};
pub use error::{CacheError, Result};
pub use key::{CacheKey, compute_key};
pub use model::ResourceModel;
pub use pattern::{CachePattern, compute_pattern};
pub use request::{ANONYMOUS_USER, QueryParams, RequestContext, UserId};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
