//! Metrics for the cache layer and the admin HTTP surface.

pub mod cache;
pub mod http;
pub mod setup;

pub use cache::{CacheMetrics, register_cache_metrics};
pub use http::register_http_metrics;
pub use setup::init_metrics;
