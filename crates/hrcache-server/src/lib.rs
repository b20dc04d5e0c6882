//! hrcache Server - request-scoped resource cache for CRUD handlers.
//!
//! - [`cache::CacheManager`]: per-model read-through cache with pattern
//!   invalidation, wired into handlers through `read_through`,
//!   `list_through` and `write_then_invalidate`
//! - [`config::CacheSettings`]: layered settings (defaults, TOML, `HRCACHE_*`)
//! - an admin HTTP surface: health, invalidation and Prometheus metrics

pub mod cache;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod state;

pub use cache::{CacheAdmin, CacheManager, InvalidationResult, build_store};
pub use config::{BackendKind, CacheSettings, SettingsError};
pub use error::AppError;
pub use extractors::{AuthenticatedUser, CacheRequest};
pub use handlers::health::HealthResponse;
pub use server::{create_router_with_state, run_server_with_state};
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
