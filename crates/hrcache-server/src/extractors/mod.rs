//! Axum extractors.

pub mod path;
pub mod request;

pub use path::ModelPath;
pub use request::{AuthenticatedUser, CacheRequest};
