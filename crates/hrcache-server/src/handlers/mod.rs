//! HTTP handlers for the admin surface.

pub mod health;
pub mod invalidate;
pub mod metrics;
