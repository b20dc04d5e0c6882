use axum::{Json, extract::State};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "UP", or "DEGRADED" when the store does not answer.
    pub status: String,
    pub cache_active: bool,
    pub backend: String,
}

impl HealthResponse {
    pub fn up(cache_active: bool, backend: impl Into<String>) -> Self {
        Self {
            status: "UP".to_string(),
            cache_active,
            backend: backend.into(),
        }
    }
}

/// GET /health
///
/// A failing store degrades the cache to misses but leaves the service up.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let admin = state.admin();
    let mut response = HealthResponse::up(admin.is_active(), admin.backend());

    if let Err(e) = admin.health_check().await {
        warn!(backend = admin.backend(), error = %e, "Cache store health check failed");
        response.status = "DEGRADED".to_string();
    }

    Json(response)
}
