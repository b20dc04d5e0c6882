//! Cache invalidation endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::ModelPath;
use crate::state::AppState;

const CACHE_DISABLED: &str = "Cache is not enabled";

/// Response para operaciones de invalidación.
#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    /// Número de keys borradas; null cuando el store no lo informa.
    pub invalidated: Option<u64>,
    /// Mensaje descriptivo.
    pub message: String,
}

/// DELETE /cache
/// Borra toda la cache, de todos los modelos.
#[instrument(skip_all)]
pub async fn invalidate_all(State(state): State<AppState>) -> Result<Response, AppError> {
    let admin = state.admin();
    if !admin.is_active() {
        return Err(AppError::Conflict(CACHE_DISABLED.to_string()));
    }

    admin.clear_all().await?;

    Ok((
        StatusCode::OK,
        Json(InvalidateResponse {
            invalidated: None,
            message: format!("Cleared all cache entries in the {} store", admin.backend()),
        }),
    )
        .into_response())
}

/// DELETE /cache/{model}
/// Invalida todas las entries de un modelo.
#[instrument(skip_all, fields(model = %path.model))]
pub async fn invalidate_by_model(
    State(state): State<AppState>,
    Path(path): Path<ModelPath>,
) -> Result<Response, AppError> {
    let admin = state.admin();
    if !admin.is_active() {
        return Err(AppError::Conflict(CACHE_DISABLED.to_string()));
    }

    let model = path.resource_model()?;
    let result = admin.invalidate_model(&model).await?;

    Ok((
        StatusCode::OK,
        Json(InvalidateResponse {
            invalidated: Some(result.count),
            message: format!(
                "Invalidated {} cache entries for model '{}'",
                result.count,
                model.cache_name()
            ),
        }),
    )
        .into_response())
}
