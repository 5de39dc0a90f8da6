use crate::cli::Environment;
use crate::error::{AppError, Result};
use crate::model::{CacheResetResponse, HealthResponse};
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use tracing::{info, warn};

/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `POST /api/debug/cache/reset`
///
/// Empties the link cache. Outside the development environment the request is
/// refused and the cache is left untouched.
pub async fn reset_cache_handler(State(state): State<AppState>) -> Result<Json<CacheResetResponse>> {
    if state.environment != Environment::Development {
        warn!(environment = %state.environment, "Rejected cache reset");
        return Err(AppError::Forbidden);
    }

    state.cache.clear();
    info!("Link cache reset");
    Ok(Json(CacheResetResponse { ok: true }))
}
