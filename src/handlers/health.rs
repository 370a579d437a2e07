use crate::{
    models::{ApiError, ErrorResponse, HealthResponse, ReadyResponse},
    state::AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use tracing::{debug, error};

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    debug!("Health check requested");
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check endpoint, verifies the item store answers
pub async fn ready_check(State(state): State<AppState>) -> Result<Json<ReadyResponse>, ApiError> {
    debug!("Readiness check requested");
    match state.store.ping().await {
        Ok(()) => Ok(Json(ReadyResponse {
            status: "ok".to_string(),
            store: state.store.kind().to_string(),
        })),
        Err(e) => {
            error!("Item store is not ready: {}", e);
            Err(ErrorResponse::reply(
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Item store ({}) is not ready", state.store.kind()),
            ))
        }
    }
}
