use crate::{docs::openapi_json, handlers::{health_check, ready_check}, state::AppState};
use axum::{routing::get, Router};

/// Create API routes
///
/// Paths are absolute rather than nested so an item mount prefix of `/api`
/// can share the namespace.
pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/ready", get(ready_check))
        .route("/api-docs/openapi.json", get(openapi_json))
}
