use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::store;
use crate::AppState;

/// `GET /api/health` — the one route exempt from the API-key check, since
/// uptime monitors need to probe it without a credential.
pub async fn health(State(state): State<AppState>) -> Response {
    match store::ping(state.repository.pool()).await {
        Ok(()) => {
            (StatusCode::OK, Json(json!({ "status": "ok", "database": "healthy" }))).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "error", "database": "unhealthy" })),
            )
                .into_response()
        }
    }
}
