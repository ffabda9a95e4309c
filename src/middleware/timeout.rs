use std::time::Duration;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;

/// Enforces a hard per-request deadline and threads a [`CancellationToken`]
/// into request extensions so repository calls racing the same token abort
/// their in-flight `sqlx` future instead of running to completion for a
/// client that is no longer listening.
pub async fn request_timeout_middleware(
    duration: Duration,
    mut request: Request,
    next: Next,
) -> Response {
    let token = CancellationToken::new();
    request.extensions_mut().insert(token.clone());

    tokio::select! {
        response = next.run(request) => response,
        _ = tokio::time::sleep(duration) => {
            token.cancel();
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "request timed out" })),
            )
                .into_response()
        }
    }
}

/// Bounds how long the server waits to finish receiving a request before
/// giving up on it — the outermost timeout, since nothing downstream can
/// run until the request has arrived.
pub async fn read_timeout_middleware(duration: Duration, request: Request, next: Next) -> Response {
    tokio::select! {
        response = next.run(request) => response,
        _ = tokio::time::sleep(duration) => (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "timed out reading request" })),
        )
            .into_response(),
    }
}

/// Bounds how long the server spends producing and writing a response once
/// a request has cleared auth and routing — the innermost timeout, closest
/// to the handler.
pub async fn write_timeout_middleware(duration: Duration, request: Request, next: Next) -> Response {
    tokio::select! {
        response = next.run(request) => response,
        _ = tokio::time::sleep(duration) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "timed out writing response" })),
        )
            .into_response(),
    }
}
