//! Router assembly: routes plus the middleware pipeline, shared by the
//! server binary and the integration tests.

use std::time::Duration;

use axum::{
    middleware as axum_middleware,
    routing::{get, patch},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};

use crate::{middleware, routes, AppState};

/// Builds the full router: the `/api/health` route open to the world, the
/// rest of `/api/*` behind the API-key filter, wrapped in the pipeline
/// described in the configuration docs — outermost first: read timeout,
/// request id/access log, panic recovery, the hard per-request deadline,
/// CORS, security headers, write timeout.
pub fn build_router(state: AppState) -> Router {
    let read_timeout = state.config.read_timeout;
    let write_timeout = state.config.write_timeout;
    let request_timeout = state.config.request_timeout;
    let cors = build_cors_layer(&state.config.allowed_origins);

    let protected = Router::new()
        .route(
            "/issues",
            get(routes::issues::list_issues).post(routes::issues::create_issue),
        )
        .route(
            "/issues/:id",
            get(routes::issues::get_issue)
                .patch(routes::issues::update_issue)
                .delete(routes::issues::delete_issue),
        )
        .route("/issues/:id/move", patch(routes::issues::move_issue))
        .route("/users", get(routes::users::list_users))
        .route("/labels", get(routes::labels::list_labels))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_api_key,
        ));

    let api = Router::new()
        .route("/health", get(routes::health::health))
        .merge(protected);

    Router::new()
        .nest("/api", api)
        .layer(axum_middleware::from_fn(move |req, next| {
            middleware::timeout::write_timeout_middleware(write_timeout, req, next)
        }))
        .layer(axum_middleware::from_fn(
            middleware::security::security_headers_middleware,
        ))
        .layer(cors)
        .layer(axum_middleware::from_fn(move |req, next| {
            middleware::timeout::request_timeout_middleware(request_timeout, req, next)
        }))
        .layer(CatchPanicLayer::new())
        .layer(axum_middleware::from_fn(
            middleware::request_id::request_id_middleware,
        ))
        .layer(axum_middleware::from_fn(move |req, next| {
            middleware::timeout::read_timeout_middleware(read_timeout, req, next)
        }))
        .with_state(state)
}

fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    use axum::http::{header, HeaderName, Method};

    let origins: Vec<_> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-api-key")])
        .allow_credentials(true)
        .max_age(Duration::from_secs(300))
}
