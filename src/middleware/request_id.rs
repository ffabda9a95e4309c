use std::time::Instant;

use axum::{extract::Request, http::HeaderName, middleware::Next, response::Response};
use uuid::Uuid;

static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");
static FORWARDED_FOR_HEADER: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Stamps every request with a generated id (both a request header visible
/// to inner handlers and a response header for client-side correlation),
/// and emits one structured access-log event at completion.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let client_ip = client_ip(&request);
    let start = Instant::now();

    request
        .headers_mut()
        .insert(REQUEST_ID_HEADER.clone(), request_id.parse().unwrap());

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(REQUEST_ID_HEADER.clone(), request_id.parse().unwrap());

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        client_ip = %client_ip,
        "request completed"
    );

    response
}

/// Prefers the conventional forwarding header (set by a reverse proxy)
/// over the raw socket peer, since the latter is usually the proxy itself.
fn client_ip(request: &Request) -> String {
    request
        .headers()
        .get(&FORWARDED_FOR_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(',').next())
        .map(|s| s.trim().to_string())
        .or_else(|| {
            request
                .extensions()
                .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
                .map(|info| info.0.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}
