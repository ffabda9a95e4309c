use axum::{
    extract::Request,
    http::{header, HeaderName},
    middleware::Next,
    response::Response,
};

/// Adds standard security headers to every response. Lifted straight from
/// the upstream API's hardening pass; this is an HTTP API with no served
/// HTML, so the CSP is deliberately locked down rather than carrying the
/// `'unsafe-inline'`/`'unsafe-eval'` allowances a served SPA would need.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_FRAME_OPTIONS,
        "DENY".parse().unwrap(),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        "nosniff".parse().unwrap(),
    );
    headers.insert(
        header::REFERRER_POLICY,
        "strict-origin-when-cross-origin".parse().unwrap(),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        "default-src 'none'; frame-ancestors 'none'".parse().unwrap(),
    );
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        "geolocation=(), microphone=(), camera=()".parse().unwrap(),
    );

    response
}
