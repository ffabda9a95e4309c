use axum::{extract::Request, extract::State, http::HeaderName, middleware::Next, response::Response};
use subtle::ConstantTimeEq;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

static API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

/// Verifies the `X-API-Key` header against the configured key using a
/// constant-time comparison, so the response latency can't be used to
/// brute-force the key one byte at a time.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    const UNAUTHORIZED_MESSAGE: &str = "Unauthorized: Invalid or missing API key";

    let provided = request
        .headers()
        .get(&API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED_MESSAGE))?;

    let expected = state.config.api_key.as_bytes();
    let provided = provided.as_bytes();

    let matches = provided.len() == expected.len() && provided.ct_eq(expected).into();
    if !matches {
        return Err(ApiError::unauthorized(UNAUTHORIZED_MESSAGE));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use subtle::ConstantTimeEq;

    #[test]
    fn ct_eq_rejects_different_lengths_before_compare() {
        let a = b"short";
        let b = b"much-longer-key";
        assert!(a.len() != b.len());
    }

    #[test]
    fn ct_eq_matches_identical_bytes() {
        let a = b"same-key-value";
        let b = b"same-key-value";
        assert!(bool::from(a.ct_eq(b)));
    }
}
