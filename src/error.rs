use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

/// API error types.
///
/// Each variant carries just enough context to produce both the HTTP
/// response and the server-side log line; the wire format never leaks
/// beyond what `status_code` and `into_response` decide to expose.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found (404).
    NotFound { message: String },

    /// Missing or invalid `X-API-Key` header (401).
    Unauthorized { message: String },

    /// Request body or query params violate a field-scoped constraint (400).
    Validation { fields: Vec<(String, String)> },

    /// Anything from the store driver beyond validation: connectivity,
    /// constraint violations, unexpected errors (500). The client only
    /// ever sees a generic message; the real one is logged.
    Database { message: String },

    /// Anything else unexpected (500).
    Internal { message: String },

    /// Malformed request the validator never got to see, e.g. unparsable
    /// JSON (400).
    BadRequest { message: String },
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn validation(fields: Vec<(String, String)>) -> Self {
        ApiError::Validation { fields }
    }

    pub fn database(message: impl Into<String>) -> Self {
        ApiError::Database {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message. Store/internal errors are intentionally
    /// generic so the schema never leaks.
    fn public_message(&self) -> String {
        match self {
            ApiError::NotFound { message } => message.clone(),
            ApiError::Unauthorized { message } => message.clone(),
            ApiError::Validation { .. } => "Validation failed".to_string(),
            ApiError::Database { .. } => "Internal server error".to_string(),
            ApiError::Internal { .. } => "Internal server error".to_string(),
            ApiError::BadRequest { message } => message.clone(),
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            ApiError::Validation { fields } => {
                let joined = fields
                    .iter()
                    .map(|(field, message)| format!("{field}: {message}"))
                    .collect::<Vec<_>>()
                    .join("; ");
                Some(json!({ "errors": joined }))
            }
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = ?self, "request failed");
        }

        let body = ErrorBody {
            error: self.public_message(),
            details: self.details(),
        };

        (status, Json(body)).into_response()
    }
}

/// Converts store errors into API errors. `RowNotFound` becomes a 404;
/// everything else is a 500 with the detail logged, never echoed back.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::not_found("Resource not found"),
            other => {
                tracing::error!(error = %other, "store error");
                ApiError::database(other.to_string())
            }
        }
    }
}

/// Malformed JSON bodies surface as a 400, not the 500 the teacher gives
/// serialization errors — here the only place this fires is deserializing
/// a client-supplied body, never encoding a response.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::bad_request(format!("invalid JSON: {err}"))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
