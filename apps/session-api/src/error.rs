use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::kv::KvError;
use crate::session::token::CodecError;

/// Failure of a session-state operation that is surfaced to the caller.
///
/// Only the fail-closed paths (token validation, forbidden-flag read, counter
/// estimates) return this; advisory reads and writes log and continue.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The presented token is not valid hex.
    #[error("token format error")]
    TokenFormat(#[source] hex::FromHexError),

    /// The token table has no entry for the presented token.
    #[error("token lookup failed: token not found")]
    TokenNotFound,

    /// The stored token payload could not be decoded.
    #[error(transparent)]
    Decode(#[from] CodecError),

    /// A required field is absent from a user record.
    #[error("{field} not found in {key}")]
    FieldNotFound { key: String, field: &'static str },

    #[error("storage error: {0}")]
    Storage(#[from] KvError),
}

impl SessionError {
    /// Whether the token lookup step failed, as opposed to input parsing or
    /// payload decoding.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, Self::TokenNotFound | Self::Storage(_))
    }
}

/// Structured API error returned to HTTP clients.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

/// Application-level error type that converts into an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: ApiErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::TokenFormat(_) | SessionError::Decode(_) => {
                Self::bad_request(err.to_string())
            }
            SessionError::TokenNotFound | SessionError::FieldNotFound { .. } => {
                Self::unauthorized(err.to_string())
            }
            SessionError::Storage(e) => {
                tracing::error!(?e, "storage error");
                Self::internal("An internal error occurred")
            }
        }
    }
}
