//! Error codes and the HTTP error envelope.
//!
//! DESIGN
//! ======
//! Every error enum in the crate implements [`ErrorCode`] so logs and HTTP
//! bodies carry a grepable `E_*` code next to the human message. Route
//! handlers convert their failures into [`ApiError`], which renders as
//! `{ "error", "code", "retryable" }` with a matching status.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::services::session::SessionError;

/// Trait for typed errors that expose a grepable code.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

// =============================================================================
// API ERROR
// =============================================================================

/// Router-side failures. Kept separate from provider failures, which never
/// reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("session not found")]
    SessionNotFound,
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "E_BAD_REQUEST",
            Self::SessionNotFound => "E_SESSION_NOT_FOUND",
            Self::Session(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Session(e) if e.retryable())
    }
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::SessionNotFound => StatusCode::NOT_FOUND,
            Self::Session(SessionError::InvalidId(_)) => StatusCode::BAD_REQUEST,
            Self::Session(SessionError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "api: request failed");
        }
        let body = serde_json::json!({
            "error": self.to_string(),
            "code": self.error_code(),
            "retryable": self.retryable(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
