//! API error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use memoize_core::error::MemoizeError;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: code.into(),
        }
    }

    /// Not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message, "NOT_FOUND")
    }

    /// Internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message, "INTERNAL_ERROR")
    }

    /// Upstream source unavailable.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message, "SOURCE_UNAVAILABLE")
    }

    /// Returns the HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<MemoizeError> for ApiError {
    fn from(err: MemoizeError) -> Self {
        match &err {
            MemoizeError::ProfileNotFound(_) => ApiError::not_found(err.to_string()),
            MemoizeError::SourceUnavailable { .. } => ApiError::unavailable(err.to_string()),
            _ => {
                tracing::error!(error = %err, code = err.code(), "Internal error");
                ApiError::internal("An internal error occurred")
            }
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        tracing::error!(error = %err, "Blocking task failed");
        ApiError::internal("An internal error occurred")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(MemoizeError::ProfileNotFound("1".into()), StatusCode::NOT_FOUND ; "not found")]
    #[test_case(MemoizeError::source_unavailable("1", "down"), StatusCode::SERVICE_UNAVAILABLE ; "unavailable")]
    #[test_case(MemoizeError::ConfigError("bad".into()), StatusCode::INTERNAL_SERVER_ERROR ; "config")]
    fn test_status_mapping(err: MemoizeError, expected: StatusCode) {
        assert_eq!(ApiError::from(err).status(), expected);
    }
}
