//! API error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gateway_core::GatewayError;
use gateway_resilience::{AttemptRecord, ExecutionFailure};
use serde::Serialize;

/// Error returned by HTTP handlers
///
/// Serialized as `{"error": {"type": ..., "message": ..., "attempts": [...]}}`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{error_type}: {message}")]
pub struct ApiError {
    /// HTTP status
    pub status: StatusCode,
    /// Machine-readable error type
    pub error_type: &'static str,
    /// Human-readable message
    pub message: String,
    /// Provider attempts made before the failure
    pub attempts: Vec<AttemptRecord>,
}

impl ApiError {
    /// Create an error
    #[must_use]
    pub fn new(status: StatusCode, error_type: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error_type,
            message: message.into(),
            attempts: Vec::new(),
        }
    }

    /// 400 for malformed input
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_request_error", message)
    }

    /// 404
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    /// 500
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }

    /// Attach the attempts made before the failure
    #[must_use]
    pub fn with_attempts(mut self, attempts: Vec<AttemptRecord>) -> Self {
        self.attempts = attempts;
        self
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        let status = match &err {
            GatewayError::Validation { .. } => StatusCode::BAD_REQUEST,
            GatewayError::AllProvidersFailed { .. }
            | GatewayError::Provider { .. }
            | GatewayError::Timeout { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::MissingCredential { .. }
            | GatewayError::ProviderNotRegistered { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.error_type(), err.to_string())
    }
}

impl From<ExecutionFailure> for ApiError {
    fn from(failure: ExecutionFailure) -> Self {
        Self::from(failure.error).with_attempts(failure.attempts)
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    #[serde(rename = "type")]
    error_type: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "no_attempts")]
    attempts: &'a [AttemptRecord],
}

fn no_attempts(attempts: &&[AttemptRecord]) -> bool {
    attempts.is_empty()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                error_type: self.error_type,
                message: &self.message,
                attempts: &self.attempts,
            },
        };
        (self.status, Json(body)).into_response()
    }
}
