//! Error types for didrelayd

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use didrelay_dispatch::{DispatchError, RegistryError};
use didrelay_oob::OobError;
use serde::Serialize;
use thiserror::Error;

/// Daemon-level errors
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Startup failed before the dispatcher began
    #[error("Startup error: {0}")]
    Startup(String),

    /// HTTP server error
    #[error("Server error: {0}")]
    Server(String),

    /// The dispatcher loop failed
    #[error("Dispatcher error: {0}")]
    Dispatcher(#[from] DispatchError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// API-specific errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The requested invitation cannot be built
    #[error("Invalid invitation: {0}")]
    InvalidInvitation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Registry error
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl From<OobError> for ApiError {
    fn from(err: OobError) -> Self {
        match err {
            OobError::InvalidInvitationSpec(reason) => ApiError::InvalidInvitation(reason),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::InvalidInvitation(_) => (StatusCode::BAD_REQUEST, "INVALID_INVITATION"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Registry(_) => (StatusCode::INTERNAL_SERVER_ERROR, "REGISTRY_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!(code, error = %self, "Request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::BadRequest("test".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );

        assert_eq!(
            ApiError::InvalidInvitation("test".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );

        assert_eq!(
            ApiError::Registry(RegistryError::LockPoisoned)
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_oob_error_mapping() {
        let err: ApiError = OobError::InvalidInvitationSpec("no profiles".into()).into();
        assert!(matches!(err, ApiError::InvalidInvitation(_)));

        let err: ApiError = OobError::AttachmentDecode("a1: bad".into()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
