//! Mapping of failures to HTTP responses.
//!
//! Bodies carry `{error_kind, message}` with a sanitized message; the full
//! detail is logged where the error is raised.

use super::dto::ErrorBody;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mcp_agent_domain::{ErrorKind, RunFailure};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    RunFailed(RunFailure),

    #[error("tool catalog refresh failed: {0}")]
    ToolDiscovery(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::RunFailed(failure) => match failure.kind() {
                ErrorKind::LlmBackend => StatusCode::BAD_GATEWAY,
                ErrorKind::IterationLimitExceeded => StatusCode::LOOP_DETECTED,
                _ => StatusCode::SERVICE_UNAVAILABLE,
            },
            ApiError::ToolDiscovery(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => ErrorKind::Validation.as_str(),
            ApiError::RunFailed(failure) => failure.kind().as_str(),
            ApiError::ToolDiscovery(_) => ErrorKind::ToolDiscovery.as_str(),
            ApiError::Internal(_) => "InternalError",
        }
    }

    /// Message safe to send to the caller.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Validation(msg) => msg.clone(),
            ApiError::RunFailed(failure) => failure.public_message(),
            ApiError::ToolDiscovery(_) => {
                "the tool server could not be reached; the previous tool catalog is still active"
                    .to_string()
            }
            ApiError::Internal(_) => "internal error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error_kind: self.error_kind().to_string(),
            message: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
