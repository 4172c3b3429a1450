//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use objbroker_management::ManagementError;
use objbroker_provisioner::ProvisionError;
use serde::Serialize;

/// Broker API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error: String,
    /// Human-readable error message.
    pub description: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Provision(#[from] ProvisionError),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Provision(e) => match e {
                ProvisionError::Catalog(_) => "bad_request",
                e if e.is_not_found() => "not_found",
                ProvisionError::Management(ManagementError::Conflict(_)) => "conflict",
                _ => "management_error",
            },
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Provision(e) => match e {
                ProvisionError::Catalog(_) => StatusCode::BAD_REQUEST,
                e if e.is_not_found() => StatusCode::NOT_FOUND,
                ProvisionError::Management(ManagementError::Conflict(_)) => StatusCode::CONFLICT,
                ProvisionError::Management(
                    ManagementError::Remote { .. }
                    | ManagementError::Http(_)
                    | ManagementError::Auth(_)
                    | ManagementError::Decode(_),
                ) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        let body = ErrorResponse {
            error: self.code().to_string(),
            description: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
