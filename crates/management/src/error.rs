//! Management API error types.

use thiserror::Error;

/// Management API operation errors.
#[derive(Debug, Error)]
pub enum ManagementError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("resource already exists: {0}")]
    Conflict(String),

    #[error("management API error ({status}): {body}")]
    Remote { status: u16, body: String },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ManagementError {
    /// Whether the error reports a missing resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for management API operations.
pub type ManagementResult<T> = std::result::Result<T, ManagementError>;
