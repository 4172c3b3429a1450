//! Provisioning error types.

use objbroker_management::ManagementError;
use thiserror::Error;

/// Orchestrator operation errors.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error(transparent)]
    Management(#[from] ManagementError),

    #[error(transparent)]
    Catalog(#[from] objbroker_core::Error),

    #[error("no endpoint available")]
    NoEndpoint,

    #[error("base url not found: {0}")]
    BaseUrlNotFound(String),

    #[error("replication group not found: {0}")]
    ReplicationGroupNotFound(String),

    #[error("no secret key found for user {0}")]
    NoSecret(String),
}

impl ProvisionError {
    /// Whether a specific resource lookup came back empty.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::BaseUrlNotFound(_) | Self::ReplicationGroupNotFound(_) | Self::NoSecret(_) => {
                true
            }
            Self::Management(e) => e.is_not_found(),
            _ => false,
        }
    }

    /// Whether the failure belongs to the management category: a failed remote
    /// call, a catalog miss, or an infrastructure lookup that found nothing.
    pub fn is_management(&self) -> bool {
        matches!(
            self,
            Self::Management(_)
                | Self::Catalog(_)
                | Self::NoEndpoint
                | Self::ReplicationGroupNotFound(_)
        )
    }
}

/// Result type for provisioning operations.
pub type ProvisionResult<T> = std::result::Result<T, ProvisionError>;
