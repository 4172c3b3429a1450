//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no service matching service id: {0}")]
    UnknownService(String),

    #[error("no plan matching plan id: {plan_id} (service {service_id})")]
    UnknownPlan { service_id: String, plan_id: String },

    #[error("duplicate catalog entry: {0}")]
    DuplicateCatalogEntry(String),

    #[error("invalid quota: {0}")]
    InvalidQuota(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
