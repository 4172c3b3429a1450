//! Core domain types for the object storage service broker.
//!
//! This crate defines the data model shared by the other crates:
//! - Broker, management and server configuration
//! - The service catalog (service definitions and plans)
//! - Bucket quotas and the plan sentinel rules
//! - The resource naming function (prefixing)

pub mod catalog;
pub mod config;
pub mod error;
pub mod naming;
pub mod quota;

pub use catalog::{Catalog, Plan, ServiceDefinition};
pub use error::{Error, Result};
pub use naming::ResourceNamer;
pub use quota::{BucketQuota, QUOTA_UNSET};

/// Permission label granting every right on a bucket.
pub const FULL_CONTROL: &str = "full_control";

/// Name of the base URL preferred when no base URL name is configured.
pub const DEFAULT_BASE_URL_NAME: &str = "DefaultBaseUrl";
