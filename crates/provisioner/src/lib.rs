//! Provisioning orchestrator for the object storage service broker.
//!
//! This crate provides:
//! - Endpoint and replication group resolution into a [`ProvisioningContext`]
//! - Bucket and quota management driven by catalog plans
//! - Object users and their secret keys
//! - Per-bucket access grants

pub mod access;
pub mod buckets;
pub mod context;
pub mod endpoint;
pub mod error;
pub mod orchestrator;
pub mod replication;
pub mod users;

pub use access::AccessManager;
pub use buckets::BucketManager;
pub use context::ProvisioningContext;
pub use endpoint::{resolve_endpoint, select_base_url};
pub use error::{ProvisionError, ProvisionResult};
pub use orchestrator::Provisioner;
pub use replication::resolve_replication_group;
pub use users::UserManager;
