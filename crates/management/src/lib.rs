//! Object storage management API for the service broker.
//!
//! This crate provides:
//! - The [`ManagementApi`] trait: every remote call the broker makes
//! - An HTTP backend speaking the management REST API with token login
//! - An in-process simulator recording each call, for development and tests

pub mod backends;
pub mod error;
pub mod models;
pub mod traits;

pub use backends::{
    http::HttpBackend,
    memory::{ManagementCall, MemoryBackend},
};
pub use error::{ManagementError, ManagementResult};
pub use models::{
    AclEntries, BaseUrl, BaseUrlInfo, BucketAcl, BucketCreate, BucketInfo, CustomGroupAcl,
    GroupAcl, ReplicationGroup, UserAcl, UserSecretKey,
};
pub use traits::ManagementApi;

use objbroker_core::config::ManagementConfig;
use std::sync::Arc;
use std::time::Duration;

/// Create a management API client from configuration.
pub async fn from_config(config: &ManagementConfig) -> ManagementResult<Arc<dyn ManagementApi>> {
    config.validate().map_err(ManagementError::Config)?;

    match config {
        ManagementConfig::Memory {
            base_urls,
            replication_groups,
        } => Ok(Arc::new(MemoryBackend::from_config(
            base_urls,
            replication_groups,
        ))),
        ManagementConfig::Http {
            endpoint,
            username,
            password,
            timeout_secs,
        } => {
            let backend = HttpBackend::new(
                endpoint,
                username,
                password,
                Duration::from_secs(*timeout_secs),
            )?;
            Ok(Arc::new(backend))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn from_config_memory_ok() {
        let api = from_config(&ManagementConfig::default()).await.unwrap();
        assert_eq!(api.backend_name(), "memory");

        let groups = api.list_replication_groups().await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "rg1");
        assert_eq!(groups[0].id, "urn:storageos:ReplicationGroupInfo:rg1:global");
    }

    #[tokio::test]
    async fn from_config_http_ok() {
        let config = ManagementConfig::Http {
            endpoint: "https://ecs.example.com:4443".to_string(),
            username: "root".to_string(),
            password: "pw".to_string(),
            timeout_secs: 10,
        };
        let api = from_config(&config).await.unwrap();
        assert_eq!(api.backend_name(), "http");
    }

    #[tokio::test]
    async fn from_config_rejects_zero_timeout() {
        let config = ManagementConfig::Http {
            endpoint: "https://ecs.example.com:4443".to_string(),
            username: "root".to_string(),
            password: "pw".to_string(),
            timeout_secs: 0,
        };

        match from_config(&config).await {
            Ok(_) => panic!("expected error"),
            Err(ManagementError::Config(_)) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
}
