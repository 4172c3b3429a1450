//! Provisioning context resolved once at start-up.

use crate::endpoint::resolve_endpoint;
use crate::error::ProvisionResult;
use crate::replication::resolve_replication_group;
use objbroker_core::config::BrokerConfig;
use objbroker_management::{ManagementApi, ReplicationGroup};

/// Infrastructure identifiers every provisioning operation depends on.
///
/// Produced by [`ProvisioningContext::initialize`] and never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProvisioningContext {
    /// Object-storage data-plane URL handed to bound applications.
    pub endpoint: String,
    /// Replication group new buckets are placed in.
    pub replication_group: ReplicationGroup,
}

impl ProvisioningContext {
    pub fn new(endpoint: impl Into<String>, replication_group: ReplicationGroup) -> Self {
        Self {
            endpoint: endpoint.into(),
            replication_group,
        }
    }

    /// Resolve the endpoint, then the replication group.
    pub async fn initialize(
        api: &dyn ManagementApi,
        config: &BrokerConfig,
    ) -> ProvisionResult<Self> {
        let endpoint = resolve_endpoint(api, config).await?;
        let replication_group = resolve_replication_group(api, &config.replication_group).await?;

        tracing::info!(
            endpoint = %endpoint,
            replication_group = %replication_group.id,
            "Provisioning context resolved"
        );

        Ok(Self {
            endpoint,
            replication_group,
        })
    }
}
