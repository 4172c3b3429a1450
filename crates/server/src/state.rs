//! Application state shared across handlers.

use crate::bootstrap::RepositoryCredentials;
use objbroker_core::config::AppConfig;
use objbroker_management::ManagementApi;
use objbroker_provisioner::Provisioner;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Management API client.
    pub management: Arc<dyn ManagementApi>,
    /// Provisioning orchestrator bound to the resolved context.
    pub provisioner: Provisioner,
    /// Credentials of the broker's own repository bucket.
    pub repository: Arc<RepositoryCredentials>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        management: Arc<dyn ManagementApi>,
        provisioner: Provisioner,
        repository: RepositoryCredentials,
    ) -> Self {
        Self {
            config: Arc::new(config),
            management,
            provisioner,
            repository: Arc::new(repository),
        }
    }
}
