//! Server test utilities.

use crate::common::fixtures::test_config;
use objbroker_core::config::AppConfig;
use objbroker_management::{ManagementApi, MemoryBackend};
use objbroker_server::{AppState, create_router, initialize};
use std::sync::Arc;

/// A bootstrapped server over the in-process management simulator.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    pub backend: Arc<MemoryBackend>,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a test server with the default test configuration.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test server with custom config modifications.
    pub async fn with_config<F>(modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = test_config();
        modifier(&mut config);

        let catalog = Arc::new(config.validate().expect("Invalid test configuration"));
        let backend = Arc::new(MemoryBackend::from_config(
            &[objbroker_core::config::MemoryBaseUrl {
                name: "DefaultBaseUrl".to_string(),
                baseurl: "s3.example.com".to_string(),
                namespace_in_host: false,
            }],
            &[config.broker.replication_group.clone()],
        ));
        let management: Arc<dyn ManagementApi> = backend.clone();

        let (provisioner, repository) =
            initialize(management.clone(), catalog, &config.broker)
                .await
                .expect("Failed to bootstrap test server");
        backend.clear_calls();

        let state = AppState::new(config, management, provisioner, repository);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            backend,
        }
    }
}
