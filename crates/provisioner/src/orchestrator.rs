//! The provisioning orchestrator.

use crate::access::AccessManager;
use crate::buckets::BucketManager;
use crate::context::ProvisioningContext;
use crate::users::UserManager;
use objbroker_core::config::BrokerConfig;
use objbroker_core::{Catalog, ResourceNamer};
use objbroker_management::ManagementApi;
use std::sync::Arc;

/// Bundles the resource managers around one resolved context.
///
/// Cheap to clone; all shared state is immutable after construction.
#[derive(Clone)]
pub struct Provisioner {
    context: ProvisioningContext,
    catalog: Arc<Catalog>,
    buckets: BucketManager,
    users: UserManager,
    access: AccessManager,
}

impl Provisioner {
    pub fn new(
        api: Arc<dyn ManagementApi>,
        catalog: Arc<Catalog>,
        config: &BrokerConfig,
        context: ProvisioningContext,
    ) -> Self {
        let namer = ResourceNamer::new(config.prefix.clone());
        let namespace = config.namespace.as_str();

        Self {
            buckets: BucketManager::new(
                api.clone(),
                catalog.clone(),
                namer.clone(),
                namespace,
                &context,
            ),
            users: UserManager::new(api.clone(), namer.clone(), namespace),
            access: AccessManager::new(api, namer, namespace),
            catalog,
            context,
        }
    }

    pub fn context(&self) -> &ProvisioningContext {
        &self.context
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn buckets(&self) -> &BucketManager {
        &self.buckets
    }

    pub fn users(&self) -> &UserManager {
        &self.users
    }

    pub fn access(&self) -> &AccessManager {
        &self.access
    }
}
