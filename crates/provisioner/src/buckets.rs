//! Tenant resource manager: buckets and their quotas.

use crate::context::ProvisioningContext;
use crate::error::ProvisionResult;
use objbroker_core::{BucketQuota, Catalog, ResourceNamer};
use objbroker_management::{BucketCreate, BucketInfo, ManagementApi};
use std::sync::Arc;

/// Creates, inspects and deletes broker-managed buckets.
///
/// Every operation takes the external id and works on the prefixed remote
/// name in the configured namespace.
#[derive(Clone)]
pub struct BucketManager {
    api: Arc<dyn ManagementApi>,
    catalog: Arc<Catalog>,
    namer: ResourceNamer,
    namespace: String,
    replication_group_id: String,
}

impl BucketManager {
    pub fn new(
        api: Arc<dyn ManagementApi>,
        catalog: Arc<Catalog>,
        namer: ResourceNamer,
        namespace: impl Into<String>,
        context: &ProvisioningContext,
    ) -> Self {
        Self {
            api,
            catalog,
            namer,
            namespace: namespace.into(),
            replication_group_id: context.replication_group.id.clone(),
        }
    }

    /// Remote bucket name for an external id.
    pub fn name(&self, id: &str) -> String {
        self.namer.prefix(id)
    }

    pub async fn exists(&self, id: &str) -> ProvisionResult<bool> {
        Ok(self.api.bucket_exists(&self.name(id), &self.namespace).await?)
    }

    /// Fetch bucket metadata. Fails with a not-found error when absent.
    pub async fn get(&self, id: &str) -> ProvisionResult<BucketInfo> {
        Ok(self.api.get_bucket(&self.name(id), &self.namespace).await?)
    }

    /// Create the bucket for `id` as described by the catalog plan.
    ///
    /// No existence check is made; creating a bucket that already exists is
    /// reported by the management API. A quota is only created when the plan
    /// sets a limit or a warning.
    pub async fn create(&self, id: &str, service_id: &str, plan_id: &str) -> ProvisionResult<()> {
        let (service, plan) = self.catalog.find_plan(service_id, plan_id)?;
        let name = self.name(id);

        let params = BucketCreate {
            name: name.clone(),
            namespace: self.namespace.clone(),
            vpool: self.replication_group_id.clone(),
            head_type: service.head_type.clone(),
            filesystem_enabled: service.file_system_enabled,
            is_stale_allowed: service.stale_allowed,
        };
        self.api.create_bucket(&params).await?;

        if let Some(quota) = plan.quota() {
            self.api
                .create_bucket_quota(&name, &self.namespace, quota)
                .await?;
        }

        tracing::info!(
            bucket = %name,
            service_id = %service_id,
            plan_id = %plan_id,
            "Bucket created"
        );
        Ok(())
    }

    /// Reconcile the bucket quota with a new plan.
    ///
    /// A plan without limits removes the quota; any other plan replaces it.
    pub async fn change_plan(
        &self,
        id: &str,
        service_id: &str,
        plan_id: &str,
    ) -> ProvisionResult<()> {
        let (_, plan) = self.catalog.find_plan(service_id, plan_id)?;
        let name = self.name(id);

        match plan.quota() {
            Some(quota) => {
                self.api
                    .create_bucket_quota(&name, &self.namespace, quota)
                    .await?;
            }
            None => {
                self.api.delete_bucket_quota(&name, &self.namespace).await?;
            }
        }

        tracing::info!(bucket = %name, plan_id = %plan_id, "Bucket plan changed");
        Ok(())
    }

    /// Delete the bucket. Deleting an absent bucket is reported by the
    /// management API.
    pub async fn delete(&self, id: &str) -> ProvisionResult<()> {
        let name = self.name(id);
        self.api.delete_bucket(&name, &self.namespace).await?;
        tracing::info!(bucket = %name, "Bucket deleted");
        Ok(())
    }

    /// Current quota, `None` when the bucket has none.
    pub async fn quota(&self, id: &str) -> ProvisionResult<Option<BucketQuota>> {
        Ok(self
            .api
            .get_bucket_quota(&self.name(id), &self.namespace)
            .await?)
    }
}
