//! Access control manager: per-bucket user grants.

use crate::error::ProvisionResult;
use objbroker_core::{FULL_CONTROL, ResourceNamer};
use objbroker_management::{BucketAcl, ManagementApi, UserAcl};
use std::sync::Arc;

/// Grants and revokes user permissions on broker-managed buckets.
///
/// Both operations read the whole ACL, modify it locally and write it back.
/// There is no concurrency token: concurrent updates on one bucket race and
/// the last writer wins.
#[derive(Clone)]
pub struct AccessManager {
    api: Arc<dyn ManagementApi>,
    namer: ResourceNamer,
    namespace: String,
}

impl AccessManager {
    pub fn new(
        api: Arc<dyn ManagementApi>,
        namer: ResourceNamer,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            api,
            namer,
            namespace: namespace.into(),
        }
    }

    /// Current ACL of a bucket.
    pub async fn acl(&self, bucket_id: &str) -> ProvisionResult<BucketAcl> {
        Ok(self
            .api
            .get_bucket_acl(&self.namer.prefix(bucket_id), &self.namespace)
            .await?)
    }

    /// Grant full control on a bucket to a user.
    pub async fn grant(&self, bucket_id: &str, user_id: &str) -> ProvisionResult<()> {
        self.grant_with(bucket_id, user_id, vec![FULL_CONTROL.to_string()])
            .await
    }

    /// Grant `permissions` on a bucket to a user.
    ///
    /// The entry is appended as is; granting twice yields two entries.
    pub async fn grant_with(
        &self,
        bucket_id: &str,
        user_id: &str,
        permissions: Vec<String>,
    ) -> ProvisionResult<()> {
        let bucket = self.namer.prefix(bucket_id);
        let user = self.namer.prefix(user_id);

        let mut acl = self.api.get_bucket_acl(&bucket, &self.namespace).await?;
        acl.acl
            .user_acl
            .push(UserAcl::new(user.clone(), permissions));
        self.api.update_bucket_acl(&bucket, &acl).await?;

        tracing::info!(bucket = %bucket, user = %user, "Bucket access granted");
        Ok(())
    }

    /// Remove every entry for a user from a bucket's ACL.
    pub async fn revoke(&self, bucket_id: &str, user_id: &str) -> ProvisionResult<()> {
        let bucket = self.namer.prefix(bucket_id);
        let user = self.namer.prefix(user_id);

        let mut acl = self.api.get_bucket_acl(&bucket, &self.namespace).await?;
        acl.acl.user_acl.retain(|entry| entry.user != user);
        self.api.update_bucket_acl(&bucket, &acl).await?;

        tracing::info!(bucket = %bucket, user = %user, "Bucket access revoked");
        Ok(())
    }
}
