//! Management API capability surface.

use crate::error::ManagementResult;
use crate::models::{
    BaseUrl, BaseUrlInfo, BucketAcl, BucketCreate, BucketInfo, ReplicationGroup, UserSecretKey,
};
use async_trait::async_trait;
use objbroker_core::BucketQuota;

/// Operations the broker needs from the object storage management API.
///
/// Every call is a single round trip. Implementations do not retry; failures
/// are reported as [`crate::ManagementError`] and propagated unchanged by the
/// callers. Names passed in are the final (already prefixed) remote names.
#[async_trait]
pub trait ManagementApi: Send + Sync + 'static {
    /// List base URL candidates, in the order the management API returns them.
    async fn list_base_urls(&self) -> ManagementResult<Vec<BaseUrl>>;

    /// Fetch a base URL record.
    async fn get_base_url(&self, id: &str) -> ManagementResult<BaseUrlInfo>;

    /// List replication groups.
    async fn list_replication_groups(&self) -> ManagementResult<Vec<ReplicationGroup>>;

    /// Check whether a bucket exists in a namespace.
    async fn bucket_exists(&self, name: &str, namespace: &str) -> ManagementResult<bool>;

    /// Fetch bucket metadata.
    ///
    /// Returns [`crate::ManagementError::NotFound`] if the bucket is absent.
    async fn get_bucket(&self, name: &str, namespace: &str) -> ManagementResult<BucketInfo>;

    /// Create a bucket. Fails if it already exists.
    async fn create_bucket(&self, params: &BucketCreate) -> ManagementResult<()>;

    /// Delete a bucket.
    async fn delete_bucket(&self, name: &str, namespace: &str) -> ManagementResult<()>;

    /// Set a bucket quota, replacing any existing one.
    async fn create_bucket_quota(
        &self,
        name: &str,
        namespace: &str,
        quota: BucketQuota,
    ) -> ManagementResult<()>;

    /// Read the current bucket quota, `None` when the bucket has none.
    async fn get_bucket_quota(
        &self,
        name: &str,
        namespace: &str,
    ) -> ManagementResult<Option<BucketQuota>>;

    /// Remove a bucket quota.
    async fn delete_bucket_quota(&self, name: &str, namespace: &str) -> ManagementResult<()>;

    /// Check whether an object user exists in a namespace.
    async fn user_exists(&self, name: &str, namespace: &str) -> ManagementResult<bool>;

    /// Create an object user.
    async fn create_user(&self, name: &str, namespace: &str) -> ManagementResult<()>;

    /// Delete an object user.
    async fn delete_user(&self, name: &str) -> ManagementResult<()>;

    /// List a user's active secret keys.
    async fn list_user_secrets(&self, name: &str) -> ManagementResult<Vec<UserSecretKey>>;

    /// Issue a new secret key for a user.
    async fn create_user_secret(&self, name: &str) -> ManagementResult<UserSecretKey>;

    /// Fetch a bucket's ACL document.
    async fn get_bucket_acl(&self, name: &str, namespace: &str) -> ManagementResult<BucketAcl>;

    /// Replace a bucket's ACL document.
    async fn update_bucket_acl(&self, name: &str, acl: &BucketAcl) -> ManagementResult<()>;

    /// Get the name of this backend.
    ///
    /// Used for logging.
    fn backend_name(&self) -> &'static str;

    /// Verify the management API is reachable and the credentials work.
    ///
    /// The default implementation returns Ok(()), suitable for backends that
    /// need no connectivity (the in-process simulator).
    async fn health_check(&self) -> ManagementResult<()> {
        Ok(())
    }

    /// Release any session held with the management API.
    async fn close(&self) -> ManagementResult<()> {
        Ok(())
    }
}
