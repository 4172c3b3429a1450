//! Replication group resolution.

use crate::error::{ProvisionError, ProvisionResult};
use objbroker_management::{ManagementApi, ReplicationGroup};

/// Find the replication group whose name equals `name` exactly.
///
/// There is no fallback: a miss fails even when other groups exist.
pub async fn resolve_replication_group(
    api: &dyn ManagementApi,
    name: &str,
) -> ProvisionResult<ReplicationGroup> {
    api.list_replication_groups()
        .await?
        .into_iter()
        .find(|rg| rg.name == name)
        .ok_or_else(|| ProvisionError::ReplicationGroupNotFound(name.to_string()))
}
