//! Repository bootstrap.
//!
//! Runs once before the server accepts requests: resolves the provisioning
//! context, then makes sure the broker's own repository bucket and user exist.
//! Any failure here aborts start-up.

use anyhow::{Context, Result};
use objbroker_core::Catalog;
use objbroker_core::config::BrokerConfig;
use objbroker_management::ManagementApi;
use objbroker_provisioner::{Provisioner, ProvisioningContext};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Connection settings for the repository bucket.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryCredentials {
    /// Endpoint the repository bucket is reached through.
    pub endpoint: String,
    /// Prefixed repository bucket name.
    pub bucket: String,
    /// Prefixed repository user name, used as the access key.
    pub user: String,
    /// Secret key of the repository user.
    pub secret_key: String,
}

impl fmt::Debug for RepositoryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryCredentials")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("user", &self.user)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Resolve the provisioning context and prepare the repository.
pub async fn initialize(
    api: Arc<dyn ManagementApi>,
    catalog: Arc<Catalog>,
    config: &BrokerConfig,
) -> Result<(Provisioner, RepositoryCredentials)> {
    let context = ProvisioningContext::initialize(api.as_ref(), config)
        .await
        .context("failed to resolve provisioning context")?;

    let provisioner = Provisioner::new(api, catalog, config, context);
    let credentials = prepare_repository(&provisioner, config).await?;

    Ok((provisioner, credentials))
}

/// Ensure the repository bucket and user exist and return their credentials.
///
/// The bucket is created first. A new user is granted full control on it and
/// its freshly issued secret is returned; an existing user keeps its grants
/// and the first listed secret is returned.
pub async fn prepare_repository(
    provisioner: &Provisioner,
    config: &BrokerConfig,
) -> Result<RepositoryCredentials> {
    let buckets = provisioner.buckets();
    let users = provisioner.users();
    let bucket_id = config.repository_bucket.as_str();
    let user_id = config.repository_user.as_str();

    if buckets
        .exists(bucket_id)
        .await
        .context("failed to check repository bucket")?
    {
        tracing::debug!(bucket = %buckets.name(bucket_id), "Repository bucket already exists");
    } else {
        buckets
            .create(
                bucket_id,
                &config.repository_service_id,
                &config.repository_plan_id,
            )
            .await
            .context("failed to create repository bucket")?;
        tracing::info!(bucket = %buckets.name(bucket_id), "Repository bucket created");
    }

    let secret_key = if users
        .exists(user_id)
        .await
        .context("failed to check repository user")?
    {
        tracing::debug!(user = %users.name(user_id), "Repository user already exists");
        users
            .current_secret(user_id)
            .await
            .context("failed to read repository user secret")?
    } else {
        let key = users
            .create(user_id)
            .await
            .context("failed to create repository user")?;
        provisioner
            .access()
            .grant(bucket_id, user_id)
            .await
            .context("failed to grant repository access")?;
        tracing::info!(user = %users.name(user_id), "Repository user created");
        key.secret_key
    };

    let endpoint = config
        .repository_endpoint
        .clone()
        .unwrap_or_else(|| provisioner.context().endpoint.clone());

    Ok(RepositoryCredentials {
        endpoint,
        bucket: buckets.name(bucket_id),
        user: users.name(user_id),
        secret_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_secret() {
        let credentials = RepositoryCredentials {
            endpoint: "http://localhost:9020".to_string(),
            bucket: "b".to_string(),
            user: "u".to_string(),
            secret_key: "hunter2".to_string(),
        };
        let debug = format!("{credentials:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("hunter2"));
    }
}
