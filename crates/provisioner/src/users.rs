//! Object user management.

use crate::error::{ProvisionError, ProvisionResult};
use objbroker_core::ResourceNamer;
use objbroker_management::{ManagementApi, UserSecretKey};
use std::sync::Arc;

/// Creates and deletes broker-managed object users and reads their secrets.
#[derive(Clone)]
pub struct UserManager {
    api: Arc<dyn ManagementApi>,
    namer: ResourceNamer,
    namespace: String,
}

impl UserManager {
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

    /// Remote user name for an external id.
    pub fn name(&self, id: &str) -> String {
        self.namer.prefix(id)
    }

    pub async fn exists(&self, id: &str) -> ProvisionResult<bool> {
        Ok(self.api.user_exists(&self.name(id), &self.namespace).await?)
    }

    /// Create the user and issue its first secret key.
    ///
    /// The returned key is read back from the secret listing. Callers must
    /// keep it: it is not guaranteed to stay retrievable in this form.
    pub async fn create(&self, id: &str) -> ProvisionResult<UserSecretKey> {
        let name = self.name(id);
        self.api.create_user(&name, &self.namespace).await?;
        self.api.create_user_secret(&name).await?;

        let key = self
            .api
            .list_user_secrets(&name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ProvisionError::NoSecret(name.clone()))?;

        tracing::info!(user = %name, "User created");
        Ok(key)
    }

    pub async fn delete(&self, id: &str) -> ProvisionResult<()> {
        let name = self.name(id);
        self.api.delete_user(&name).await?;
        tracing::info!(user = %name, "User deleted");
        Ok(())
    }

    /// The user's current secret: the first one in listing order.
    pub async fn current_secret(&self, id: &str) -> ProvisionResult<String> {
        let name = self.name(id);
        self.api
            .list_user_secrets(&name)
            .await?
            .into_iter()
            .next()
            .map(|key| key.secret_key)
            .ok_or(ProvisionError::NoSecret(name))
    }
}
