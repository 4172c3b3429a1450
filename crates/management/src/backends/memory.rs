//! In-process simulator of the management API.
//!
//! Keeps buckets, quotas, ACLs and users in memory and records every call in
//! a journal so callers can assert on the exact sequence of remote
//! operations. Failure semantics mirror the remote API: creating something
//! that exists is a conflict, touching something absent is not found.

use crate::error::{ManagementError, ManagementResult};
use crate::models::{
    BaseUrl, BaseUrlInfo, BucketAcl, BucketCreate, BucketInfo, ReplicationGroup, UserSecretKey,
};
use crate::traits::ManagementApi;
use async_trait::async_trait;
use objbroker_core::config::MemoryBaseUrl;
use objbroker_core::{BucketQuota, QUOTA_UNSET};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Maximum number of secret keys a user may hold at once.
pub const MAX_SECRET_KEYS: usize = 2;

/// One recorded management call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManagementCall {
    ListBaseUrls,
    GetBaseUrl { id: String },
    ListReplicationGroups,
    BucketExists { name: String, namespace: String },
    GetBucket { name: String, namespace: String },
    CreateBucket(BucketCreate),
    DeleteBucket { name: String, namespace: String },
    CreateBucketQuota {
        name: String,
        namespace: String,
        quota: BucketQuota,
    },
    GetBucketQuota { name: String, namespace: String },
    DeleteBucketQuota { name: String, namespace: String },
    UserExists { name: String, namespace: String },
    CreateUser { name: String, namespace: String },
    DeleteUser { name: String },
    ListUserSecrets { name: String },
    CreateUserSecret { name: String },
    GetBucketAcl { name: String, namespace: String },
    UpdateBucketAcl { name: String, acl: BucketAcl },
}

#[derive(Debug)]
struct MemoryBucket {
    params: BucketCreate,
    quota: Option<BucketQuota>,
    acl: BucketAcl,
}

#[derive(Debug)]
struct MemoryUser {
    secrets: Vec<UserSecretKey>,
}

#[derive(Debug, Default)]
struct MemoryState {
    buckets: HashMap<(String, String), MemoryBucket>,
    users: HashMap<String, MemoryUser>,
    calls: Vec<ManagementCall>,
    secrets_issued: u64,
    reject_acl_updates: bool,
}

/// Management API simulator.
pub struct MemoryBackend {
    base_urls: Vec<BaseUrlInfo>,
    replication_groups: Vec<ReplicationGroup>,
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    /// Create a simulator reporting the given base URLs and replication
    /// groups, in the given listing order.
    pub fn new(base_urls: Vec<BaseUrlInfo>, replication_groups: Vec<ReplicationGroup>) -> Self {
        Self {
            base_urls,
            replication_groups,
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Create a simulator from configuration, assigning ids in listing order.
    pub fn from_config(base_urls: &[MemoryBaseUrl], replication_groups: &[String]) -> Self {
        let base_urls = base_urls
            .iter()
            .enumerate()
            .map(|(idx, b)| BaseUrlInfo {
                id: (idx + 1).to_string(),
                name: b.name.clone(),
                baseurl: b.baseurl.clone(),
                namespace_in_host: b.namespace_in_host,
            })
            .collect();
        let replication_groups = replication_groups
            .iter()
            .map(|name| ReplicationGroup {
                id: format!("urn:storageos:ReplicationGroupInfo:{name}:global"),
                name: name.clone(),
            })
            .collect();
        Self::new(base_urls, replication_groups)
    }

    /// Snapshot of every call made so far, oldest first.
    pub fn calls(&self) -> Vec<ManagementCall> {
        self.lock().calls.clone()
    }

    /// Forget recorded calls (state is kept).
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Make every subsequent ACL update fail with a remote 500.
    pub fn reject_acl_updates(&self, reject: bool) {
        self.lock().reject_acl_updates = reject;
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: ManagementCall) -> MutexGuard<'_, MemoryState> {
        let mut state = self.lock();
        state.calls.push(call);
        state
    }
}

fn bucket_key(name: &str, namespace: &str) -> (String, String) {
    (name.to_string(), namespace.to_string())
}

fn bucket_not_found(name: &str) -> ManagementError {
    ManagementError::NotFound(format!("bucket {name}"))
}

fn user_not_found(name: &str) -> ManagementError {
    ManagementError::NotFound(format!("user {name}"))
}

#[async_trait]
impl ManagementApi for MemoryBackend {
    async fn list_base_urls(&self) -> ManagementResult<Vec<BaseUrl>> {
        self.record(ManagementCall::ListBaseUrls);
        Ok(self
            .base_urls
            .iter()
            .map(|b| BaseUrl {
                id: b.id.clone(),
                name: b.name.clone(),
            })
            .collect())
    }

    async fn get_base_url(&self, id: &str) -> ManagementResult<BaseUrlInfo> {
        self.record(ManagementCall::GetBaseUrl { id: id.to_string() });
        self.base_urls
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| ManagementError::NotFound(format!("base url {id}")))
    }

    async fn list_replication_groups(&self) -> ManagementResult<Vec<ReplicationGroup>> {
        self.record(ManagementCall::ListReplicationGroups);
        Ok(self.replication_groups.clone())
    }

    async fn bucket_exists(&self, name: &str, namespace: &str) -> ManagementResult<bool> {
        let state = self.record(ManagementCall::BucketExists {
            name: name.to_string(),
            namespace: namespace.to_string(),
        });
        Ok(state.buckets.contains_key(&bucket_key(name, namespace)))
    }

    async fn get_bucket(&self, name: &str, namespace: &str) -> ManagementResult<BucketInfo> {
        let state = self.record(ManagementCall::GetBucket {
            name: name.to_string(),
            namespace: namespace.to_string(),
        });
        let bucket = state
            .buckets
            .get(&bucket_key(name, namespace))
            .ok_or_else(|| bucket_not_found(name))?;
        let quota = bucket.quota.unwrap_or(BucketQuota {
            limit: QUOTA_UNSET,
            warning: QUOTA_UNSET,
        });
        Ok(BucketInfo {
            name: bucket.params.name.clone(),
            namespace: bucket.params.namespace.clone(),
            vpool: bucket.params.vpool.clone(),
            head_type: bucket.params.head_type.clone(),
            fs_access_enabled: bucket.params.filesystem_enabled,
            is_stale_allowed: bucket.params.is_stale_allowed,
            owner: None,
            quota_limit: quota.limit,
            quota_warning: quota.warning,
        })
    }

    async fn create_bucket(&self, params: &BucketCreate) -> ManagementResult<()> {
        let mut state = self.record(ManagementCall::CreateBucket(params.clone()));
        if !self.replication_groups.iter().any(|rg| rg.id == params.vpool) {
            return Err(ManagementError::Remote {
                status: 400,
                body: format!("unknown replication group: {}", params.vpool),
            });
        }
        let key = bucket_key(&params.name, &params.namespace);
        if state.buckets.contains_key(&key) {
            return Err(ManagementError::Conflict(format!("bucket {}", params.name)));
        }
        state.buckets.insert(
            key,
            MemoryBucket {
                params: params.clone(),
                quota: None,
                acl: BucketAcl {
                    bucket: params.name.clone(),
                    namespace: params.namespace.clone(),
                    acl: Default::default(),
                },
            },
        );
        Ok(())
    }

    async fn delete_bucket(&self, name: &str, namespace: &str) -> ManagementResult<()> {
        let mut state = self.record(ManagementCall::DeleteBucket {
            name: name.to_string(),
            namespace: namespace.to_string(),
        });
        state
            .buckets
            .remove(&bucket_key(name, namespace))
            .map(|_| ())
            .ok_or_else(|| bucket_not_found(name))
    }

    async fn create_bucket_quota(
        &self,
        name: &str,
        namespace: &str,
        quota: BucketQuota,
    ) -> ManagementResult<()> {
        let mut state = self.record(ManagementCall::CreateBucketQuota {
            name: name.to_string(),
            namespace: namespace.to_string(),
            quota,
        });
        let bucket = state
            .buckets
            .get_mut(&bucket_key(name, namespace))
            .ok_or_else(|| bucket_not_found(name))?;
        bucket.quota = BucketQuota::from_raw(quota.limit, quota.warning);
        Ok(())
    }

    async fn get_bucket_quota(
        &self,
        name: &str,
        namespace: &str,
    ) -> ManagementResult<Option<BucketQuota>> {
        let state = self.record(ManagementCall::GetBucketQuota {
            name: name.to_string(),
            namespace: namespace.to_string(),
        });
        state
            .buckets
            .get(&bucket_key(name, namespace))
            .map(|bucket| bucket.quota)
            .ok_or_else(|| bucket_not_found(name))
    }

    async fn delete_bucket_quota(&self, name: &str, namespace: &str) -> ManagementResult<()> {
        let mut state = self.record(ManagementCall::DeleteBucketQuota {
            name: name.to_string(),
            namespace: namespace.to_string(),
        });
        let bucket = state
            .buckets
            .get_mut(&bucket_key(name, namespace))
            .ok_or_else(|| bucket_not_found(name))?;
        bucket.quota = None;
        Ok(())
    }

    async fn user_exists(&self, name: &str, namespace: &str) -> ManagementResult<bool> {
        let state = self.record(ManagementCall::UserExists {
            name: name.to_string(),
            namespace: namespace.to_string(),
        });
        Ok(state.users.contains_key(name))
    }

    async fn create_user(&self, name: &str, namespace: &str) -> ManagementResult<()> {
        let mut state = self.record(ManagementCall::CreateUser {
            name: name.to_string(),
            namespace: namespace.to_string(),
        });
        if state.users.contains_key(name) {
            return Err(ManagementError::Conflict(format!("user {name}")));
        }
        state.users.insert(
            name.to_string(),
            MemoryUser {
                secrets: Vec::new(),
            },
        );
        Ok(())
    }

    async fn delete_user(&self, name: &str) -> ManagementResult<()> {
        let mut state = self.record(ManagementCall::DeleteUser {
            name: name.to_string(),
        });
        state
            .users
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| user_not_found(name))
    }

    async fn list_user_secrets(&self, name: &str) -> ManagementResult<Vec<UserSecretKey>> {
        let state = self.record(ManagementCall::ListUserSecrets {
            name: name.to_string(),
        });
        state
            .users
            .get(name)
            .map(|user| user.secrets.clone())
            .ok_or_else(|| user_not_found(name))
    }

    async fn create_user_secret(&self, name: &str) -> ManagementResult<UserSecretKey> {
        let mut state = self.record(ManagementCall::CreateUserSecret {
            name: name.to_string(),
        });
        state.secrets_issued += 1;
        let serial = state.secrets_issued;
        let user = state.users.get_mut(name).ok_or_else(|| user_not_found(name))?;
        if user.secrets.len() >= MAX_SECRET_KEYS {
            return Err(ManagementError::Remote {
                status: 400,
                body: format!("user {name} already holds {MAX_SECRET_KEYS} secret keys"),
            });
        }
        let key = UserSecretKey {
            secret_key: format!("{name}-secret-{serial:08}"),
            key_timestamp: None,
            key_expiry_timestamp: None,
        };
        user.secrets.push(key.clone());
        Ok(key)
    }

    async fn get_bucket_acl(&self, name: &str, namespace: &str) -> ManagementResult<BucketAcl> {
        let state = self.record(ManagementCall::GetBucketAcl {
            name: name.to_string(),
            namespace: namespace.to_string(),
        });
        state
            .buckets
            .get(&bucket_key(name, namespace))
            .map(|bucket| bucket.acl.clone())
            .ok_or_else(|| bucket_not_found(name))
    }

    async fn update_bucket_acl(&self, name: &str, acl: &BucketAcl) -> ManagementResult<()> {
        let mut state = self.record(ManagementCall::UpdateBucketAcl {
            name: name.to_string(),
            acl: acl.clone(),
        });
        if state.reject_acl_updates {
            return Err(ManagementError::Remote {
                status: 500,
                body: "acl update rejected".to_string(),
            });
        }
        let bucket = state
            .buckets
            .get_mut(&bucket_key(name, &acl.namespace))
            .ok_or_else(|| bucket_not_found(name))?;
        bucket.acl = acl.clone();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
