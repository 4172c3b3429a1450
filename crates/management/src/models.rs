//! Management API request and response models.
//!
//! Field names follow the management API's JSON representation.

use objbroker_core::{BucketQuota, QUOTA_UNSET};
use serde::{Deserialize, Serialize};

/// Data-plane port for plain HTTP.
pub const HTTP_PORT: u16 = 9020;

/// Data-plane port for HTTPS.
pub const HTTPS_PORT: u16 = 9021;

/// A base URL candidate as returned by the listing call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseUrl {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BaseUrlList {
    #[serde(default)]
    pub base_url: Vec<BaseUrl>,
}

/// Full base URL record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseUrlInfo {
    pub id: String,
    pub name: String,
    /// Host name of the data plane.
    pub baseurl: String,
    /// Whether the namespace is encoded as a host name label.
    #[serde(default)]
    pub namespace_in_host: bool,
}

impl BaseUrlInfo {
    /// Data-plane URL for a namespace.
    ///
    /// With `namespace_in_host` set the namespace becomes the leftmost host
    /// label, e.g. `http://ns1.s3.example.com:9020`.
    pub fn namespace_url(&self, namespace: &str, use_tls: bool) -> String {
        let (scheme, port) = if use_tls {
            ("https", HTTPS_PORT)
        } else {
            ("http", HTTP_PORT)
        };

        if self.namespace_in_host {
            format!("{scheme}://{namespace}.{}:{port}", self.baseurl)
        } else {
            format!("{scheme}://{}:{port}", self.baseurl)
        }
    }
}

/// A replication group (data service virtual pool).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationGroup {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReplicationGroupList {
    #[serde(default)]
    pub data_service_vpool: Vec<ReplicationGroup>,
}

/// Bucket creation parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCreate {
    pub name: String,
    pub namespace: String,
    /// Replication group id.
    pub vpool: String,
    pub head_type: String,
    pub filesystem_enabled: bool,
    pub is_stale_allowed: bool,
}

/// Bucket metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketInfo {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub vpool: String,
    #[serde(default)]
    pub head_type: String,
    #[serde(default)]
    pub fs_access_enabled: bool,
    #[serde(default)]
    pub is_stale_allowed: bool,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default = "quota_unset", rename = "block_size")]
    pub quota_limit: i64,
    #[serde(default = "quota_unset", rename = "notification_size")]
    pub quota_warning: i64,
}

fn quota_unset() -> i64 {
    QUOTA_UNSET
}

/// Quota document as exchanged with the management API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BucketQuotaParam {
    pub block_size: i64,
    pub notification_size: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl BucketQuotaParam {
    pub fn new(quota: BucketQuota, namespace: &str) -> Self {
        Self {
            block_size: quota.limit,
            notification_size: quota.warning,
            namespace: Some(namespace.to_string()),
        }
    }

    pub fn quota(&self) -> Option<BucketQuota> {
        BucketQuota::from_raw(self.block_size, self.notification_size)
    }
}

/// A bucket access control list document.
///
/// Updates replace the whole document; there is no partial patch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketAcl {
    pub bucket: String,
    pub namespace: String,
    #[serde(default)]
    pub acl: AclEntries,
}

/// The entries of a bucket ACL.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntries {
    #[serde(default)]
    pub user_acl: Vec<UserAcl>,
    #[serde(default)]
    pub group_acl: Vec<GroupAcl>,
    #[serde(default)]
    pub customgroup_acl: Vec<CustomGroupAcl>,
}

/// Permissions granted to one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAcl {
    pub user: String,
    #[serde(default)]
    pub permission: Vec<String>,
}

impl UserAcl {
    pub fn new(user: impl Into<String>, permission: Vec<String>) -> Self {
        Self {
            user: user.into(),
            permission,
        }
    }
}

/// Permissions granted to a predefined group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAcl {
    pub group: String,
    #[serde(default)]
    pub permission: Vec<String>,
}

/// Permissions granted to a custom group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomGroupAcl {
    pub customgroup: String,
    #[serde(default)]
    pub permission: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct UserCreateParam {
    pub user: String,
    pub namespace: String,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct UserDeleteParam {
    pub user: String,
}

/// A user secret key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSecretKey {
    pub secret_key: String,
    #[serde(default)]
    pub key_timestamp: Option<String>,
    #[serde(default)]
    pub key_expiry_timestamp: Option<String>,
}

/// Secret key listing; the management API reports up to two key slots.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct UserSecretKeyList {
    #[serde(default)]
    pub secret_key_1: Option<String>,
    #[serde(default)]
    pub key_timestamp_1: Option<String>,
    #[serde(default)]
    pub key_expiry_timestamp_1: Option<String>,
    #[serde(default)]
    pub secret_key_2: Option<String>,
    #[serde(default)]
    pub key_timestamp_2: Option<String>,
    #[serde(default)]
    pub key_expiry_timestamp_2: Option<String>,
}

impl UserSecretKeyList {
    /// Populated key slots, in slot order.
    pub fn into_keys(self) -> Vec<UserSecretKey> {
        [
            (
                self.secret_key_1,
                self.key_timestamp_1,
                self.key_expiry_timestamp_1,
            ),
            (
                self.secret_key_2,
                self.key_timestamp_2,
                self.key_expiry_timestamp_2,
            ),
        ]
        .into_iter()
        .filter_map(|(key, timestamp, expiry)| {
            key.filter(|k| !k.is_empty()).map(|secret_key| UserSecretKey {
                secret_key,
                key_timestamp: timestamp.filter(|t| !t.is_empty()),
                key_expiry_timestamp: expiry.filter(|t| !t.is_empty()),
            })
        })
        .collect()
    }
}
