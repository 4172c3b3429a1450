//! Configuration types shared across crates.

use crate::catalog::{Catalog, ServiceDefinition};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Broker API version advertised by the broker protocol layer.
    #[serde(default = "default_broker_api_version")]
    pub broker_api_version: String,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_broker_api_version() -> String {
    "2.8".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            broker_api_version: default_broker_api_version(),
        }
    }
}

/// Management API backend configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ManagementConfig {
    /// In-process simulator of the management API (development and tests).
    Memory {
        /// Base URLs the simulator reports, in listing order.
        #[serde(default = "default_memory_base_urls")]
        base_urls: Vec<MemoryBaseUrl>,
        /// Replication group names the simulator reports, in listing order.
        #[serde(default = "default_memory_replication_groups")]
        replication_groups: Vec<String>,
    },
    /// Remote management API over HTTP.
    Http {
        /// Management endpoint (e.g., "https://ecs.example.com:4443").
        endpoint: String,
        /// Management user name.
        username: String,
        /// Management password.
        /// WARNING: Prefer OBJBROKER_MANAGEMENT__PASSWORD env var over storing in config.
        password: String,
        /// Per-request timeout in seconds.
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

/// A base URL served by the in-process simulator.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemoryBaseUrl {
    /// Base URL name.
    pub name: String,
    /// Host name of the data plane.
    pub baseurl: String,
    /// Whether the namespace is part of the host name.
    #[serde(default)]
    pub namespace_in_host: bool,
}

fn default_memory_base_urls() -> Vec<MemoryBaseUrl> {
    vec![MemoryBaseUrl {
        name: crate::DEFAULT_BASE_URL_NAME.to_string(),
        baseurl: "localhost".to_string(),
        namespace_in_host: false,
    }]
}

fn default_memory_replication_groups() -> Vec<String> {
    vec!["rg1".to_string()]
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ManagementConfig {
    fn default() -> Self {
        Self::Memory {
            base_urls: default_memory_base_urls(),
            replication_groups: default_memory_replication_groups(),
        }
    }
}

impl ManagementConfig {
    /// Validate management configuration invariants.
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self {
            ManagementConfig::Memory { .. } => Ok(()),
            ManagementConfig::Http {
                endpoint,
                username,
                timeout_secs,
                ..
            } => {
                if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                    return Err(format!(
                        "management.endpoint must be an http(s) URL, got {endpoint:?}"
                    ));
                }
                if username.is_empty() {
                    return Err("management.username cannot be empty".to_string());
                }
                if *timeout_secs == 0 {
                    return Err("management.timeout_secs cannot be 0".to_string());
                }
                Ok(())
            }
        }
    }
}

/// Broker configuration: tenancy scope, naming and repository settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Namespace scoping every bucket and user.
    pub namespace: String,
    /// Name of the replication group new buckets are placed in.
    pub replication_group: String,
    /// Name of the base URL to derive the object endpoint from.
    /// When unset, "DefaultBaseUrl" is preferred, then the first listed.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Explicit object endpoint. Skips base URL resolution entirely.
    #[serde(default)]
    pub object_endpoint: Option<String>,
    /// Prefix applied to every broker-managed bucket and user name.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Bucket (unprefixed) holding the broker's own metadata.
    #[serde(default = "default_repository_bucket")]
    pub repository_bucket: String,
    /// User (unprefixed) owning the repository bucket.
    #[serde(default = "default_repository_user")]
    pub repository_user: String,
    /// Catalog service id used to create the repository bucket.
    pub repository_service_id: String,
    /// Catalog plan id used to create the repository bucket.
    pub repository_plan_id: String,
    /// Endpoint handed to the persistence layer. Defaults to the resolved
    /// object endpoint.
    #[serde(default)]
    pub repository_endpoint: Option<String>,
}

fn default_prefix() -> String {
    "ecs-cf-broker-".to_string()
}

fn default_repository_bucket() -> String {
    "repository".to_string()
}

fn default_repository_user() -> String {
    "user".to_string()
}

impl BrokerConfig {
    /// Validate broker configuration invariants.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let required = [
            ("broker.namespace", &self.namespace),
            ("broker.replication_group", &self.replication_group),
            ("broker.repository_bucket", &self.repository_bucket),
            ("broker.repository_user", &self.repository_user),
            ("broker.repository_service_id", &self.repository_service_id),
            ("broker.repository_plan_id", &self.repository_plan_id),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(format!("{field} cannot be empty"));
            }
        }

        let optional = [
            ("broker.base_url", &self.base_url),
            ("broker.object_endpoint", &self.object_endpoint),
            ("broker.repository_endpoint", &self.repository_endpoint),
        ];
        for (field, value) in optional {
            if value.as_deref().is_some_and(str::is_empty) {
                return Err(format!("{field} cannot be empty when set"));
            }
        }

        Ok(())
    }
}

/// Service catalog configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Service definitions, in catalog order.
    #[serde(default)]
    pub services: Vec<ServiceDefinition>,
}

/// Complete application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Management API configuration.
    #[serde(default)]
    pub management: ManagementConfig,
    /// Broker configuration (required).
    pub broker: BrokerConfig,
    /// Service catalog.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Validate the whole configuration and build the catalog.
    ///
    /// The repository service and plan must exist in the catalog, otherwise
    /// the repository bucket could never be created.
    pub fn validate(&self) -> Result<Catalog> {
        self.management.validate().map_err(Error::Config)?;
        self.broker.validate().map_err(Error::Config)?;

        let catalog = Catalog::new(self.catalog.services.clone())?;
        catalog.find_plan(
            &self.broker.repository_service_id,
            &self.broker.repository_plan_id,
        )?;

        Ok(catalog)
    }

    /// Create a test configuration with sensible defaults.
    ///
    /// **For testing only.** Uses the in-memory management simulator and a
    /// catalog with one repository service and one unlimited plan.
    pub fn for_testing() -> Self {
        use crate::catalog::Plan;

        Self {
            server: ServerConfig::default(),
            management: ManagementConfig::default(),
            broker: BrokerConfig {
                namespace: "ns1".to_string(),
                replication_group: "rg1".to_string(),
                base_url: None,
                object_endpoint: None,
                prefix: default_prefix(),
                repository_bucket: default_repository_bucket(),
                repository_user: default_repository_user(),
                repository_service_id: "repository-service".to_string(),
                repository_plan_id: "repository-plan".to_string(),
                repository_endpoint: None,
            },
            catalog: CatalogConfig {
                services: vec![ServiceDefinition {
                    id: "repository-service".to_string(),
                    name: "repository".to_string(),
                    description: "Broker repository".to_string(),
                    bindable: false,
                    tags: Vec::new(),
                    head_type: "s3".to_string(),
                    file_system_enabled: false,
                    stale_allowed: false,
                    plans: vec![Plan {
                        id: "repository-plan".to_string(),
                        name: "unlimited".to_string(),
                        description: "Unlimited repository plan".to_string(),
                        free: true,
                        quota_limit: crate::QUOTA_UNSET,
                        quota_warning: crate::QUOTA_UNSET,
                    }],
                }],
            },
        }
    }
}
