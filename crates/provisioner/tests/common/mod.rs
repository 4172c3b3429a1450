//! Shared fixtures for provisioner integration tests.

#![allow(dead_code)]

use objbroker_core::config::{AppConfig, BrokerConfig};
use objbroker_core::{Catalog, Plan, ServiceDefinition};
use objbroker_management::{BaseUrlInfo, MemoryBackend, ReplicationGroup};
use objbroker_provisioner::{Provisioner, ProvisioningContext};
use std::sync::Arc;

pub const PREFIX: &str = "ecs-cf-broker-";
pub const NAMESPACE: &str = "ns1";
pub const RG_ID: &str = "rg1";

pub fn plan(id: &str, quota_limit: i64, quota_warning: i64) -> Plan {
    Plan {
        id: id.to_string(),
        name: id.to_string(),
        description: String::new(),
        free: true,
        quota_limit,
        quota_warning,
    }
}

/// One service `svc-a` with plans `gold` (100/80), `unlimited` (-1/-1) and
/// `small` (10/-1).
pub fn catalog() -> Arc<Catalog> {
    let service = ServiceDefinition {
        id: "svc-a".to_string(),
        name: "bucket".to_string(),
        description: "Object storage bucket".to_string(),
        bindable: true,
        tags: vec!["s3".to_string()],
        head_type: "s3".to_string(),
        file_system_enabled: false,
        stale_allowed: true,
        plans: vec![
            plan("gold", 100, 80),
            plan("unlimited", -1, -1),
            plan("small", 10, -1),
        ],
    };
    Arc::new(Catalog::new(vec![service]).unwrap())
}

pub fn base_url(id: &str, name: &str) -> BaseUrlInfo {
    BaseUrlInfo {
        id: id.to_string(),
        name: name.to_string(),
        baseurl: format!("{}.example.com", name.to_lowercase()),
        namespace_in_host: false,
    }
}

pub fn backend() -> Arc<MemoryBackend> {
    Arc::new(MemoryBackend::new(
        vec![base_url("1", "DefaultBaseUrl")],
        vec![ReplicationGroup {
            id: RG_ID.to_string(),
            name: "Silver".to_string(),
        }],
    ))
}

pub fn broker_config() -> BrokerConfig {
    let mut config = AppConfig::for_testing().broker;
    config.namespace = NAMESPACE.to_string();
    config.replication_group = "Silver".to_string();
    config.prefix = PREFIX.to_string();
    config
}

pub fn context() -> ProvisioningContext {
    ProvisioningContext::new(
        "http://defaultbaseurl.example.com:9020",
        ReplicationGroup {
            id: RG_ID.to_string(),
            name: "Silver".to_string(),
        },
    )
}

/// A provisioner over a fresh simulator, returned with the simulator so the
/// call journal can be inspected.
pub fn provisioner() -> (Arc<MemoryBackend>, Provisioner) {
    let backend = backend();
    let provisioner = Provisioner::new(backend.clone(), catalog(), &broker_config(), context());
    (backend, provisioner)
}

pub fn prefixed(id: &str) -> String {
    format!("{PREFIX}{id}")
}
