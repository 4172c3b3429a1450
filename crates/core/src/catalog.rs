//! Service catalog.
//!
//! The catalog is loaded once from configuration and never mutated. Lookups
//! by service id and plan id go through hash indexes built at load time; the
//! ordered definitions are kept for listing.

use crate::error::{Error, Result};
use crate::quota::{BucketQuota, QUOTA_UNSET};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A catalog entry describing one storage offering.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceDefinition {
    /// Service id as sent by the platform.
    pub id: String,
    /// Human-readable service name.
    pub name: String,
    /// Service description.
    #[serde(default)]
    pub description: String,
    /// Whether instances of this service can be bound.
    #[serde(default = "default_bindable")]
    pub bindable: bool,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Bucket head type (e.g. "s3", "swift").
    #[serde(default = "default_head_type")]
    pub head_type: String,
    /// Create buckets with file system access enabled.
    #[serde(default)]
    pub file_system_enabled: bool,
    /// Allow reads of stale data during a site outage.
    #[serde(default)]
    pub stale_allowed: bool,
    /// Plans, in catalog order.
    #[serde(default)]
    pub plans: Vec<Plan>,
}

/// A plan within a service definition.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Plan {
    /// Plan id as sent by the platform.
    pub id: String,
    /// Human-readable plan name.
    pub name: String,
    /// Plan description.
    #[serde(default)]
    pub description: String,
    /// Whether the plan is free of charge.
    #[serde(default = "default_free")]
    pub free: bool,
    /// Hard quota limit in GB, -1 when unset.
    #[serde(default = "default_quota")]
    pub quota_limit: i64,
    /// Quota warning threshold in GB, -1 when unset.
    #[serde(default = "default_quota")]
    pub quota_warning: i64,
}

fn default_bindable() -> bool {
    true
}

fn default_head_type() -> String {
    "s3".to_string()
}

fn default_free() -> bool {
    true
}

fn default_quota() -> i64 {
    QUOTA_UNSET
}

impl Plan {
    /// The quota this plan applies, or `None` when both thresholds are unset.
    pub fn quota(&self) -> Option<BucketQuota> {
        BucketQuota::from_raw(self.quota_limit, self.quota_warning)
    }
}

#[derive(Clone, Debug)]
struct CatalogEntry {
    definition: ServiceDefinition,
    plans: HashMap<String, usize>,
}

/// Immutable, indexed service catalog.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    services: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate service ids, duplicate plan ids
    /// within a service, and plans with malformed quotas.
    pub fn new(definitions: Vec<ServiceDefinition>) -> Result<Self> {
        let mut entries = Vec::with_capacity(definitions.len());
        let mut services = HashMap::with_capacity(definitions.len());

        for definition in definitions {
            if services.contains_key(&definition.id) {
                return Err(Error::DuplicateCatalogEntry(format!(
                    "service {}",
                    definition.id
                )));
            }

            let mut plans = HashMap::with_capacity(definition.plans.len());
            for (idx, plan) in definition.plans.iter().enumerate() {
                if let Some(quota) = plan.quota() {
                    quota
                        .validate()
                        .map_err(|e| Error::InvalidQuota(format!("plan {}: {e}", plan.id)))?;
                }
                if plans.insert(plan.id.clone(), idx).is_some() {
                    return Err(Error::DuplicateCatalogEntry(format!(
                        "plan {} in service {}",
                        plan.id, definition.id
                    )));
                }
            }

            services.insert(definition.id.clone(), entries.len());
            entries.push(CatalogEntry { definition, plans });
        }

        Ok(Self { entries, services })
    }

    /// Look up a service definition and one of its plans.
    pub fn find_plan(&self, service_id: &str, plan_id: &str) -> Result<(&ServiceDefinition, &Plan)> {
        let entry = self
            .services
            .get(service_id)
            .map(|&idx| &self.entries[idx])
            .ok_or_else(|| Error::UnknownService(service_id.to_string()))?;

        let plan = entry
            .plans
            .get(plan_id)
            .map(|&idx| &entry.definition.plans[idx])
            .ok_or_else(|| Error::UnknownPlan {
                service_id: service_id.to_string(),
                plan_id: plan_id.to_string(),
            })?;

        Ok((&entry.definition, plan))
    }

    /// Service definitions in catalog order.
    pub fn services(&self) -> impl Iterator<Item = &ServiceDefinition> {
        self.entries.iter().map(|entry| &entry.definition)
    }

    /// Number of service definitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no services.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(id: &str, limit: i64, warning: i64) -> Plan {
        Plan {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            free: true,
            quota_limit: limit,
            quota_warning: warning,
        }
    }

    fn service(id: &str, plans: Vec<Plan>) -> ServiceDefinition {
        ServiceDefinition {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            bindable: true,
            tags: Vec::new(),
            head_type: "s3".to_string(),
            file_system_enabled: false,
            stale_allowed: false,
            plans,
        }
    }

    #[test]
    fn find_plan_resolves_both_levels() {
        let catalog = Catalog::new(vec![
            service("svc-a", vec![plan("gold", 100, 80), plan("free", -1, -1)]),
            service("svc-b", vec![plan("gold", 5, 4)]),
        ])
        .unwrap();

        let (svc, gold) = catalog.find_plan("svc-a", "gold").unwrap();
        assert_eq!(svc.id, "svc-a");
        assert_eq!(
            gold.quota(),
            Some(BucketQuota {
                limit: 100,
                warning: 80
            })
        );

        let (_, free) = catalog.find_plan("svc-a", "free").unwrap();
        assert_eq!(free.quota(), None);

        let (_, other) = catalog.find_plan("svc-b", "gold").unwrap();
        assert_eq!(other.quota_limit, 5);
    }

    #[test]
    fn unknown_service_and_plan_are_distinct_errors() {
        let catalog = Catalog::new(vec![service("svc-a", vec![plan("gold", 1, 1)])]).unwrap();

        match catalog.find_plan("missing", "gold") {
            Err(Error::UnknownService(id)) => assert_eq!(id, "missing"),
            other => panic!("unexpected result: {other:?}"),
        }
        match catalog.find_plan("svc-a", "platinum") {
            Err(Error::UnknownPlan { plan_id, .. }) => assert_eq!(plan_id, "platinum"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = Catalog::new(vec![service("a", vec![]), service("a", vec![])]);
        assert!(matches!(result, Err(Error::DuplicateCatalogEntry(_))));

        let result = Catalog::new(vec![service("a", vec![plan("p", 1, 1), plan("p", 2, 2)])]);
        assert!(matches!(result, Err(Error::DuplicateCatalogEntry(_))));
    }

    #[test]
    fn rejects_malformed_quota() {
        let result = Catalog::new(vec![service("a", vec![plan("p", -7, 1)])]);
        assert!(matches!(result, Err(Error::InvalidQuota(_))));
    }

    #[test]
    fn services_keep_catalog_order() {
        let catalog = Catalog::new(vec![
            service("z", vec![]),
            service("a", vec![]),
            service("m", vec![]),
        ])
        .unwrap();
        let ids: Vec<_> = catalog.services().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["z", "a", "m"]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn plan_defaults_to_unset_quota() {
        let json = r#"{"id":"p","name":"plain"}"#;
        let plan: Plan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.quota_limit, -1);
        assert_eq!(plan.quota_warning, -1);
        assert!(plan.quota().is_none());
    }

    #[test]
    fn service_defaults_to_s3_head() {
        let json = r#"{"id":"s","name":"svc","plans":[]}"#;
        let svc: ServiceDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(svc.head_type, "s3");
        assert!(svc.bindable);
        assert!(!svc.file_system_enabled);
        assert!(!svc.stale_allowed);
    }
}
