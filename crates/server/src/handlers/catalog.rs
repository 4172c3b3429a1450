//! Catalog endpoint.

use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use objbroker_core::{Plan, ServiceDefinition};
use serde::Serialize;

/// Catalog response.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub services: Vec<ServiceResponse>,
}

/// A service offering as advertised to the platform.
#[derive(Debug, Serialize)]
pub struct ServiceResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub bindable: bool,
    pub tags: Vec<String>,
    pub plans: Vec<PlanResponse>,
}

/// A plan as advertised to the platform.
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub free: bool,
}

impl From<&Plan> for PlanResponse {
    fn from(plan: &Plan) -> Self {
        Self {
            id: plan.id.clone(),
            name: plan.name.clone(),
            description: plan.description.clone(),
            free: plan.free,
        }
    }
}

impl From<&ServiceDefinition> for ServiceResponse {
    fn from(service: &ServiceDefinition) -> Self {
        Self {
            id: service.id.clone(),
            name: service.name.clone(),
            description: service.description.clone(),
            bindable: service.bindable,
            tags: service.tags.clone(),
            plans: service.plans.iter().map(PlanResponse::from).collect(),
        }
    }
}

/// GET /v2/catalog
pub async fn get_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        services: state
            .provisioner
            .catalog()
            .services()
            .map(ServiceResponse::from)
            .collect(),
    })
}
