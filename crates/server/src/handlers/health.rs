//! Health check endpoint.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub broker_api_version: String,
    pub management_backend: &'static str,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    state
        .management
        .health_check()
        .await
        .map_err(objbroker_provisioner::ProvisionError::from)?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        broker_api_version: state.config.server.broker_api_version.clone(),
        management_backend: state.management.backend_name(),
    }))
}
