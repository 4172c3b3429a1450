//! Service instance lifecycle: provision, update and deprovision.

use crate::error::{ApiError, ApiResult};
use crate::handlers::EmptyResponse;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

/// Provision request body.
#[derive(Debug, Deserialize)]
pub struct ProvisionRequest {
    pub service_id: String,
    pub plan_id: String,
}

/// Update request body. Without a plan id there is nothing to change.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub service_id: String,
    #[serde(default)]
    pub plan_id: Option<String>,
}

/// PUT /v2/service_instances/{instance_id}
pub async fn provision(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
    Json(req): Json<ProvisionRequest>,
) -> ApiResult<(StatusCode, Json<EmptyResponse>)> {
    let buckets = state.provisioner.buckets();

    if buckets.exists(&instance_id).await? {
        return Err(ApiError::Conflict(format!(
            "service instance {instance_id} already exists"
        )));
    }

    buckets
        .create(&instance_id, &req.service_id, &req.plan_id)
        .await?;

    tracing::info!(
        instance_id = %instance_id,
        service_id = %req.service_id,
        plan_id = %req.plan_id,
        "Service instance provisioned"
    );

    Ok((StatusCode::CREATED, Json(EmptyResponse::default())))
}

/// PATCH /v2/service_instances/{instance_id}
pub async fn update_instance(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
    Json(req): Json<UpdateRequest>,
) -> ApiResult<Json<EmptyResponse>> {
    let Some(plan_id) = req.plan_id else {
        return Ok(Json(EmptyResponse::default()));
    };

    state
        .provisioner
        .buckets()
        .change_plan(&instance_id, &req.service_id, &plan_id)
        .await?;

    tracing::info!(
        instance_id = %instance_id,
        plan_id = %plan_id,
        "Service instance plan updated"
    );

    Ok(Json(EmptyResponse::default()))
}

/// DELETE /v2/service_instances/{instance_id}
pub async fn deprovision(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
) -> ApiResult<Json<EmptyResponse>> {
    state.provisioner.buckets().delete(&instance_id).await?;

    tracing::info!(instance_id = %instance_id, "Service instance deprovisioned");
    Ok(Json(EmptyResponse::default()))
}
