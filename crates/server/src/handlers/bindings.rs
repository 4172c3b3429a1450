//! Service bindings: one object user per binding, granted on the instance
//! bucket.

use crate::error::{ApiError, ApiResult};
use crate::handlers::EmptyResponse;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use objbroker_management::{ManagementError, UserSecretKey};
use objbroker_provisioner::{ProvisionError, ProvisionResult, Provisioner};
use serde::Serialize;

/// Bind response.
#[derive(Debug, Serialize)]
pub struct BindResponse {
    pub credentials: BindingCredentials,
}

/// Credentials handed to the bound application.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingCredentials {
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub endpoint: String,
}

/// PUT /v2/service_instances/{instance_id}/service_bindings/{binding_id}
///
/// Creates the binding user, then grants it full control on the instance
/// bucket. The secret key is only ever returned here. If either step fails
/// the user is removed again so the binding can be retried.
pub async fn bind(
    State(state): State<AppState>,
    Path((instance_id, binding_id)): Path<(String, String)>,
) -> ApiResult<(StatusCode, Json<BindResponse>)> {
    let provisioner = &state.provisioner;
    let buckets = provisioner.buckets();
    let users = provisioner.users();

    if !buckets.exists(&instance_id).await? {
        return Err(ApiError::NotFound(format!("service instance {instance_id}")));
    }
    if users.exists(&binding_id).await? {
        return Err(ApiError::Conflict(format!(
            "service binding {binding_id} already exists"
        )));
    }

    let key = match create_binding_user(provisioner, &instance_id, &binding_id).await {
        Ok(key) => key,
        Err(err) => {
            if !matches!(err, ProvisionError::Management(ManagementError::Conflict(_))) {
                discard_user(provisioner, &binding_id).await;
            }
            return Err(err.into());
        }
    };

    tracing::info!(
        instance_id = %instance_id,
        binding_id = %binding_id,
        "Service binding created"
    );

    let credentials = BindingCredentials {
        access_key: users.name(&binding_id),
        secret_key: key.secret_key,
        bucket: buckets.name(&instance_id),
        endpoint: provisioner.context().endpoint.clone(),
    };
    Ok((StatusCode::CREATED, Json(BindResponse { credentials })))
}

async fn create_binding_user(
    provisioner: &Provisioner,
    instance_id: &str,
    binding_id: &str,
) -> ProvisionResult<UserSecretKey> {
    let key = provisioner.users().create(binding_id).await?;
    provisioner.access().grant(instance_id, binding_id).await?;
    Ok(key)
}

async fn discard_user(provisioner: &Provisioner, binding_id: &str) {
    let users = provisioner.users();
    match users.delete(binding_id).await {
        Ok(()) => {}
        Err(e) if e.is_not_found() => {}
        Err(e) => tracing::warn!(
            binding_id = %binding_id,
            error = %e,
            "Failed to remove user of incomplete binding"
        ),
    }
}

/// DELETE /v2/service_instances/{instance_id}/service_bindings/{binding_id}
///
/// Revokes the binding user's grants on the instance bucket, then deletes
/// the user. A missing instance bucket only skips the revoke.
pub async fn unbind(
    State(state): State<AppState>,
    Path((instance_id, binding_id)): Path<(String, String)>,
) -> ApiResult<Json<EmptyResponse>> {
    let provisioner = &state.provisioner;
    match provisioner.access().revoke(&instance_id, &binding_id).await {
        Ok(()) => {}
        Err(e) if e.is_not_found() => {
            tracing::info!(
                instance_id = %instance_id,
                binding_id = %binding_id,
                error = %e,
                "Instance bucket gone, skipping revoke"
            );
        }
        Err(e) => return Err(e.into()),
    }
    provisioner.users().delete(&binding_id).await?;

    tracing::info!(
        instance_id = %instance_id,
        binding_id = %binding_id,
        "Service binding deleted"
    );
    Ok(Json(EmptyResponse::default()))
}
