//! Object endpoint resolution.

use crate::error::{ProvisionError, ProvisionResult};
use objbroker_core::DEFAULT_BASE_URL_NAME;
use objbroker_core::config::BrokerConfig;
use objbroker_management::{BaseUrl, ManagementApi};

/// Resolve the data-plane URL buckets are reached through.
///
/// An explicit `object_endpoint` is returned verbatim without any remote call.
/// Otherwise a base URL is picked from the management API listing and its
/// namespace-scoped plain HTTP URL is returned.
pub async fn resolve_endpoint(
    api: &dyn ManagementApi,
    config: &BrokerConfig,
) -> ProvisionResult<String> {
    if let Some(endpoint) = &config.object_endpoint {
        return Ok(endpoint.clone());
    }

    let candidates = api.list_base_urls().await?;
    let chosen = select_base_url(&candidates, config.base_url.as_deref())?;
    let info = api.get_base_url(&chosen.id).await?;

    Ok(info.namespace_url(&config.namespace, false))
}

/// Pick a base URL candidate.
///
/// With a configured name only an exact match is accepted. Without one the
/// candidate named [`DEFAULT_BASE_URL_NAME`] wins, falling back to the first
/// candidate in listing order.
pub fn select_base_url<'a>(
    candidates: &'a [BaseUrl],
    name: Option<&str>,
) -> ProvisionResult<&'a BaseUrl> {
    let first = candidates.first().ok_or(ProvisionError::NoEndpoint)?;

    match name {
        Some(name) => candidates
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| ProvisionError::BaseUrlNotFound(name.to_string())),
        None => Ok(candidates
            .iter()
            .find(|c| c.name == DEFAULT_BASE_URL_NAME)
            .unwrap_or(first)),
    }
}
