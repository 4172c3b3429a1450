//! Test fixtures: configuration and HTTP request helpers.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use objbroker_core::config::AppConfig;
use objbroker_core::{Plan, ServiceDefinition};
use serde_json::Value;
use tower::ServiceExt;

/// Test configuration: the repository service from `AppConfig::for_testing`
/// plus a bindable `svc-a` with `gold` (100/80), `unlimited` and `small`
/// (10/-1) plans.
#[allow(dead_code)]
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::for_testing();
    config.catalog.services.push(ServiceDefinition {
        id: "svc-a".to_string(),
        name: "bucket".to_string(),
        description: "Object storage bucket".to_string(),
        bindable: true,
        tags: vec!["s3".to_string()],
        head_type: "s3".to_string(),
        file_system_enabled: false,
        stale_allowed: false,
        plans: vec![
            plan("gold", 100, 80),
            plan("unlimited", -1, -1),
            plan("small", 10, -1),
        ],
    });
    config
}

#[allow(dead_code)]
pub fn plan(id: &str, quota_limit: i64, quota_warning: i64) -> Plan {
    Plan {
        id: id.to_string(),
        name: id.to_string(),
        description: format!("{id} plan"),
        free: true,
        quota_limit,
        quota_warning,
    }
}

/// Send a request through the router and decode the JSON response.
#[allow(dead_code)]
pub async fn json_request(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let request = builder.body(body).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    (status, json)
}
