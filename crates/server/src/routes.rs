//! Route configuration.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, put};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness, unauthenticated for load balancers and probes
        .route("/health", get(handlers::health_check))
        .route("/v2/catalog", get(handlers::get_catalog))
        .route(
            "/v2/service_instances/{instance_id}",
            put(handlers::provision)
                .patch(handlers::update_instance)
                .delete(handlers::deprovision),
        )
        .route(
            "/v2/service_instances/{instance_id}/service_bindings/{binding_id}",
            put(handlers::bind).delete(handlers::unbind),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
