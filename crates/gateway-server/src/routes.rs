//! Route definitions for the gateway API.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{handlers, state::AppState};

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let timeout = state.request_timeout;

    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health_check))
        .route("/live", get(handlers::liveness_check))
        .route("/ready", get(handlers::readiness_check))
        // Metrics endpoint
        .route("/metrics", get(handlers::metrics_endpoint))
        // Routing API
        .nest("/v1", api_routes())
        // Admin endpoints
        .nest("/admin", admin_routes())
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/route", post(handlers::route_request))
        .route("/generate", post(handlers::generate))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/providers", get(handlers::list_providers))
        .route("/providers/probe", post(handlers::probe_providers))
}
