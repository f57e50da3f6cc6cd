//! HTTP request handlers for the gateway API.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use gateway_core::{ProviderId, RoutingDecision};
use gateway_resilience::{HealthRecord, HealthSnapshot};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    error::ApiError,
    extractors::{JsonBody, RequestId},
    service::{GenerateRequest, GenerateResponse, RouteRequest},
    state::AppState,
};

/// Liveness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// Version
    pub version: &'static str,
}

/// Liveness endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Plain liveness probe
pub async fn liveness_check() -> impl IntoResponse {
    (StatusCode::OK, "alive")
}

/// Readiness response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    /// `ready` or `not_ready`
    pub status: &'static str,
    /// Providers currently healthy
    pub healthy_providers: Vec<ProviderId>,
}

/// Ready while at least one provider is healthy
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let healthy_providers = state.service.health().healthy_providers();
    let (status, label) = if healthy_providers.is_empty() {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    } else {
        (StatusCode::OK, "ready")
    };

    (
        status,
        Json(ReadinessResponse {
            status: label,
            healthy_providers,
        }),
    )
}

/// Prometheus metrics
pub async fn metrics_endpoint(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    state.service.publish_health();
    let body = state
        .metrics
        .render()
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}

/// Decide where a request would go without executing it
#[instrument(skip(state, body))]
pub async fn route_request(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    JsonBody(body): JsonBody<RouteRequest>,
) -> Result<Json<RoutingDecision>, ApiError> {
    validate_message(&body.message)?;
    let decision = state.service.route(&body);
    debug!(
        provider = %decision.provider,
        model = %decision.model,
        use_reasoning = decision.use_reasoning,
        "Routing decision"
    );
    Ok(Json(decision))
}

/// Run the full pipeline: decide, augment, execute with failover
#[instrument(skip(state, body))]
pub async fn generate(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    JsonBody(body): JsonBody<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    validate_message(&body.route.message)?;
    if body.timeout_ms == Some(0) {
        return Err(ApiError::bad_request("timeout_ms must be greater than zero"));
    }

    let response = state.service.generate(&body).await?;
    Ok(Json(response))
}

fn validate_message(message: &str) -> Result<(), ApiError> {
    if message.trim().is_empty() {
        return Err(ApiError::bad_request("message must not be empty"));
    }
    Ok(())
}

/// Health of one provider as reported by the admin API
#[derive(Debug, Serialize)]
pub struct ProviderStatus {
    /// Provider
    pub provider: ProviderId,
    /// Whether a credential is currently available
    pub has_credential: bool,
    /// Current health record
    #[serde(flatten)]
    pub health: HealthRecord,
}

/// Admin view of every provider
#[derive(Debug, Serialize)]
pub struct ProvidersResponse {
    /// One entry per provider in canonical order
    pub providers: Vec<ProviderStatus>,
    /// Healthy providers in canonical order
    pub healthy: Vec<ProviderId>,
    /// Whether the background prober is running
    pub monitor_running: bool,
    /// When this view was taken
    pub generated_at: DateTime<Utc>,
}

impl ProvidersResponse {
    fn from_snapshot(state: &AppState, snapshot: &HealthSnapshot) -> Self {
        let directory = state.service.directory();
        Self {
            providers: snapshot
                .iter()
                .map(|(provider, health)| ProviderStatus {
                    provider,
                    has_credential: directory.has_credential(provider),
                    health,
                })
                .collect(),
            healthy: snapshot.healthy_providers(),
            monitor_running: state.monitor.is_running(),
            generated_at: Utc::now(),
        }
    }
}

/// Current health of every provider
pub async fn list_providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    let snapshot = state.service.health().snapshot();
    Json(ProvidersResponse::from_snapshot(&state, &snapshot))
}

/// Run one probe round now and return the resulting health
#[instrument(skip(state))]
pub async fn probe_providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    let snapshot = state.monitor.probe_now().await;
    state.service.publish_health();
    Json(ProvidersResponse::from_snapshot(&state, &snapshot))
}
