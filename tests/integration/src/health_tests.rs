//! Health probing against mock providers

use crate::fixtures::*;
use crate::helpers::TestGateway;
use crate::mock_providers::MockProviders;
use axum::http::StatusCode;
use gateway_core::ProviderId;
use std::time::Duration;

#[tokio::test]
async fn test_probe_marks_unreachable_providers() {
    let mocks = MockProviders::start().await;
    mocks.openai.mock_connectivity_ok().await;
    mocks.anthropic.mock_connectivity_error(500).await;
    mocks.gemini.mock_connectivity_ok().await;
    mocks.perplexity.mock_connectivity_error(401).await;
    let gateway = TestGateway::from_config(&gateway_config(&mocks));

    let (status, body) = gateway.post_empty("/admin/providers/probe").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["healthy"], serde_json::json!(["openai", "gemini"]));

    let providers = body["providers"].as_array().unwrap();
    assert_eq!(providers[1]["provider"], "anthropic");
    assert_eq!(providers[1]["is_healthy"], false);
    assert_eq!(providers[1]["error_count"], 1);
    assert!(providers[1]["last_error"].as_str().unwrap().contains("probe rejected"));
    assert_eq!(providers[0]["is_healthy"], true);
    assert!(providers[0]["last_response_time_ms"].is_u64());
    assert!(providers[0]["last_checked_at"].is_string());
}

#[tokio::test]
async fn test_probe_without_credential_never_calls_provider() {
    let mocks = MockProviders::start().await;
    mocks.all_reachable().await;
    let mut config = gateway_config(&mocks);
    config.providers[0] = keyless_provider_config(ProviderId::OpenAI, &mocks.openai.url());
    let gateway = TestGateway::from_config(&config);

    let (_, body) = gateway.post_empty("/admin/providers/probe").await;

    assert_eq!(body["providers"][0]["has_credential"], false);
    assert_eq!(body["providers"][0]["is_healthy"], false);
    assert_eq!(body["providers"][0]["last_error"], "missing credential");
    assert!(mocks
        .openai
        .server
        .received_requests()
        .await
        .unwrap_or_default()
        .is_empty());
}

#[tokio::test]
async fn test_probe_recovers_provider() {
    let mocks = MockProviders::start().await;
    mocks.all_succeed().await;
    mocks.all_reachable().await;
    mocks.gemini.server.reset().await;
    mocks.gemini.mock_generation_error(500).await;
    let gateway = TestGateway::from_config(&gateway_config(&mocks));

    let (_, body) = gateway
        .post("/v1/generate", &generate_body(TECHNICAL_MESSAGE))
        .await;
    assert_eq!(body["provider"], "openai");
    assert!(!gateway.state.service.health().record(ProviderId::Gemini).is_healthy);

    mocks.gemini.mock_connectivity_ok().await;
    let (_, body) = gateway.post_empty("/admin/providers/probe").await;
    assert_eq!(body["providers"][2]["is_healthy"], true);
    assert_eq!(body["providers"][2]["error_count"], 0);
    assert!(body["providers"][2]["last_error"].is_null());
}

#[tokio::test]
async fn test_readiness_follows_probe_results() {
    let mocks = MockProviders::start().await;
    for provider in ProviderId::ALL {
        mocks.get(provider).mock_connectivity_error(503).await;
    }
    let gateway = TestGateway::from_config(&gateway_config(&mocks));

    let (status, body) = gateway.get("/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["healthy_providers"].as_array().unwrap().len(), 4);

    gateway.post_empty("/admin/providers/probe").await;

    let (status, body) = gateway.get("/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "not_ready");
}

#[tokio::test]
async fn test_background_monitor_probes_until_stopped() {
    let mocks = MockProviders::start().await;
    mocks.openai.mock_connectivity_error(500).await;
    mocks.anthropic.mock_connectivity_ok().await;
    mocks.gemini.mock_connectivity_ok().await;
    mocks.perplexity.mock_connectivity_ok().await;
    let mut config = gateway_config(&mocks);
    config.health.probe_interval = Duration::from_millis(100);
    let gateway = TestGateway::from_config(&config);

    let monitor = &gateway.state.monitor;
    monitor.start();
    assert!(monitor.is_running());

    let health = gateway.state.service.health();
    let mut waited = Duration::ZERO;
    while health.record(ProviderId::OpenAI).is_healthy && waited < Duration::from_secs(5) {
        tokio::time::sleep(Duration::from_millis(20)).await;
        waited += Duration::from_millis(20);
    }
    assert!(!health.record(ProviderId::OpenAI).is_healthy);
    assert!(health.record(ProviderId::Gemini).is_healthy);

    let (_, body) = gateway.get("/admin/providers").await;
    assert_eq!(body["monitor_running"], true);

    monitor.stop().await;
    assert!(!monitor.is_running());
}

#[tokio::test]
async fn test_metrics_publish_provider_health() {
    let mocks = MockProviders::start().await;
    mocks.all_reachable().await;
    mocks.gemini.server.reset().await;
    mocks.gemini.mock_connectivity_error(500).await;
    let gateway = TestGateway::from_config(&gateway_config(&mocks));

    gateway.post_empty("/admin/providers/probe").await;
    let (status, body) = gateway.get("/metrics").await;

    assert_eq!(status, StatusCode::OK);
    let text = body.as_str().unwrap();
    assert!(text.contains(r#"router_provider_healthy{provider="gemini"} 0"#));
    assert!(text.contains(r#"router_provider_healthy{provider="openai"} 1"#));
}
