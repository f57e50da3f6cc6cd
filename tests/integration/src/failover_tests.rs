//! Ordered failover across real provider adapters

use crate::fixtures::*;
use crate::helpers::TestGateway;
use crate::mock_providers::MockProviders;
use axum::http::StatusCode;
use gateway_core::ProviderId;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_primary_serves_request() {
    let mocks = MockProviders::start().await;
    mocks.all_succeed().await;
    let gateway = TestGateway::from_config(&gateway_config(&mocks));

    let (status, body) = gateway
        .post("/v1/generate", &generate_body(TECHNICAL_MESSAGE))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "gemini says hi");
    assert_eq!(body["provider"], "gemini");
    assert_eq!(body["model"], "gemini-1.5-pro");
    assert_eq!(body["augmented"], false);
    assert_eq!(body["attempts"].as_array().unwrap().len(), 1);
    assert_eq!(body["attempts"][0]["outcome"], "success");

    assert_eq!(mocks.gemini.generation_calls().await, 1);
    assert_eq!(mocks.openai.generation_calls().await, 0);
}

#[tokio::test]
async fn test_request_reaches_provider_in_its_wire_format() {
    let mocks = MockProviders::start().await;
    mocks.all_succeed().await;
    let gateway = TestGateway::from_config(&gateway_config(&mocks));

    let (status, _) = gateway
        .post(
            "/v1/generate",
            &json!({
                "message": CREATIVE_MESSAGE,
                "system_prompt": "You write for a cycling brand",
                "temperature": 0.3,
                "max_tokens": 256
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let bodies = mocks.openai.generation_bodies().await;
    assert_eq!(bodies.len(), 1);
    let sent = &bodies[0];
    assert_eq!(sent["model"], "gpt-4o");
    assert_eq!(sent["max_tokens"], 256);
    assert_eq!(sent["messages"][0]["role"], "system");
    assert_eq!(sent["messages"][0]["content"], "You write for a cycling brand");
    assert_eq!(sent["messages"][1]["content"], CREATIVE_MESSAGE);
}

#[tokio::test]
async fn test_fails_over_in_canonical_order() {
    let mocks = MockProviders::start().await;
    mocks.gemini.mock_generation_error(500).await;
    mocks.openai.mock_generation_error(503).await;
    mocks.anthropic.mock_generation("anthropic recovered").await;
    mocks.perplexity.mock_generation("perplexity says hi").await;
    let gateway = TestGateway::from_config(&gateway_config(&mocks));

    let (status, body) = gateway
        .post("/v1/generate", &generate_body(TECHNICAL_MESSAGE))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "anthropic recovered");
    assert_eq!(body["provider"], "anthropic");
    assert_eq!(body["model"], "claude-3-5-sonnet-20241022");
    assert_eq!(body["decision"]["provider"], "gemini");

    let attempts = body["attempts"].as_array().unwrap();
    let order: Vec<_> = attempts.iter().map(|a| a["provider"].clone()).collect();
    assert_eq!(order, vec!["gemini", "openai", "anthropic"]);
    assert_eq!(attempts[0]["outcome"], "error");
    assert_eq!(attempts[1]["outcome"], "error");
    assert_eq!(attempts[2]["outcome"], "success");
    assert!(attempts[0]["error"].as_str().unwrap().contains("500"));

    assert_eq!(mocks.perplexity.generation_calls().await, 0);
}

#[tokio::test]
async fn test_client_errors_also_fail_over() {
    let mocks = MockProviders::start().await;
    mocks.openai.mock_generation_error(401).await;
    mocks.anthropic.mock_generation("anthropic says hi").await;
    let gateway = TestGateway::from_config(&gateway_config(&mocks));

    let (status, body) = gateway
        .post("/v1/generate", &generate_body(CREATIVE_MESSAGE))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["provider"], "anthropic");
    assert_eq!(body["attempts"][0]["provider"], "openai");
}

#[tokio::test]
async fn test_failed_provider_moves_behind_healthy_ones() {
    let mocks = MockProviders::start().await;
    mocks.gemini.mock_generation_error(500).await;
    mocks.openai.mock_generation("openai says hi").await;
    mocks.anthropic.mock_generation("anthropic says hi").await;
    let gateway = TestGateway::from_config(&gateway_config(&mocks));

    // Gemini fails once; with a threshold of one it is now unhealthy
    let (status, _) = gateway
        .post("/v1/generate", &generate_body(TECHNICAL_MESSAGE))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!gateway.state.service.health().record(ProviderId::Gemini).is_healthy);

    // Pinned to Anthropic: primary first, the unhealthy Gemini last
    let candidates = gateway
        .state
        .service
        .health()
        .fallback_chain(ProviderId::Anthropic);
    assert_eq!(
        candidates,
        vec![
            ProviderId::Anthropic,
            ProviderId::OpenAI,
            ProviderId::Perplexity,
            ProviderId::Gemini
        ]
    );
}

#[tokio::test]
async fn test_slow_provider_times_out_and_fails_over() {
    let mocks = MockProviders::start().await;
    mocks
        .anthropic
        .mock_generation_delayed("too late", Duration::from_secs(5))
        .await;
    mocks.openai.mock_generation("openai was quick").await;
    let gateway = TestGateway::from_config(&gateway_config(&mocks));

    let (status, body) = gateway
        .post(
            "/v1/generate",
            &json!({"message": GENERAL_MESSAGE, "timeout_ms": 200}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["provider"], "openai");
    assert_eq!(body["content"], "openai was quick");
    assert_eq!(body["attempts"][0]["provider"], "anthropic");
    assert_eq!(body["attempts"][0]["outcome"], "timeout");
}

#[tokio::test]
async fn test_missing_credential_is_skipped() {
    let mocks = MockProviders::start().await;
    mocks.all_succeed().await;
    let mut config = gateway_config(&mocks);
    config.providers[1] = keyless_provider_config(ProviderId::Anthropic, &mocks.anthropic.url());
    let gateway = TestGateway::from_config(&config);

    let (status, body) = gateway
        .post("/v1/generate", &manual_generate_body("hello", "anthropic"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["provider"], "openai");
    assert_eq!(body["attempts"][0]["provider"], "anthropic");
    assert_eq!(body["attempts"][0]["outcome"], "unavailable");
    assert_eq!(mocks.anthropic.generation_calls().await, 0);
}

#[tokio::test]
async fn test_disabled_provider_is_unavailable() {
    let mocks = MockProviders::start().await;
    mocks.all_succeed().await;
    let mut config = gateway_config(&mocks);
    config.providers[2].enabled = false;
    let gateway = TestGateway::from_config(&config);

    let (status, body) = gateway
        .post("/v1/generate", &generate_body(TECHNICAL_MESSAGE))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["attempts"][0]["provider"], "gemini");
    assert_eq!(body["attempts"][0]["outcome"], "unavailable");
    assert_eq!(body["provider"], "openai");
    assert_eq!(mocks.gemini.generation_calls().await, 0);
}

#[tokio::test]
async fn test_all_providers_failing_is_bad_gateway() {
    let mocks = MockProviders::start().await;
    for provider in ProviderId::ALL {
        mocks.get(provider).mock_generation_error(500).await;
    }
    let mut config = gateway_config(&mocks);
    config.augmentation.enabled = false;
    let gateway = TestGateway::from_config(&config);

    let (status, body) = gateway
        .post("/v1/generate", &generate_body(GENERAL_MESSAGE))
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["type"], "all_providers_failed");
    let attempts = body["error"]["attempts"].as_array().unwrap();
    assert_eq!(attempts.len(), 4);
    assert!(attempts.iter().all(|a| a["outcome"] == "error"));
    assert!(gateway.state.service.health().healthy_providers().is_empty());

    for provider in ProviderId::ALL {
        assert_eq!(mocks.get(provider).generation_calls().await, 1);
    }
}

#[tokio::test]
async fn test_invalid_generation_parameters_are_rejected_before_any_call() {
    let mocks = MockProviders::start().await;
    mocks.all_succeed().await;
    let gateway = TestGateway::from_config(&gateway_config(&mocks));

    let cases = [
        json!({"message": TECHNICAL_MESSAGE, "max_tokens": 0}),
        json!({"message": RESEARCH_MESSAGE, "temperature": 5.0}),
        json!({"message": CREATIVE_MESSAGE, "context_hint": "e-bikes", "max_tokens": 0}),
    ];
    for case in cases {
        let (status, body) = gateway.post("/v1/generate", &case).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{case}");
        assert_eq!(body["error"]["type"], "invalid_request_error", "{case}");
        assert!(body["error"].get("attempts").is_none(), "{case}");
    }

    for provider in ProviderId::ALL {
        assert_eq!(mocks.get(provider).generation_calls().await, 0, "{provider}");
    }
}
