//! Routing decisions over the HTTP API

use crate::fixtures::*;
use crate::helpers::TestGateway;
use axum::http::StatusCode;
use gateway_config::{ConfigFormat, GatewayConfig};
use gateway_core::{ProviderId, QueryCategory};
use gateway_routing::{ReasoningPolicy, RouteTarget};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_route_by_category() {
    let gateway = TestGateway::from_config(&GatewayConfig::default());

    let cases = [
        (TECHNICAL_MESSAGE, "gemini", "gemini-1.5-pro", "technical", false),
        (CREATIVE_MESSAGE, "openai", "gpt-4o", "creative", false),
        (RESEARCH_MESSAGE, "anthropic", "claude-3-5-sonnet-20241022", "research", true),
        (GENERAL_MESSAGE, "anthropic", "claude-3-5-sonnet-20241022", "strategic", false),
    ];

    for (message, provider, model, category, reasoning) in cases {
        let (status, body) = gateway.post("/v1/route", &route_body(message)).await;
        assert_eq!(status, StatusCode::OK, "{message}");
        assert_eq!(body["provider"], provider, "{message}");
        assert_eq!(body["model"], model, "{message}");
        assert_eq!(body["category"], category, "{message}");
        assert_eq!(body["use_reasoning"], reasoning, "{message}");
        assert_eq!(body["source"], "automatic");
        assert!(!body["rationale"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_context_hint_drives_classification() {
    let gateway = TestGateway::from_config(&GatewayConfig::default());
    let (_, body) = gateway
        .post(
            "/v1/route",
            &json!({"message": "Help with this", "context_hint": "python coding"}),
        )
        .await;
    assert_eq!(body["provider"], "gemini");
    assert_eq!(body["category"], "technical");
}

#[tokio::test]
async fn test_manual_provider_and_model() {
    let gateway = TestGateway::from_config(&GatewayConfig::default());
    let (status, body) = gateway
        .post(
            "/v1/route",
            &json!({
                "message": TECHNICAL_MESSAGE,
                "config": {"enabled": false, "manualProvider": "openai", "manualModel": "gpt-4o-mini"}
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["provider"], "openai");
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["source"], "manual");
    assert!(body.get("category").is_none());
}

#[tokio::test]
async fn test_unknown_manual_provider_is_coerced() {
    let gateway = TestGateway::from_config(&GatewayConfig::default());
    let (status, body) = gateway
        .post(
            "/v1/route",
            &json!({
                "message": "hello",
                "config": {"enabled": true, "manualProvider": "mistral"}
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["provider"], "anthropic");
    assert_eq!(body["source"], "manual_coerced");
    assert!(body["rationale"].as_str().unwrap().contains("mistral"));
}

#[tokio::test]
async fn test_blank_manual_provider_routes_automatically() {
    let gateway = TestGateway::from_config(&GatewayConfig::default());
    let (status, body) = gateway
        .post(
            "/v1/route",
            &json!({
                "message": CREATIVE_MESSAGE,
                "config": {"enabled": true, "manualProvider": ""}
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["provider"], "openai");
    assert_eq!(body["source"], "automatic");
    assert_eq!(body["category"], "creative");
}

#[tokio::test]
async fn test_force_reasoning_overrides_inference() {
    let gateway = TestGateway::from_config(&GatewayConfig::default());
    let (_, body) = gateway
        .post(
            "/v1/route",
            &json!({
                "message": "Give me a comprehensive overview",
                "config": {"enabled": false, "manualProvider": "gemini", "forceReasoning": false}
            }),
        )
        .await;
    assert_eq!(body["provider"], "gemini");
    assert_eq!(body["use_reasoning"], false);
}

#[tokio::test]
async fn test_configured_route_table_and_keywords() {
    let mut config = GatewayConfig::default();
    config.routing.default_provider = ProviderId::OpenAI;
    config.routing.route_table.insert(
        QueryCategory::Technical,
        RouteTarget::new(ProviderId::OpenAI, ReasoningPolicy::Always, "Code goes to OpenAI"),
    );
    config
        .routing
        .keywords
        .insert(QueryCategory::Creative, vec!["jingle".to_string()]);
    config
        .routing
        .models
        .insert(ProviderId::OpenAI, "gpt-4o-mini".to_string());

    let gateway = TestGateway::from_config(&config);

    let (_, body) = gateway.post("/v1/route", &route_body(TECHNICAL_MESSAGE)).await;
    assert_eq!(body["provider"], "openai");
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["use_reasoning"], true);
    assert_eq!(body["rationale"], "Code goes to OpenAI");

    let (_, body) = gateway
        .post("/v1/route", &route_body("Compose a jingle for the launch"))
        .await;
    assert_eq!(body["category"], "creative");

    // Replaced keyword list no longer contains "story"
    let (_, body) = gateway
        .post("/v1/route", &route_body("Tell me a story"))
        .await;
    assert_eq!(body["category"], "strategic");
}

#[tokio::test]
async fn test_routing_from_yaml_config() {
    let yaml = r#"
routing:
  default_provider: gemini
  route_table:
    research:
      provider: openai
      reasoning: never
      rationale: Research on OpenAI
"#;
    let config = ConfigFormat::Yaml.parse(yaml).unwrap();
    let gateway = TestGateway::from_config(&config);

    let (_, body) = gateway.post("/v1/route", &route_body(RESEARCH_MESSAGE)).await;
    assert_eq!(body["provider"], "openai");
    assert_eq!(body["use_reasoning"], false);

    let (_, body) = gateway
        .post(
            "/v1/route",
            &json!({"message": "hi", "config": {"enabled": false}}),
        )
        .await;
    assert_eq!(body["provider"], "gemini");
    assert_eq!(body["source"], "manual");
}

#[tokio::test]
async fn test_workflow_context_in_rationale() {
    let gateway = TestGateway::from_config(&GatewayConfig::default());
    let (status, body) = gateway
        .post(
            "/v1/route",
            &json!({
                "message": GENERAL_MESSAGE,
                "workflow": {"complexity": "complex", "priority": "high"}
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["use_reasoning"], true);
    let rationale = body["rationale"].as_str().unwrap();
    assert!(rationale.contains("complexity: complex"));
    assert!(rationale.contains("priority: high"));
}

#[tokio::test]
async fn test_route_rejects_malformed_json() {
    let gateway = TestGateway::from_config(&GatewayConfig::default());
    let (status, body) = gateway.post("/v1/route", &json!({"text": "no message"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request_error");
}
