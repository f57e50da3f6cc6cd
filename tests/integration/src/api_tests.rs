//! Operational endpoints and serving over a real socket

use crate::fixtures::*;
use crate::helpers::{free_port, TestGateway, TestServer};
use crate::mock_providers::MockProviders;
use gateway_config::GatewayConfig;
use gateway_server::Server;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

#[tokio::test]
async fn test_health_and_liveness_over_http() {
    let gateway = TestGateway::from_config(&GatewayConfig::default());
    let server = TestServer::start(gateway.state.clone()).await;

    let response = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());

    let response = server.client.get(server.url("/live")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "alive");
}

#[tokio::test]
async fn test_generate_over_http() {
    let mocks = MockProviders::start().await;
    mocks.all_succeed().await;
    let gateway = TestGateway::from_config(&gateway_config(&mocks));
    let server = TestServer::start(gateway.state.clone()).await;

    let response = server
        .client
        .post(server.url("/v1/generate"))
        .header("x-request-id", "req-123")
        .json(&generate_body(CREATIVE_MESSAGE))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["content"], "openai says hi");
    assert_eq!(body["decision"]["category"], "creative");
}

#[tokio::test]
async fn test_error_envelope_over_http() {
    let gateway = TestGateway::from_config(&GatewayConfig::default());
    let server = TestServer::start(gateway.state.clone()).await;

    let response = server
        .client
        .post(server.url("/v1/generate"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["type"], "invalid_request_error");
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let gateway = TestGateway::from_config(&GatewayConfig::default());
    let (status, _) = gateway.get("/v1/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_validation() {
    let gateway = TestGateway::from_config(&GatewayConfig::default());

    let cases = [
        json!({"message": ""}),
        json!({"message": "hello", "timeout_ms": 0}),
        json!({"message": "hello", "temperature": -1.0}),
    ];
    for case in cases {
        let (status, body) = gateway.post("/v1/generate", &case).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{case}");
        assert_eq!(body["error"]["type"], "invalid_request_error", "{case}");
    }
}

#[tokio::test]
async fn test_metrics_count_decisions_and_attempts() {
    let mocks = MockProviders::start().await;
    mocks.gemini.mock_generation_error(500).await;
    mocks.openai.mock_generation("openai says hi").await;
    let gateway = TestGateway::from_config(&gateway_config(&mocks));

    gateway.post("/v1/route", &route_body(CREATIVE_MESSAGE)).await;
    gateway
        .post("/v1/generate", &generate_body(TECHNICAL_MESSAGE))
        .await;

    let (status, body) = gateway.get("/metrics").await;
    assert_eq!(status, StatusCode::OK);
    let text = body.as_str().unwrap();
    assert!(text.contains("router_decisions_total"));
    assert!(text.contains("router_provider_attempts_total"));
    assert!(text.contains(r#"outcome="error""#));
    assert!(text.contains(r#"outcome="success""#));
}

#[tokio::test]
async fn test_server_shuts_down_gracefully() {
    let gateway = TestGateway::from_config(&GatewayConfig::default());
    let port = free_port();
    let server = Server::new("127.0.0.1", port, gateway.state.clone());
    assert_eq!(server.addr(), format!("127.0.0.1:{port}"));

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(server.run_until(async {
        let _ = rx.await;
    }));

    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{port}/live");
    let mut live = false;
    for _ in 0..50 {
        if let Ok(response) = client.get(&url).send().await {
            live = response.status() == StatusCode::OK;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(live);

    tx.send(()).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}
