//! Mock AI providers for integration testing
//!
//! Each provider gets its own wiremock server that speaks that provider's
//! wire format, so the real HTTP adapters can be exercised end to end.

use gateway_core::ProviderId;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock server for one provider
pub struct MockProvider {
    /// Provider this server impersonates
    pub provider: ProviderId,
    /// Underlying wiremock server
    pub server: MockServer,
}

impl MockProvider {
    /// Start a mock server for a provider
    pub async fn start(provider: ProviderId) -> Self {
        Self {
            provider,
            server: MockServer::start().await,
        }
    }

    /// Base URL to configure the adapter with
    pub fn url(&self) -> String {
        self.server.uri()
    }

    fn generation_mock(&self) -> wiremock::MockBuilder {
        match self.provider {
            ProviderId::OpenAI => Mock::given(method("POST")).and(path("/v1/chat/completions")),
            ProviderId::Anthropic => Mock::given(method("POST")).and(path("/v1/messages")),
            ProviderId::Gemini => Mock::given(method("POST"))
                .and(path_regex(r"^/v1beta/models/[^/]+:generateContent$")),
            ProviderId::Perplexity => Mock::given(method("POST")).and(path("/chat/completions")),
        }
    }

    /// Answer every generation call with the given text
    pub async fn mock_generation(&self, content: &str) {
        self.generation_mock()
            .respond_with(
                ResponseTemplate::new(200).set_body_json(success_body(self.provider, content)),
            )
            .mount(&self.server)
            .await;
    }

    /// Answer generation calls whose body contains `needle`
    pub async fn mock_generation_containing(&self, needle: &str, content: &str) {
        self.generation_mock()
            .and(body_string_contains(needle))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(success_body(self.provider, content)),
            )
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Answer generation calls after a delay
    pub async fn mock_generation_delayed(&self, content: &str, delay: Duration) {
        self.generation_mock()
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(success_body(self.provider, content))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Fail every generation call with the given status
    pub async fn mock_generation_error(&self, status: u16) {
        self.generation_mock()
            .respond_with(ResponseTemplate::new(status).set_body_json(error_body(
                self.provider,
                &format!("simulated {status} from {}", self.provider),
            )))
            .mount(&self.server)
            .await;
    }

    /// Make the connectivity probe succeed
    pub async fn mock_connectivity_ok(&self) {
        match self.provider {
            // Probed with a tiny completion
            ProviderId::Perplexity => self.mock_generation("pong").await,
            _ => {
                Mock::given(method("GET"))
                    .and(path(self.models_path()))
                    .respond_with(ResponseTemplate::new(200).set_body_json(models_body()))
                    .mount(&self.server)
                    .await;
            }
        }
    }

    /// Make the connectivity probe fail with the given status
    pub async fn mock_connectivity_error(&self, status: u16) {
        match self.provider {
            ProviderId::Perplexity => self.mock_generation_error(status).await,
            _ => {
                Mock::given(method("GET"))
                    .and(path(self.models_path()))
                    .respond_with(
                        ResponseTemplate::new(status)
                            .set_body_json(error_body(self.provider, "probe rejected")),
                    )
                    .mount(&self.server)
                    .await;
            }
        }
    }

    fn models_path(&self) -> &'static str {
        match self.provider {
            ProviderId::Gemini => "/v1beta/models",
            _ => "/v1/models",
        }
    }

    /// Number of generation calls received
    pub async fn generation_calls(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == "POST")
            .count()
    }

    /// Bodies of every generation call received
    pub async fn generation_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == "POST")
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }
}

/// One mock server per provider
pub struct MockProviders {
    /// OpenAI mock
    pub openai: MockProvider,
    /// Anthropic mock
    pub anthropic: MockProvider,
    /// Gemini mock
    pub gemini: MockProvider,
    /// Perplexity mock
    pub perplexity: MockProvider,
}

impl MockProviders {
    /// Start all four mock servers
    pub async fn start() -> Self {
        Self {
            openai: MockProvider::start(ProviderId::OpenAI).await,
            anthropic: MockProvider::start(ProviderId::Anthropic).await,
            gemini: MockProvider::start(ProviderId::Gemini).await,
            perplexity: MockProvider::start(ProviderId::Perplexity).await,
        }
    }

    /// Mock for a provider
    pub fn get(&self, provider: ProviderId) -> &MockProvider {
        match provider {
            ProviderId::OpenAI => &self.openai,
            ProviderId::Anthropic => &self.anthropic,
            ProviderId::Gemini => &self.gemini,
            ProviderId::Perplexity => &self.perplexity,
        }
    }

    /// Every provider answers generation calls with `"<provider> says hi"`
    pub async fn all_succeed(&self) {
        for provider in ProviderId::ALL {
            self.get(provider)
                .mock_generation(&format!("{provider} says hi"))
                .await;
        }
    }

    /// Every provider passes its connectivity probe
    pub async fn all_reachable(&self) {
        for provider in ProviderId::ALL {
            self.get(provider).mock_connectivity_ok().await;
        }
    }
}

/// Successful response body in a provider's wire format
pub fn success_body(provider: ProviderId, content: &str) -> Value {
    match provider {
        ProviderId::OpenAI | ProviderId::Perplexity => json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }),
        ProviderId::Anthropic => json!({
            "id": "msg_test",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": content}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }),
        ProviderId::Gemini => json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": content}]},
                "finishReason": "STOP"
            }]
        }),
    }
}

/// Error response body in a provider's wire format
pub fn error_body(provider: ProviderId, message: &str) -> Value {
    match provider {
        ProviderId::Anthropic => json!({
            "type": "error",
            "error": {"type": "api_error", "message": message}
        }),
        ProviderId::Gemini => json!({
            "error": {"code": 500, "message": message, "status": "INTERNAL"}
        }),
        ProviderId::OpenAI | ProviderId::Perplexity => json!({
            "error": {"message": message, "type": "server_error"}
        }),
    }
}

/// Model list returned by connectivity probes
pub fn models_body() -> Value {
    json!({
        "object": "list",
        "data": [{"id": "model-1", "object": "model"}],
        "models": [{"name": "models/model-1"}]
    })
}
