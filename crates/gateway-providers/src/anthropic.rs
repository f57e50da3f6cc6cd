//! Anthropic provider implementation.
//!
//! Uses the Messages API (`POST /v1/messages`). Authentication is the
//! `x-api-key` header plus a pinned `anthropic-version`.

use crate::credentials::ApiKey;
use crate::http::{build_client, non_empty, send, send_json};
use async_trait::async_trait;
use gateway_core::{GatewayError, GatewayResult, GenerationRequest, ProviderAdapter, ProviderId};
use reqwest::{Client, RequestBuilder};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default API base URL
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Default key environment variable
pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// API version header value
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic provider configuration
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key source
    pub api_key: ApiKey,
    /// API base URL
    pub base_url: String,
    /// `anthropic-version` header
    pub api_version: String,
    /// HTTP client timeout
    pub timeout: Duration,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: ApiKey::from_env(ANTHROPIC_API_KEY_ENV),
            base_url: ANTHROPIC_BASE_URL.to_string(),
            api_version: ANTHROPIC_VERSION.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl AnthropicConfig {
    /// Create a configuration with the given key source
    #[must_use]
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            ..Default::default()
        }
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the HTTP timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Anthropic provider
#[derive(Debug)]
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: AnthropicConfig) -> GatewayResult<Self> {
        let client = build_client(ProviderId::Anthropic, config.timeout)?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn authorized(&self, builder: RequestBuilder) -> GatewayResult<RequestBuilder> {
        let key = self
            .config
            .api_key
            .resolve()
            .ok_or_else(|| GatewayError::missing_credential(ProviderId::Anthropic))?;

        Ok(builder
            .header("x-api-key", key.expose_secret())
            .header("anthropic-version", &self.config.api_version))
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicProvider {
    fn provider_id(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn has_credential(&self) -> bool {
        self.config.api_key.is_available()
    }

    async fn generate(&self, request: &GenerationRequest) -> GatewayResult<String> {
        let url = self.url("/v1/messages");
        debug!(
            provider = "anthropic",
            model = %request.model,
            url = %url,
            "Sending messages request"
        );

        let body = MessagesRequest::from_generation(request);
        let builder = self.authorized(self.client.post(&url))?.json(&body);
        let response: MessagesResponse = send_json(ProviderId::Anthropic, builder).await?;

        non_empty(ProviderId::Anthropic, response.text())
    }

    async fn check_connectivity(&self) -> GatewayResult<()> {
        let builder = self.authorized(self.client.get(self.url("/v1/models")))?;
        send(ProviderId::Anthropic, builder).await.map(|_| ())
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> MessagesRequest<'a> {
    fn from_generation(request: &'a GenerationRequest) -> Self {
        let system = Some(request.system_prompt.as_str()).filter(|s| !s.trim().is_empty());
        Self {
            model: &request.model,
            max_tokens: request.max_tokens,
            // Anthropic caps temperature at 1.0
            temperature: request.temperature.min(1.0),
            system,
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    fn text(self) -> String {
        self.content
            .into_iter()
            .filter(|b| b.block_type == "text")
            .filter_map(|b| b.text)
            .collect::<Vec<_>>()
            .join("")
    }
}
