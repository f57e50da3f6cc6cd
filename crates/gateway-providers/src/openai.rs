//! OpenAI provider implementation.
//!
//! Talks to the Chat Completions API (`POST /v1/chat/completions`). The
//! connectivity check lists models (`GET /v1/models`), which is authenticated
//! but free.

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
pub const OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Default key environment variable
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// OpenAI provider configuration
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key source
    pub api_key: ApiKey,
    /// API base URL, without the `/v1` suffix
    pub base_url: String,
    /// Organization header value
    pub organization: Option<String>,
    /// HTTP client timeout
    pub timeout: Duration,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: ApiKey::from_env(OPENAI_API_KEY_ENV),
            base_url: OPENAI_BASE_URL.to_string(),
            organization: None,
            timeout: Duration::from_secs(60),
        }
    }
}

impl OpenAIConfig {
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

    /// Set the organization
    #[must_use]
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Set the HTTP timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// OpenAI provider
#[derive(Debug)]
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: OpenAIConfig) -> GatewayResult<Self> {
        let client = build_client(ProviderId::OpenAI, config.timeout)?;
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
            .ok_or_else(|| GatewayError::missing_credential(ProviderId::OpenAI))?;

        let mut builder = builder.bearer_auth(key.expose_secret());
        if let Some(org) = &self.config.organization {
            builder = builder.header("OpenAI-Organization", org);
        }
        Ok(builder)
    }
}

#[async_trait]
impl ProviderAdapter for OpenAIProvider {
    fn provider_id(&self) -> ProviderId {
        ProviderId::OpenAI
    }

    fn has_credential(&self) -> bool {
        self.config.api_key.is_available()
    }

    async fn generate(&self, request: &GenerationRequest) -> GatewayResult<String> {
        let url = self.url("/v1/chat/completions");
        debug!(
            provider = "openai",
            model = %request.model,
            url = %url,
            "Sending chat completion request"
        );

        let body = ChatCompletionRequest::from_generation(request);
        let builder = self.authorized(self.client.post(&url))?.json(&body);
        let response: ChatCompletionResponse = send_json(ProviderId::OpenAI, builder).await?;

        non_empty(ProviderId::OpenAI, response.into_content())
    }

    async fn check_connectivity(&self) -> GatewayResult<()> {
        let builder = self.authorized(self.client.get(self.url("/v1/models")))?;
        send(ProviderId::OpenAI, builder).await.map(|_| ())
    }
}

// Chat Completions wire types, shared with OpenAI-compatible providers

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> ChatCompletionRequest<'a> {
    pub(crate) fn from_generation(request: &'a GenerationRequest) -> Self {
        let mut messages = Vec::with_capacity(2);
        if !request.system_prompt.trim().is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: &request.system_prompt,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        Self {
            model: &request.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionResponse {
    pub(crate) fn into_content(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default()
    }
}
