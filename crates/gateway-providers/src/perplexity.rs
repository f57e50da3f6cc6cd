//! Perplexity provider implementation.
//!
//! Perplexity speaks the OpenAI chat-completions dialect at
//! `POST {base}/chat/completions` but has no model-list endpoint, so the
//! connectivity check is a one-token completion against a small model.

use crate::credentials::ApiKey;
use crate::http::{build_client, non_empty, send_json};
use crate::openai::{ChatCompletionRequest, ChatCompletionResponse};
use async_trait::async_trait;
use gateway_core::{GatewayError, GatewayResult, GenerationRequest, ProviderAdapter, ProviderId};
use reqwest::{Client, RequestBuilder};
use secrecy::ExposeSecret;
use std::time::Duration;
use tracing::debug;

/// Default API base URL
pub const PERPLEXITY_BASE_URL: &str = "https://api.perplexity.ai";

/// Default key environment variable
pub const PERPLEXITY_API_KEY_ENV: &str = "PERPLEXITY_API_KEY";

/// Perplexity provider configuration
#[derive(Debug, Clone)]
pub struct PerplexityConfig {
    /// API key source
    pub api_key: ApiKey,
    /// API base URL
    pub base_url: String,
    /// Model used by the connectivity check
    pub probe_model: String,
    /// HTTP client timeout
    pub timeout: Duration,
}

impl Default for PerplexityConfig {
    fn default() -> Self {
        Self {
            api_key: ApiKey::from_env(PERPLEXITY_API_KEY_ENV),
            base_url: PERPLEXITY_BASE_URL.to_string(),
            probe_model: "sonar".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl PerplexityConfig {
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

    /// Set the probe model
    #[must_use]
    pub fn with_probe_model(mut self, model: impl Into<String>) -> Self {
        self.probe_model = model.into();
        self
    }

    /// Set the HTTP timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Perplexity provider
#[derive(Debug)]
pub struct PerplexityProvider {
    config: PerplexityConfig,
    client: Client,
}

impl PerplexityProvider {
    /// Create a new Perplexity provider
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: PerplexityConfig) -> GatewayResult<Self> {
        let client = build_client(ProviderId::Perplexity, config.timeout)?;
        Ok(Self { config, client })
    }

    fn url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn authorized(&self, builder: RequestBuilder) -> GatewayResult<RequestBuilder> {
        let key = self
            .config
            .api_key
            .resolve()
            .ok_or_else(|| GatewayError::missing_credential(ProviderId::Perplexity))?;
        Ok(builder.bearer_auth(key.expose_secret()))
    }

    async fn complete(&self, request: &GenerationRequest) -> GatewayResult<String> {
        let body = ChatCompletionRequest::from_generation(request);
        let builder = self.authorized(self.client.post(self.url()))?.json(&body);
        let response: ChatCompletionResponse = send_json(ProviderId::Perplexity, builder).await?;
        Ok(response.into_content())
    }
}

#[async_trait]
impl ProviderAdapter for PerplexityProvider {
    fn provider_id(&self) -> ProviderId {
        ProviderId::Perplexity
    }

    fn has_credential(&self) -> bool {
        self.config.api_key.is_available()
    }

    async fn generate(&self, request: &GenerationRequest) -> GatewayResult<String> {
        debug!(
            provider = "perplexity",
            model = %request.model,
            "Sending chat completion request"
        );
        let content = self.complete(request).await?;
        non_empty(ProviderId::Perplexity, content)
    }

    async fn check_connectivity(&self) -> GatewayResult<()> {
        let probe = GenerationRequest::builder()
            .model(&self.config.probe_model)
            .prompt("ping")
            .temperature(0.0)
            .max_tokens(1)
            .build()?;
        self.complete(&probe).await.map(|_| ())
    }
}
