//! Google Gemini provider implementation.
//!
//! Uses the Google AI Studio API:
//! `POST {base}/v1beta/models/{model}:generateContent?key=...`.
//! The connectivity check lists models with the same key.

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
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default key environment variable
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini provider configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key source
    pub api_key: ApiKey,
    /// API base URL, without the `/v1beta` suffix
    pub base_url: String,
    /// HTTP client timeout
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: ApiKey::from_env(GEMINI_API_KEY_ENV),
            base_url: GEMINI_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl GeminiConfig {
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

/// Gemini provider
#[derive(Debug)]
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: GeminiConfig) -> GatewayResult<Self> {
        let client = build_client(ProviderId::Gemini, config.timeout)?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1beta{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn keyed(&self, builder: RequestBuilder) -> GatewayResult<RequestBuilder> {
        let key = self
            .config
            .api_key
            .resolve()
            .ok_or_else(|| GatewayError::missing_credential(ProviderId::Gemini))?;
        Ok(builder.query(&[("key", key.expose_secret().as_str())]))
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    fn provider_id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn has_credential(&self) -> bool {
        self.config.api_key.is_available()
    }

    async fn generate(&self, request: &GenerationRequest) -> GatewayResult<String> {
        let url = self.url(&format!("/models/{}:generateContent", request.model));
        debug!(
            provider = "gemini",
            model = %request.model,
            url = %url,
            "Sending generateContent request"
        );

        let body = GenerateContentRequest::from_generation(request);
        let builder = self.keyed(self.client.post(&url))?.json(&body);
        let response: GenerateContentResponse = send_json(ProviderId::Gemini, builder).await?;

        if let Some(reason) = response.block_reason() {
            return Err(GatewayError::provider(
                ProviderId::Gemini,
                format!("Prompt blocked: {reason}"),
                None,
                false,
            ));
        }

        non_empty(ProviderId::Gemini, response.text())
    }

    async fn check_connectivity(&self) -> GatewayResult<()> {
        let builder = self.keyed(self.client.get(self.url("/models")))?;
        send(ProviderId::Gemini, builder).await.map(|_| ())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_generation(request: &'a GenerationRequest) -> Self {
        let system_instruction = Some(request.system_prompt.as_str())
            .filter(|s| !s.trim().is_empty())
            .map(|text| Content {
                role: None,
                parts: vec![Part { text }],
            });

        Self {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            system_instruction,
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn block_reason(&self) -> Option<&str> {
        if !self.candidates.is_empty() {
            return None;
        }
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }

    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}
