//! Reasoning augmentation.
//!
//! When a decision calls for reasoning (or the caller supplied a context
//! hint), a research pass runs before generation and its output is folded
//! into the system prompt between fixed markers. The pass is best effort:
//! any failure leaves the system prompt untouched.

use async_trait::async_trait;
use gateway_core::{
    GatewayError, GatewayResult, GenerationRequest, ModelCatalog, ProviderAdapter, ProviderId,
    RoutingDecision,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Opening marker of the research block
pub const RESEARCH_DATA_START: &str = "=== RESEARCH DATA ===";

/// Closing marker of the research block
pub const RESEARCH_DATA_END: &str = "=== END RESEARCH DATA ===";

const RESEARCH_SYSTEM_PROMPT: &str = "You are a research assistant. Gather current, factual \
information relevant to the request. Return concise findings with key facts, figures and \
sources. Do not write the final deliverable.";

/// Produces research text for a request
#[async_trait]
pub trait ResearchSource: Send + Sync {
    /// Research the message and hint
    async fn research(&self, message: &str, context_hint: &str) -> GatewayResult<String>;
}

/// Research pass backed by a provider adapter
pub struct ProviderResearchSource {
    adapter: Arc<dyn ProviderAdapter>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ProviderResearchSource {
    /// Create a research source using the adapter's default model
    #[must_use]
    pub fn new(adapter: Arc<dyn ProviderAdapter>) -> Self {
        let model = ModelCatalog::builtin_default(adapter.provider_id()).to_string();
        Self {
            adapter,
            model,
            temperature: 0.2,
            max_tokens: 2000,
        }
    }

    /// Set the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set max tokens
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Provider performing the research
    #[must_use]
    pub fn provider(&self) -> ProviderId {
        self.adapter.provider_id()
    }
}

impl std::fmt::Debug for ProviderResearchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderResearchSource")
            .field("provider", &self.adapter.provider_id())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ResearchSource for ProviderResearchSource {
    async fn research(&self, message: &str, context_hint: &str) -> GatewayResult<String> {
        if !self.adapter.has_credential() {
            return Err(GatewayError::missing_credential(self.adapter.provider_id()));
        }

        let mut prompt = format!("Research the following request:\n{message}");
        if !context_hint.trim().is_empty() {
            prompt.push_str(&format!("\n\nFocus: {context_hint}"));
        }

        let request = GenerationRequest::builder()
            .model(&self.model)
            .prompt(prompt)
            .system_prompt(RESEARCH_SYSTEM_PROMPT)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()?;

        self.adapter.generate(&request).await
    }
}

/// Folds research output into the system prompt
pub struct ReasoningAugmenter {
    source: Arc<dyn ResearchSource>,
    timeout: Duration,
}

impl ReasoningAugmenter {
    /// Default research timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create an augmenter over a research source
    #[must_use]
    pub fn new(source: Arc<dyn ResearchSource>) -> Self {
        Self {
            source,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Set the research timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Research timeout
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether the research pass should run for this decision
    #[must_use]
    pub fn should_augment(&self, decision: &RoutingDecision, context_hint: &str) -> bool {
        decision.use_reasoning || !context_hint.trim().is_empty()
    }

    /// Run the research pass and return the (possibly) augmented system prompt
    pub async fn augment(&self, message: &str, context_hint: &str, system_prompt: &str) -> String {
        let research = match tokio::time::timeout(
            self.timeout,
            self.source.research(message, context_hint),
        )
        .await
        {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!(error = %e, "Research pass failed, continuing without it");
                return system_prompt.to_string();
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Research pass timed out, continuing without it"
                );
                return system_prompt.to_string();
            }
        };

        let research = research.trim();
        if research.is_empty() {
            warn!("Research pass returned nothing, continuing without it");
            return system_prompt.to_string();
        }

        debug!(research_len = research.len(), "Research data added to system prompt");

        let block = format!("{RESEARCH_DATA_START}\n{research}\n{RESEARCH_DATA_END}");
        if system_prompt.trim().is_empty() {
            block
        } else {
            format!("{system_prompt}\n\n{block}")
        }
    }
}

impl std::fmt::Debug for ReasoningAugmenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReasoningAugmenter")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
