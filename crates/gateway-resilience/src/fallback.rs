//! Ordered failover across providers.
//!
//! The executor walks the registry's fallback chain one candidate at a time.
//! Each attempt is bounded by a per-provider timeout (optionally tightened by
//! the caller) and its outcome is reported back to the health registry.

use crate::health::ProviderHealthRegistry;
use gateway_core::{
    GatewayError, GenerationRequest, ModelCatalog, ProviderDirectory, ProviderId, RoutingDecision,
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Executor settings
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Per-provider attempt timeouts
    pub timeouts: HashMap<ProviderId, Duration>,
    /// Timeout for providers missing from `timeouts`
    pub default_timeout: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        let timeouts = HashMap::from([
            (ProviderId::OpenAI, Duration::from_secs(20)),
            (ProviderId::Anthropic, Duration::from_secs(20)),
            (ProviderId::Gemini, Duration::from_secs(15)),
            (ProviderId::Perplexity, Duration::from_secs(10)),
        ]);
        Self {
            timeouts,
            default_timeout: Duration::from_secs(20),
        }
    }
}

impl ExecutorConfig {
    /// Set the timeout for one provider
    #[must_use]
    pub fn with_timeout(mut self, provider: ProviderId, timeout: Duration) -> Self {
        self.timeouts.insert(provider, timeout);
        self
    }

    /// Timeout for a provider
    #[must_use]
    pub fn timeout_for(&self, provider: ProviderId) -> Duration {
        self.timeouts
            .get(&provider)
            .copied()
            .unwrap_or(self.default_timeout)
    }
}

/// Caller input for one execution
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionRequest {
    /// User message
    pub message: String,
    /// Optional context hint, appended to the prompt
    pub context_hint: String,
    /// System prompt, possibly augmented
    pub system_prompt: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens
    pub max_tokens: u32,
    /// Caller cap on each attempt
    pub attempt_timeout: Option<Duration>,
}

impl ExecutionRequest {
    /// Create a request with default sampling parameters
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context_hint: String::new(),
            system_prompt: String::new(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            attempt_timeout: None,
        }
    }

    /// Set the context hint
    #[must_use]
    pub fn with_context_hint(mut self, hint: impl Into<String>) -> Self {
        self.context_hint = hint.into();
        self
    }

    /// Set the system prompt
    #[must_use]
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Set the temperature
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

    /// Cap every attempt at `timeout`
    #[must_use]
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Prompt sent to providers
    #[must_use]
    pub fn prompt(&self) -> String {
        let hint = self.context_hint.trim();
        if hint.is_empty() {
            self.message.clone()
        } else {
            format!("{}\n\nContext: {hint}", self.message)
        }
    }

    /// Check the sampling parameters and prompt without calling anything
    ///
    /// # Errors
    /// `GatewayError::Validation` when the request would be rejected for `model`
    pub fn validate(&self, model: &str) -> Result<(), GatewayError> {
        self.to_generation(model).map(|_| ())
    }

    fn to_generation(&self, model: &str) -> Result<GenerationRequest, GatewayError> {
        GenerationRequest::builder()
            .model(model)
            .prompt(self.prompt())
            .system_prompt(&self.system_prompt)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
    }
}

/// Result of one attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// Provider returned content
    Success,
    /// Provider returned an error
    Error,
    /// Attempt exceeded its timeout
    Timeout,
    /// No adapter or no credential
    Unavailable,
}

impl AttemptOutcome {
    /// Label used in logs and metrics
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Timeout => "timeout",
            Self::Unavailable => "unavailable",
        }
    }
}

/// One provider attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Provider tried
    pub provider: ProviderId,
    /// Model requested
    pub model: String,
    /// How the attempt ended
    pub outcome: AttemptOutcome,
    /// Time spent on the attempt
    pub latency_ms: u64,
    /// Error message, for failed attempts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Successful execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Generated text
    pub content: String,
    /// Provider that produced the content
    pub actual_provider: ProviderId,
    /// Model that produced the content
    pub actual_model: String,
    /// Every attempt, in order; the last one succeeded
    pub attempts: Vec<AttemptRecord>,
}

impl ExecutionOutcome {
    /// Whether a provider other than the primary answered
    #[must_use]
    pub fn used_fallback(&self) -> bool {
        self.attempts.len() > 1
    }
}

/// Failed execution with the attempts that led to it
#[derive(Debug, Clone, thiserror::Error)]
#[error("{error}")]
pub struct ExecutionFailure {
    /// Error surfaced to the caller
    pub error: GatewayError,
    /// Every attempt, in order
    pub attempts: Vec<AttemptRecord>,
}

impl From<ExecutionFailure> for GatewayError {
    fn from(failure: ExecutionFailure) -> Self {
        failure.error
    }
}

/// Sequential, timeout-bounded failover executor
pub struct FallbackExecutor {
    registry: Arc<ProviderHealthRegistry>,
    directory: Arc<dyn ProviderDirectory>,
    catalog: ModelCatalog,
    config: ExecutorConfig,
}

impl FallbackExecutor {
    /// Create an executor
    #[must_use]
    pub fn new(
        registry: Arc<ProviderHealthRegistry>,
        directory: Arc<dyn ProviderDirectory>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            registry,
            directory,
            catalog: ModelCatalog::default(),
            config,
        }
    }

    /// Set the catalog used for fallback candidates
    #[must_use]
    pub fn with_catalog(mut self, catalog: ModelCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Health registry in use
    #[must_use]
    pub fn registry(&self) -> &Arc<ProviderHealthRegistry> {
        &self.registry
    }

    /// Candidates for a decision: the primary with the decision's model, then
    /// the rest of the chain with their default models
    #[must_use]
    pub fn candidates(&self, decision: &RoutingDecision) -> Vec<(ProviderId, String)> {
        self.registry
            .fallback_chain(decision.provider)
            .into_iter()
            .map(|p| {
                let model = if p == decision.provider {
                    decision.model.clone()
                } else {
                    self.catalog.default_model(p).to_string()
                };
                (p, model)
            })
            .collect()
    }

    /// Execute the request, failing over until a provider answers
    ///
    /// # Errors
    /// `GatewayError::Validation` if the request is malformed, otherwise
    /// `GatewayError::AllProvidersFailed` once every candidate has failed.
    pub async fn execute(
        &self,
        decision: &RoutingDecision,
        request: &ExecutionRequest,
    ) -> Result<ExecutionOutcome, ExecutionFailure> {
        request
            .validate(&decision.model)
            .map_err(|error| ExecutionFailure {
                error,
                attempts: Vec::new(),
            })?;

        let candidates = self.candidates(decision);
        let mut attempts = Vec::with_capacity(candidates.len());
        let mut last_error = String::from("no providers available");

        for (provider, model) in candidates {
            let start = Instant::now();
            let result = self.attempt(provider, &model, request).await;
            let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            match result {
                Ok(content) => {
                    self.registry.record_success(provider, latency_ms);
                    if provider != decision.provider {
                        info!(
                            primary = %decision.provider,
                            provider = %provider,
                            attempts = attempts.len() + 1,
                            "Request served by fallback provider"
                        );
                    }
                    attempts.push(AttemptRecord {
                        provider,
                        model: model.clone(),
                        outcome: AttemptOutcome::Success,
                        latency_ms,
                        error: None,
                    });
                    return Ok(ExecutionOutcome {
                        content,
                        actual_provider: provider,
                        actual_model: model,
                        attempts,
                    });
                }
                Err((outcome, error)) => {
                    let message = error.to_string();
                    warn!(
                        provider = %provider,
                        model = %model,
                        outcome = outcome.as_str(),
                        latency_ms,
                        error = %message,
                        "Provider attempt failed"
                    );
                    self.registry.record_error(provider, message.clone());
                    attempts.push(AttemptRecord {
                        provider,
                        model,
                        outcome,
                        latency_ms,
                        error: Some(message.clone()),
                    });
                    last_error = message;
                }
            }
        }

        warn!(attempts = attempts.len(), last_error = %last_error, "All providers failed");

        Err(ExecutionFailure {
            error: GatewayError::AllProvidersFailed {
                attempts: attempts.len(),
                last_error,
            },
            attempts,
        })
    }

    async fn attempt(
        &self,
        provider: ProviderId,
        model: &str,
        request: &ExecutionRequest,
    ) -> Result<String, (AttemptOutcome, GatewayError)> {
        let Some(adapter) = self.directory.adapter(provider) else {
            return Err((
                AttemptOutcome::Unavailable,
                GatewayError::ProviderNotRegistered { provider },
            ));
        };

        if !adapter.has_credential() {
            return Err((
                AttemptOutcome::Unavailable,
                GatewayError::missing_credential(provider),
            ));
        }

        let generation = request
            .to_generation(model)
            .map_err(|e| (AttemptOutcome::Error, e))?;

        let timeout = request.attempt_timeout.map_or_else(
            || self.config.timeout_for(provider),
            |cap| cap.min(self.config.timeout_for(provider)),
        );

        debug!(
            provider = %provider,
            model = %model,
            timeout_ms = timeout.as_millis() as u64,
            "Attempting provider"
        );

        match tokio::time::timeout(timeout, adapter.generate(&generation)).await {
            Ok(Ok(content)) => Ok(content),
            Ok(Err(e)) => Err((AttemptOutcome::Error, e)),
            Err(_) => Err((
                AttemptOutcome::Timeout,
                GatewayError::timeout(provider, timeout),
            )),
        }
    }
}

impl std::fmt::Debug for FallbackExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackExecutor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
