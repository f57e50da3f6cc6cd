//! Routing pipeline facade.
//!
//! [`RoutingService::route`] only decides; [`RoutingService::generate`] runs
//! the full pipeline: decide, optionally augment the system prompt with a
//! research pass, then execute with failover.

use gateway_core::{
    ProviderDirectory, RouterConfig, RoutingDecision, WorkflowContext, DEFAULT_MAX_TOKENS,
    DEFAULT_TEMPERATURE,
};
use gateway_resilience::{
    AttemptRecord, ExecutionFailure, ExecutionRequest, FallbackExecutor, ProviderHealthRegistry,
};
use gateway_routing::{ReasoningAugmenter, RoutingDecisionEngine};
use gateway_telemetry::RouterMetrics;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Body of a routing-only request
#[derive(Debug, Clone, Deserialize)]
pub struct RouteRequest {
    /// User message
    pub message: String,
    /// Extra context used for classification and research
    #[serde(default)]
    pub context_hint: String,
    /// Caller routing preferences; automatic when absent
    #[serde(default = "RouterConfig::automatic")]
    pub config: RouterConfig,
    /// Advisory workflow hints
    #[serde(default)]
    pub workflow: Option<WorkflowContext>,
}

impl RouteRequest {
    /// Automatic routing request for a message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context_hint: String::new(),
            config: RouterConfig::automatic(),
            workflow: None,
        }
    }
}

/// Body of a full generation request
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    /// Routing inputs
    #[serde(flatten)]
    pub route: RouteRequest,
    /// System prompt handed to the provider
    #[serde(default)]
    pub system_prompt: String,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Token limit
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Per-attempt deadline in milliseconds
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl GenerateRequest {
    /// Automatic generation request for a message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            route: RouteRequest::new(message),
            system_prompt: String::new(),
            temperature: None,
            max_tokens: None,
            timeout_ms: None,
        }
    }
}

/// Result of a successful generation
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    /// Generated text
    pub content: String,
    /// Provider that answered
    pub provider: gateway_core::ProviderId,
    /// Model that answered
    pub model: String,
    /// Decision the attempt chain started from
    pub decision: RoutingDecision,
    /// Whether research data was added to the system prompt
    pub augmented: bool,
    /// Every attempt in order
    pub attempts: Vec<AttemptRecord>,
}

/// Request pipeline shared by all handlers
pub struct RoutingService {
    engine: RoutingDecisionEngine,
    executor: FallbackExecutor,
    augmenter: Option<ReasoningAugmenter>,
    directory: Arc<dyn ProviderDirectory>,
    metrics: Arc<RouterMetrics>,
    default_temperature: f32,
    default_max_tokens: u32,
}

impl RoutingService {
    /// Create a service without augmentation
    #[must_use]
    pub fn new(
        engine: RoutingDecisionEngine,
        executor: FallbackExecutor,
        directory: Arc<dyn ProviderDirectory>,
        metrics: Arc<RouterMetrics>,
    ) -> Self {
        Self {
            engine,
            executor,
            augmenter: None,
            directory,
            metrics,
            default_temperature: DEFAULT_TEMPERATURE,
            default_max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Enable the research pass
    #[must_use]
    pub fn with_augmenter(mut self, augmenter: ReasoningAugmenter) -> Self {
        self.augmenter = Some(augmenter);
        self
    }

    /// Set defaults for requests that omit temperature or token limit
    #[must_use]
    pub fn with_defaults(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.default_temperature = temperature;
        self.default_max_tokens = max_tokens;
        self
    }

    /// Health registry behind the executor
    #[must_use]
    pub fn health(&self) -> &Arc<ProviderHealthRegistry> {
        self.executor.registry()
    }

    /// Provider directory
    #[must_use]
    pub fn directory(&self) -> &Arc<dyn ProviderDirectory> {
        &self.directory
    }

    /// Metrics sink
    #[must_use]
    pub fn metrics(&self) -> &Arc<RouterMetrics> {
        &self.metrics
    }

    /// Whether the research pass is configured
    #[must_use]
    pub fn has_augmenter(&self) -> bool {
        self.augmenter.is_some()
    }

    /// Decide where a request should go
    pub fn route(&self, request: &RouteRequest) -> RoutingDecision {
        let decision = self.engine.decide(
            &request.message,
            &request.context_hint,
            &request.config,
            request.workflow.as_ref(),
        );
        self.metrics.record_decision(&decision);
        decision
    }

    /// Decide, optionally augment, then execute with failover
    ///
    /// # Errors
    /// Returns the executor's failure, with every attempt, when the request
    /// is invalid or every provider failed
    pub async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, ExecutionFailure> {
        let route = &request.route;
        let decision = self.route(route);

        let mut execution = ExecutionRequest::new(route.message.clone())
            .with_context_hint(route.context_hint.clone())
            .with_system_prompt(request.system_prompt.clone())
            .with_temperature(request.temperature.unwrap_or(self.default_temperature))
            .with_max_tokens(request.max_tokens.unwrap_or(self.default_max_tokens));
        if let Some(ms) = request.timeout_ms {
            execution = execution.with_attempt_timeout(Duration::from_millis(ms));
        }

        // Parameters are checked before the research pass
        execution
            .validate(&decision.model)
            .map_err(|error| ExecutionFailure {
                error,
                attempts: Vec::new(),
            })?;

        let augmented = match &self.augmenter {
            Some(augmenter) if augmenter.should_augment(&decision, &route.context_hint) => {
                let prompt = augmenter
                    .augment(&route.message, &route.context_hint, &request.system_prompt)
                    .await;
                let augmented = prompt != request.system_prompt;
                execution.system_prompt = prompt;
                augmented
            }
            _ => false,
        };

        match self.executor.execute(&decision, &execution).await {
            Ok(outcome) => {
                self.record_attempts(&outcome.attempts);
                info!(
                    requested = %decision.provider,
                    provider = %outcome.actual_provider,
                    model = %outcome.actual_model,
                    attempts = outcome.attempts.len(),
                    augmented,
                    "Generation completed"
                );
                Ok(GenerateResponse {
                    content: outcome.content,
                    provider: outcome.actual_provider,
                    model: outcome.actual_model,
                    decision,
                    augmented,
                    attempts: outcome.attempts,
                })
            }
            Err(failure) => {
                self.record_attempts(&failure.attempts);
                if !failure.attempts.is_empty() {
                    self.metrics.record_exhausted();
                }
                warn!(
                    provider = %decision.provider,
                    attempts = failure.attempts.len(),
                    error = %failure.error,
                    "Generation failed"
                );
                Err(failure)
            }
        }
    }

    /// Publish the current health of every provider to the gauges
    pub fn publish_health(&self) {
        for (provider, record) in self.health().snapshot().iter() {
            self.metrics
                .set_provider_health(provider, record.is_healthy, record.error_count);
        }
    }

    fn record_attempts(&self, attempts: &[AttemptRecord]) {
        for attempt in attempts {
            self.metrics.record_attempt(
                attempt.provider,
                attempt.outcome.as_str(),
                Duration::from_millis(attempt.latency_ms),
            );
        }
    }
}

impl std::fmt::Debug for RoutingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingService")
            .field("augmenter", &self.augmenter)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .finish_non_exhaustive()
    }
}
