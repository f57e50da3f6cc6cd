//! Configuration types.
//!
//! Every section has a `Default` so a missing file, or a file that only sets
//! a handful of keys, still yields a complete [`GatewayConfig`].

use gateway_core::{
    ModelCatalog, ProviderId, QueryCategory, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
use gateway_resilience::{ExecutorConfig, HealthConfig, ProbeMode, ProberConfig};
use gateway_routing::{
    KeywordTable, QueryClassifier, RouteTable, RouteTarget, RoutingDecisionEngine,
};
use secrecy::SecretString;
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use validator::{Validate, ValidationError};

/// Main gateway configuration
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_unique_providers"))]
pub struct GatewayConfig {
    /// HTTP server settings
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,

    /// Routing decision settings
    #[serde(default)]
    #[validate(nested)]
    pub routing: RoutingConfig,

    /// Health tracking and background probing
    #[serde(default)]
    #[validate(nested)]
    pub health: HealthCheckConfig,

    /// Failover execution settings
    #[serde(default)]
    #[validate(nested)]
    pub execution: ExecutionConfig,

    /// Research augmentation settings
    #[serde(default)]
    #[validate(nested)]
    pub augmentation: AugmentationConfig,

    /// Provider credentials and endpoints
    #[serde(default)]
    #[validate(nested)]
    pub providers: Vec<ProviderConfig>,

    /// Logging and tracing
    #[serde(default)]
    #[validate(nested)]
    pub telemetry: TelemetryConfig,
}

impl GatewayConfig {
    /// Settings for one provider, if listed
    #[must_use]
    pub fn provider(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.id == id)
    }

    /// Whether a provider should be registered.
    ///
    /// Providers not listed are enabled and read their key from the
    /// conventional environment variable.
    #[must_use]
    pub fn is_provider_enabled(&self, id: ProviderId) -> bool {
        self.provider(id).map_or(true, |p| p.enabled)
    }
}

fn validate_unique_providers(config: &GatewayConfig) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for provider in &config.providers {
        if !seen.insert(provider.id) {
            return Err(ValidationError::new("duplicate_provider").with_message(Cow::Owned(
                format!("provider '{}' is configured more than once", provider.id),
            )));
        }
    }
    Ok(())
}

fn validate_non_zero(duration: &Duration) -> Result<(), ValidationError> {
    if duration.is_zero() {
        return Err(ValidationError::new("zero_duration")
            .with_message(Cow::Borrowed("duration must be greater than zero")));
    }
    Ok(())
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    #[validate(length(min = 1))]
    pub host: String,

    /// Listen port
    #[serde(default = "default_port")]
    #[validate(range(min = 1))]
    pub port: u16,

    /// Whole-request timeout applied by the HTTP layer
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    #[validate(custom(function = "validate_non_zero"))]
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(120)
}

/// Routing decision configuration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RoutingConfig {
    /// Provider used when a manual selection cannot be parsed
    #[serde(default = "default_provider")]
    pub default_provider: ProviderId,

    /// Default model per provider, overriding the built-in catalog
    #[serde(default)]
    pub models: HashMap<ProviderId, String>,

    /// Sampling temperature for requests that do not set one
    #[serde(default = "default_temperature")]
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,

    /// Token limit for requests that do not set one
    #[serde(default = "default_max_tokens")]
    #[validate(range(min = 1))]
    pub max_tokens: u32,

    /// Per-category route overrides
    #[serde(default)]
    pub route_table: HashMap<QueryCategory, RouteTarget>,

    /// Per-category keyword list replacements
    #[serde(default)]
    pub keywords: HashMap<QueryCategory, Vec<String>>,

    /// Replacement for the reasoning indicator list
    #[serde(default)]
    pub reasoning_keywords: Option<Vec<String>>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            models: HashMap::new(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            route_table: HashMap::new(),
            keywords: HashMap::new(),
            reasoning_keywords: None,
        }
    }
}

impl RoutingConfig {
    /// Model catalog with configured overrides applied
    #[must_use]
    pub fn catalog(&self) -> ModelCatalog {
        self.models
            .iter()
            .filter(|(_, model)| !model.trim().is_empty())
            .fold(ModelCatalog::new(), |catalog, (provider, model)| {
                catalog.with_model(*provider, model.trim())
            })
    }

    /// Classifier with keyword overrides applied
    #[must_use]
    pub fn classifier(&self) -> QueryClassifier {
        let mut categories: Vec<_> = self.keywords.keys().copied().collect();
        categories.sort_by_key(|c| c.as_str());

        let table = categories
            .into_iter()
            .fold(KeywordTable::builtin(), |table, category| {
                table.with_keywords(category, &self.keywords[&category])
            });

        let classifier = QueryClassifier::new(table);
        match &self.reasoning_keywords {
            Some(indicators) => classifier.with_reasoning_indicators(indicators),
            None => classifier,
        }
    }

    /// Route table with overrides applied
    #[must_use]
    pub fn routes(&self) -> RouteTable {
        self.route_table
            .iter()
            .fold(RouteTable::builtin(), |table, (category, target)| {
                table.with_route(*category, target.clone())
            })
    }

    /// Decision engine assembled from this section
    #[must_use]
    pub fn engine(&self) -> RoutingDecisionEngine {
        RoutingDecisionEngine::new()
            .with_classifier(self.classifier())
            .with_routes(self.routes())
            .with_catalog(self.catalog())
            .with_default_provider(self.default_provider)
    }
}

fn default_provider() -> ProviderId {
    ProviderId::Anthropic
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

/// Health tracking configuration
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_thresholds"))]
pub struct HealthCheckConfig {
    /// Run the background prober
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Time between probe rounds
    #[serde(default = "default_probe_interval", with = "humantime_serde")]
    #[validate(custom(function = "validate_non_zero"))]
    pub probe_interval: Duration,

    /// Bound on a single probe
    #[serde(default = "default_probe_timeout", with = "humantime_serde")]
    #[validate(custom(function = "validate_non_zero"))]
    pub probe_timeout: Duration,

    /// Consecutive errors after which a provider is unhealthy
    #[serde(default = "default_max_error_count")]
    #[validate(range(min = 1))]
    pub max_error_count: u32,

    /// Upper bound on the stored error count
    #[serde(default = "default_error_ceiling")]
    pub error_ceiling: u32,

    /// What a probe does
    #[serde(default)]
    pub probe_mode: ProbeMode,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            probe_interval: default_probe_interval(),
            probe_timeout: default_probe_timeout(),
            max_error_count: default_max_error_count(),
            error_ceiling: default_error_ceiling(),
            probe_mode: ProbeMode::default(),
        }
    }
}

impl HealthCheckConfig {
    /// Registry thresholds
    #[must_use]
    pub fn thresholds(&self) -> HealthConfig {
        HealthConfig {
            max_error_count: self.max_error_count,
            error_ceiling: self.error_ceiling,
        }
    }

    /// Prober settings
    #[must_use]
    pub fn prober(&self) -> ProberConfig {
        ProberConfig {
            probe_interval: self.probe_interval,
            probe_timeout: self.probe_timeout,
            mode: self.probe_mode,
        }
    }
}

fn validate_thresholds(config: &HealthCheckConfig) -> Result<(), ValidationError> {
    if config.error_ceiling < config.max_error_count {
        return Err(ValidationError::new("error_ceiling").with_message(Cow::Owned(format!(
            "error_ceiling ({}) must be at least max_error_count ({})",
            config.error_ceiling, config.max_error_count
        ))));
    }
    Ok(())
}

fn default_true() -> bool {
    true
}

fn default_probe_interval() -> Duration {
    Duration::from_secs(60)
}

fn default_probe_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_max_error_count() -> u32 {
    3
}

fn default_error_ceiling() -> u32 {
    10
}

/// Failover execution configuration
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ExecutionConfig {
    /// Per-provider attempt timeouts
    #[serde(default)]
    #[validate(nested)]
    pub timeouts: ProviderTimeouts,
}

impl ExecutionConfig {
    /// Executor settings
    #[must_use]
    pub fn executor(&self) -> ExecutorConfig {
        ProviderId::ALL
            .into_iter()
            .fold(ExecutorConfig::default(), |config, provider| {
                config.with_timeout(provider, self.timeouts.get(provider))
            })
    }
}

/// Attempt timeout for each provider
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProviderTimeouts {
    /// OpenAI
    #[serde(default = "default_openai_timeout", with = "humantime_serde")]
    #[validate(custom(function = "validate_non_zero"))]
    pub openai: Duration,

    /// Anthropic
    #[serde(default = "default_anthropic_timeout", with = "humantime_serde")]
    #[validate(custom(function = "validate_non_zero"))]
    pub anthropic: Duration,

    /// Gemini
    #[serde(default = "default_gemini_timeout", with = "humantime_serde")]
    #[validate(custom(function = "validate_non_zero"))]
    pub gemini: Duration,

    /// Perplexity
    #[serde(default = "default_perplexity_timeout", with = "humantime_serde")]
    #[validate(custom(function = "validate_non_zero"))]
    pub perplexity: Duration,
}

impl Default for ProviderTimeouts {
    fn default() -> Self {
        Self {
            openai: default_openai_timeout(),
            anthropic: default_anthropic_timeout(),
            gemini: default_gemini_timeout(),
            perplexity: default_perplexity_timeout(),
        }
    }
}

impl ProviderTimeouts {
    /// Timeout for one provider
    #[must_use]
    pub fn get(&self, provider: ProviderId) -> Duration {
        match provider {
            ProviderId::OpenAI => self.openai,
            ProviderId::Anthropic => self.anthropic,
            ProviderId::Gemini => self.gemini,
            ProviderId::Perplexity => self.perplexity,
        }
    }
}

fn default_openai_timeout() -> Duration {
    Duration::from_secs(20)
}

fn default_anthropic_timeout() -> Duration {
    Duration::from_secs(20)
}

fn default_gemini_timeout() -> Duration {
    Duration::from_secs(15)
}

fn default_perplexity_timeout() -> Duration {
    Duration::from_secs(10)
}

/// Research augmentation configuration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AugmentationConfig {
    /// Run the research pass for reasoning decisions
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Provider that answers research queries
    #[serde(default = "default_research_provider")]
    pub provider: ProviderId,

    /// Model for research queries; the provider's catalog default when unset
    #[serde(default)]
    pub model: Option<String>,

    /// Bound on the research call
    #[serde(default = "default_research_timeout", with = "humantime_serde")]
    #[validate(custom(function = "validate_non_zero"))]
    pub timeout: Duration,
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: default_research_provider(),
            model: None,
            timeout: default_research_timeout(),
        }
    }
}

fn default_research_provider() -> ProviderId {
    ProviderId::Perplexity
}

fn default_research_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Provider credential and endpoint configuration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProviderConfig {
    /// Provider identifier
    pub id: ProviderId,

    /// Register this provider
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Inline API key
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Environment variable holding the API key
    #[serde(default)]
    #[validate(length(min = 1))]
    pub api_key_env: Option<String>,

    /// Override for the provider's API base URL
    #[serde(default)]
    #[validate(url)]
    pub base_url: Option<String>,
}

impl ProviderConfig {
    /// Settings for a provider with nothing overridden
    #[must_use]
    pub fn new(id: ProviderId) -> Self {
        Self {
            id,
            enabled: true,
            api_key: None,
            api_key_env: None,
            base_url: None,
        }
    }

    /// Set the API key environment variable
    #[must_use]
    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = Some(var.into());
        self
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
}

/// Logging and tracing configuration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TelemetryConfig {
    /// Log filter directive, e.g. `info` or `gateway_routing=debug,info`
    #[serde(default = "default_log_level")]
    #[validate(length(min = 1))]
    pub log_level: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub json_logs: bool,

    /// Service name reported with traces
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Attach OpenTelemetry trace context to spans
    #[serde(default)]
    pub tracing_enabled: bool,

    /// Trace sampling rate
    #[serde(default = "default_sampling_rate")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub sampling_rate: f64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            service_name: default_service_name(),
            tracing_enabled: false,
            sampling_rate: default_sampling_rate(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "provider-routing-gateway".to_string()
}

fn default_sampling_rate() -> f64 {
    1.0
}
