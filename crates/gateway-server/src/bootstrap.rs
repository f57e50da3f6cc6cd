//! Assembles the gateway from configuration.

use crate::service::RoutingService;
use crate::state::AppState;
use gateway_config::{GatewayConfig, ProviderConfig};
use gateway_core::{GatewayError, ProviderDirectory, ProviderId};
use gateway_providers::{build_adapter, default_key_env, ApiKey, ProviderRegistry};
use gateway_resilience::{FallbackExecutor, HealthMonitor, ProviderHealthRegistry};
use gateway_routing::{ProviderResearchSource, ReasoningAugmenter};
use gateway_telemetry::{RouterMetrics, TelemetryError};
use std::sync::Arc;
use tracing::{info, warn};

/// Errors raised while assembling the gateway
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// A provider adapter could not be built
    #[error(transparent)]
    Provider(#[from] GatewayError),

    /// Metrics could not be registered
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Key source for a provider: inline key first, then its env variable
#[must_use]
pub fn api_key_for(provider: ProviderId, settings: Option<&ProviderConfig>) -> ApiKey {
    let env_var = settings
        .and_then(|s| s.api_key_env.clone())
        .unwrap_or_else(|| default_key_env(provider).to_string());

    match settings.and_then(|s| s.api_key.clone()) {
        Some(key) => ApiKey::from_secret(key).with_env_fallback(env_var),
        None => ApiKey::from_env(env_var),
    }
}

/// Register an adapter for every enabled provider
///
/// # Errors
/// Returns error if an adapter's HTTP client cannot be created
pub fn build_registry(config: &GatewayConfig) -> Result<ProviderRegistry, BootstrapError> {
    let registry = ProviderRegistry::new();

    for provider in ProviderId::ALL {
        if !config.is_provider_enabled(provider) {
            info!(provider = %provider, "Provider disabled by configuration");
            continue;
        }

        let settings = config.provider(provider);
        let key = api_key_for(provider, settings);
        if !key.is_available() {
            warn!(
                provider = %provider,
                env_var = key.env_var().unwrap_or_default(),
                "No API key available yet; provider will report unhealthy until one is set"
            );
        }

        let base_url = settings.and_then(|s| s.base_url.as_deref());
        registry.register(build_adapter(provider, key, base_url)?);
    }

    Ok(registry)
}

/// Build the application state over a provider directory
///
/// # Errors
/// Returns error if metrics cannot be registered
pub fn build_state(
    config: &GatewayConfig,
    directory: Arc<dyn ProviderDirectory>,
) -> Result<AppState, BootstrapError> {
    let catalog = config.routing.catalog();
    let health = Arc::new(ProviderHealthRegistry::new(config.health.thresholds()));

    let executor = FallbackExecutor::new(
        Arc::clone(&health),
        Arc::clone(&directory),
        config.execution.executor(),
    )
    .with_catalog(catalog.clone());

    let monitor = Arc::new(
        HealthMonitor::new(health, Arc::clone(&directory), config.health.prober())
            .with_catalog(catalog.clone()),
    );

    let metrics = Arc::new(RouterMetrics::new()?);

    let mut service = RoutingService::new(
        config.routing.engine(),
        executor,
        Arc::clone(&directory),
        metrics,
    )
    .with_defaults(config.routing.temperature, config.routing.max_tokens);

    let augmentation = &config.augmentation;
    if augmentation.enabled {
        match directory.adapter(augmentation.provider) {
            Some(adapter) => {
                let model = augmentation
                    .model
                    .clone()
                    .unwrap_or_else(|| catalog.default_model(augmentation.provider).to_string());
                let source = ProviderResearchSource::new(adapter).with_model(model);
                service = service.with_augmenter(
                    ReasoningAugmenter::new(Arc::new(source)).with_timeout(augmentation.timeout),
                );
                info!(provider = %augmentation.provider, "Research augmentation enabled");
            }
            None => warn!(
                provider = %augmentation.provider,
                "Research provider is not registered; augmentation disabled"
            ),
        }
    }

    Ok(AppState::new(Arc::new(service), monitor)
        .with_request_timeout(config.server.request_timeout))
}
