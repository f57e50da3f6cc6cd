//! Test fixtures and sample data for integration tests

use crate::mock_providers::MockProviders;
use gateway_config::{GatewayConfig, ProviderConfig};
use gateway_core::ProviderId;
use secrecy::SecretString;
use serde_json::{json, Value};
use std::time::Duration;

/// Classified as technical, routed to Gemini
pub const TECHNICAL_MESSAGE: &str = "Fix the bug in our deployment script";

/// Classified as creative, routed to OpenAI
pub const CREATIVE_MESSAGE: &str = "Write a catchy headline for our spring launch";

/// Classified as research, routed to Anthropic with reasoning
pub const RESEARCH_MESSAGE: &str = "Research the market for electric bikes in Europe";

/// Matches no keyword, falls through to the strategic route
pub const GENERAL_MESSAGE: &str = "Plan our next quarter";

/// Gateway configuration pointing every provider at its mock server
///
/// Health thresholds are tightened so a single probe or call failure marks a
/// provider unhealthy.
pub fn gateway_config(mocks: &MockProviders) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.providers = ProviderId::ALL
        .into_iter()
        .map(|provider| provider_config(provider, &mocks.get(provider).url()))
        .collect();
    config.health.max_error_count = 1;
    config.health.probe_timeout = Duration::from_secs(2);
    config.augmentation.timeout = Duration::from_secs(2);
    config
}

/// Provider entry with an inline key and a mock base URL
pub fn provider_config(provider: ProviderId, base_url: &str) -> ProviderConfig {
    let mut settings = ProviderConfig::new(provider).with_base_url(base_url);
    settings.api_key = Some(SecretString::new(format!("test-key-{provider}")));
    settings
}

/// Provider entry whose key lives in an env variable nobody sets
pub fn keyless_provider_config(provider: ProviderId, base_url: &str) -> ProviderConfig {
    ProviderConfig::new(provider)
        .with_base_url(base_url)
        .with_api_key_env(format!("ROUTER_IT_UNSET_{}_KEY", provider.as_str().to_uppercase()))
}

/// `/v1/route` body
pub fn route_body(message: &str) -> Value {
    json!({ "message": message })
}

/// `/v1/generate` body
pub fn generate_body(message: &str) -> Value {
    json!({ "message": message })
}

/// `/v1/generate` body pinned to a provider
pub fn manual_generate_body(message: &str, provider: &str) -> Value {
    json!({
        "message": message,
        "config": {"enabled": false, "manualProvider": provider}
    })
}
