//! Provider registry.
//!
//! Concurrent map from [`ProviderId`] to its adapter. Implements
//! [`ProviderDirectory`] so the health prober and the fallback executor can
//! look adapters up without knowing how they were built.

use crate::anthropic::{AnthropicConfig, AnthropicProvider, ANTHROPIC_API_KEY_ENV};
use crate::credentials::ApiKey;
use crate::gemini::{GeminiConfig, GeminiProvider, GEMINI_API_KEY_ENV};
use crate::openai::{OpenAIConfig, OpenAIProvider, OPENAI_API_KEY_ENV};
use crate::perplexity::{PerplexityConfig, PerplexityProvider, PERPLEXITY_API_KEY_ENV};
use dashmap::DashMap;
use gateway_core::{GatewayResult, ProviderAdapter, ProviderDirectory, ProviderId};
use std::sync::Arc;
use tracing::info;

/// Environment variable conventionally holding a provider's key
#[must_use]
pub fn default_key_env(provider: ProviderId) -> &'static str {
    match provider {
        ProviderId::OpenAI => OPENAI_API_KEY_ENV,
        ProviderId::Anthropic => ANTHROPIC_API_KEY_ENV,
        ProviderId::Gemini => GEMINI_API_KEY_ENV,
        ProviderId::Perplexity => PERPLEXITY_API_KEY_ENV,
    }
}

/// Build the HTTP adapter for a provider
///
/// # Errors
/// Returns error if the adapter's HTTP client cannot be created
pub fn build_adapter(
    provider: ProviderId,
    api_key: ApiKey,
    base_url: Option<&str>,
) -> GatewayResult<Arc<dyn ProviderAdapter>> {
    let adapter: Arc<dyn ProviderAdapter> = match provider {
        ProviderId::OpenAI => {
            let mut config = OpenAIConfig::new(api_key);
            if let Some(url) = base_url {
                config = config.with_base_url(url);
            }
            Arc::new(OpenAIProvider::new(config)?)
        }
        ProviderId::Anthropic => {
            let mut config = AnthropicConfig::new(api_key);
            if let Some(url) = base_url {
                config = config.with_base_url(url);
            }
            Arc::new(AnthropicProvider::new(config)?)
        }
        ProviderId::Gemini => {
            let mut config = GeminiConfig::new(api_key);
            if let Some(url) = base_url {
                config = config.with_base_url(url);
            }
            Arc::new(GeminiProvider::new(config)?)
        }
        ProviderId::Perplexity => {
            let mut config = PerplexityConfig::new(api_key);
            if let Some(url) = base_url {
                config = config.with_base_url(url);
            }
            Arc::new(PerplexityProvider::new(config)?)
        }
    };
    Ok(adapter)
}

/// Registry of provider adapters
#[derive(Default)]
pub struct ProviderRegistry {
    adapters: DashMap<ProviderId, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in adapter, keys read from the conventional
    /// environment variables
    ///
    /// # Errors
    /// Returns error if an adapter cannot be created
    pub fn from_env() -> GatewayResult<Self> {
        let registry = Self::new();
        for provider in ProviderId::ALL {
            let key = ApiKey::from_env(default_key_env(provider));
            registry.register(build_adapter(provider, key, None)?);
        }
        Ok(registry)
    }

    /// Register an adapter under its own provider id, replacing any previous one
    pub fn register(&self, adapter: Arc<dyn ProviderAdapter>) {
        let provider = adapter.provider_id();
        info!(
            provider = %provider,
            has_credential = adapter.has_credential(),
            "Registered provider adapter"
        );
        self.adapters.insert(provider, adapter);
    }

    /// Remove a provider's adapter
    pub fn unregister(&self, provider: ProviderId) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.remove(&provider).map(|(_, adapter)| adapter)
    }

    /// Registered providers in canonical order
    #[must_use]
    pub fn providers(&self) -> Vec<ProviderId> {
        ProviderId::ALL
            .into_iter()
            .filter(|p| self.adapters.contains_key(p))
            .collect()
    }

    /// Number of registered adapters
    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Whether no adapters are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl ProviderDirectory for ProviderRegistry {
    fn adapter(&self, provider: ProviderId) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(&provider).map(|entry| Arc::clone(entry.value()))
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.providers())
            .finish()
    }
}
