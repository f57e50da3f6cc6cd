//! Default model per provider.

use crate::provider::ProviderId;
use std::collections::HashMap;

/// Maps each provider to the model used when nothing more specific is asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    models: HashMap<ProviderId, String>,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        let models = ProviderId::ALL
            .into_iter()
            .map(|p| (p, Self::builtin_default(p).to_string()))
            .collect();
        Self { models }
    }
}

impl ModelCatalog {
    /// Create a catalog with built-in defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in default model for a provider
    #[must_use]
    pub fn builtin_default(provider: ProviderId) -> &'static str {
        match provider {
            ProviderId::OpenAI => "gpt-4o",
            ProviderId::Anthropic => "claude-3-5-sonnet-20241022",
            ProviderId::Gemini => "gemini-1.5-pro",
            ProviderId::Perplexity => "sonar-pro",
        }
    }

    /// Override the default model for a provider
    #[must_use]
    pub fn with_model(mut self, provider: ProviderId, model: impl Into<String>) -> Self {
        self.models.insert(provider, model.into());
        self
    }

    /// Default model for a provider
    #[must_use]
    pub fn default_model(&self, provider: ProviderId) -> &str {
        self.models
            .get(&provider)
            .map_or_else(|| Self::builtin_default(provider), String::as_str)
    }
}
