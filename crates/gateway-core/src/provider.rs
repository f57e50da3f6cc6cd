//! Provider identities and the traits the routing core consumes.
//!
//! The core never talks HTTP itself: it only needs a per-provider
//! [`ProviderAdapter`] and a [`ProviderDirectory`] that can hand out adapters
//! and answer whether a credential exists.

use crate::error::GatewayResult;
use crate::request::GenerationRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Supported AI-completion backends.
///
/// The set is closed; it cannot be extended at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// OpenAI
    OpenAI,
    /// Anthropic
    #[serde(alias = "claude")]
    Anthropic,
    /// Google Gemini
    #[serde(alias = "google")]
    Gemini,
    /// Perplexity
    Perplexity,
}

impl ProviderId {
    /// Every known provider in canonical order
    pub const ALL: [Self; 4] = [Self::OpenAI, Self::Anthropic, Self::Gemini, Self::Perplexity];

    /// Lowercase identifier used in config, logs, and the API
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
            Self::Perplexity => "perplexity",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known provider
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider: {0}")]
pub struct ParseProviderError(pub String);

impl FromStr for ProviderId {
    type Err = ParseProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "gemini" | "google" => Ok(Self::Gemini),
            "perplexity" => Ok(Self::Perplexity),
            _ => Err(ParseProviderError(s.to_string())),
        }
    }
}

/// A single provider backend
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider this adapter talks to
    fn provider_id(&self) -> ProviderId;

    /// Whether a credential is currently available
    ///
    /// Checked on every probe so that a credential appearing after start-up
    /// is picked up without a restart.
    fn has_credential(&self) -> bool;

    /// Generate a completion and return its text
    async fn generate(&self, request: &GenerationRequest) -> GatewayResult<String>;

    /// Cheap authenticated reachability check that does not incur completion cost
    async fn check_connectivity(&self) -> GatewayResult<()>;
}

/// Lookup of adapters and credentials by provider
pub trait ProviderDirectory: Send + Sync {
    /// Adapter for the provider, if registered
    fn adapter(&self, provider: ProviderId) -> Option<Arc<dyn ProviderAdapter>>;

    /// Whether a credential exists for the provider
    fn has_credential(&self, provider: ProviderId) -> bool {
        self.adapter(provider).is_some_and(|a| a.has_credential())
    }
}
