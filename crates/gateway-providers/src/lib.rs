//! # Gateway Providers
//!
//! HTTP adapters for the AI providers the gateway routes between:
//! - OpenAI (Chat Completions)
//! - Anthropic (Messages)
//! - Google Gemini (AI Studio generateContent)
//! - Perplexity (OpenAI-compatible chat completions)
//!
//! plus a concurrent [`ProviderRegistry`] that implements
//! [`gateway_core::ProviderDirectory`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod anthropic;
pub mod credentials;
pub mod gemini;
mod http;
pub mod openai;
pub mod perplexity;
pub mod registry;

// Re-export main types
pub use anthropic::{AnthropicConfig, AnthropicProvider};
pub use credentials::ApiKey;
pub use gemini::{GeminiConfig, GeminiProvider};
pub use openai::{OpenAIConfig, OpenAIProvider};
pub use perplexity::{PerplexityConfig, PerplexityProvider};
pub use registry::{build_adapter, default_key_env, ProviderRegistry};
