//! Generation request handed to provider adapters.

use crate::error::GatewayError;
use serde::{Deserialize, Serialize};

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default maximum tokens to generate
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// A single-turn generation request in provider-neutral form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Target model (e.g., "gpt-4o", "claude-3-5-sonnet-20241022")
    pub model: String,

    /// User prompt
    pub prompt: String,

    /// System prompt
    #[serde(default)]
    pub system_prompt: String,

    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl GenerationRequest {
    /// Create a new builder for `GenerationRequest`
    #[must_use]
    pub fn builder() -> GenerationRequestBuilder {
        GenerationRequestBuilder::default()
    }

    /// Validate the request
    ///
    /// # Errors
    /// Returns error if any field is out of range
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.model.trim().is_empty() {
            return Err(GatewayError::validation("model cannot be empty"));
        }
        if self.prompt.trim().is_empty() {
            return Err(GatewayError::validation("prompt cannot be empty"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(GatewayError::validation(format!(
                "temperature must be between 0 and 2, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(GatewayError::validation("max_tokens must be greater than 0"));
        }
        Ok(())
    }
}

/// Builder for `GenerationRequest`
#[derive(Debug, Clone, Default)]
pub struct GenerationRequestBuilder {
    model: Option<String>,
    prompt: Option<String>,
    system_prompt: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl GenerationRequestBuilder {
    /// Set the model
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the prompt
    #[must_use]
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Set the system prompt
    #[must_use]
    pub fn system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    /// Set the temperature
    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set max tokens
    #[must_use]
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Build the request
    ///
    /// # Errors
    /// Returns error if required fields are missing or invalid
    pub fn build(self) -> Result<GenerationRequest, GatewayError> {
        let request = GenerationRequest {
            model: self
                .model
                .ok_or_else(|| GatewayError::validation("model is required"))?,
            prompt: self
                .prompt
                .ok_or_else(|| GatewayError::validation("prompt is required"))?,
            system_prompt: self.system_prompt.unwrap_or_default(),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        };

        request.validate()?;
        Ok(request)
    }
}
