//! Error types for the gateway.
//!
//! Only [`GatewayError::AllProvidersFailed`] is ever surfaced to callers of the
//! execution path; every other variant describes a single failed step that is
//! recovered locally (next fallback candidate, un-augmented prompt, health
//! bookkeeping).

use crate::provider::ProviderId;
use std::time::Duration;
use thiserror::Error;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that can occur in the gateway
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// A single provider call failed
    #[error("{provider} error: {message}")]
    Provider {
        /// Provider that failed
        provider: ProviderId,
        /// Error message
        message: String,
        /// HTTP status code, if the failure came from an HTTP response
        status_code: Option<u16>,
        /// Whether retrying the same provider could succeed
        retryable: bool,
    },

    /// A provider call exceeded its time bound
    #[error("{provider} timed out after {}ms", timeout.as_millis())]
    Timeout {
        /// Provider that timed out
        provider: ProviderId,
        /// The bound that was exceeded
        timeout: Duration,
    },

    /// No credential is configured for the provider
    #[error("no credential configured for {provider}")]
    MissingCredential {
        /// Provider without a credential
        provider: ProviderId,
    },

    /// No adapter is registered for the provider
    #[error("no adapter registered for {provider}")]
    ProviderNotRegistered {
        /// Provider without an adapter
        provider: ProviderId,
    },

    /// Every candidate in the fallback chain failed
    #[error("All AI providers failed. Last error: {last_error}")]
    AllProvidersFailed {
        /// Number of candidates attempted
        attempts: usize,
        /// Message of the final candidate's failure
        last_error: String,
    },

    /// The research/analysis pass failed
    #[error("Augmentation error: {message}")]
    Augmentation {
        /// Error message
        message: String,
    },

    /// Caller input failed validation
    #[error("Validation error: {message}")]
    Validation {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message
        message: String,
    },
}

impl GatewayError {
    /// Create a provider error
    pub fn provider(
        provider: ProviderId,
        message: impl Into<String>,
        status_code: Option<u16>,
        retryable: bool,
    ) -> Self {
        Self::Provider {
            provider,
            message: message.into(),
            status_code,
            retryable,
        }
    }

    /// Create a timeout error
    pub fn timeout(provider: ProviderId, timeout: Duration) -> Self {
        Self::Timeout { provider, timeout }
    }

    /// Create a missing credential error
    pub fn missing_credential(provider: ProviderId) -> Self {
        Self::MissingCredential { provider }
    }

    /// Create an augmentation error
    pub fn augmentation(message: impl Into<String>) -> Self {
        Self::Augmentation {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Provider the error is attributed to, if any
    #[must_use]
    pub fn provider_id(&self) -> Option<ProviderId> {
        match self {
            Self::Provider { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::MissingCredential { provider }
            | Self::ProviderNotRegistered { provider } => Some(*provider),
            _ => None,
        }
    }

    /// Whether retrying the same provider could plausibly succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Provider { retryable, .. } => *retryable,
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Stable, machine-readable error type
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Provider { .. } => "provider_error",
            Self::Timeout { .. } => "timeout",
            Self::MissingCredential { .. } => "missing_credential",
            Self::ProviderNotRegistered { .. } => "provider_not_registered",
            Self::AllProvidersFailed { .. } => "all_providers_failed",
            Self::Augmentation { .. } => "augmentation_error",
            Self::Validation { .. } => "invalid_request_error",
            Self::Configuration { .. } => "configuration_error",
            Self::Internal { .. } => "internal_error",
        }
    }
}
