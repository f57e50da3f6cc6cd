//! API key resolution.
//!
//! Keys are resolved on every use so that a key exported after start-up is
//! picked up by the next probe without a restart.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Where an adapter finds its API key
#[derive(Clone, Default)]
pub struct ApiKey {
    explicit: Option<SecretString>,
    env_var: Option<String>,
}

impl ApiKey {
    /// No key
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Fixed key value
    #[must_use]
    pub fn explicit(key: impl Into<String>) -> Self {
        Self {
            explicit: Some(SecretString::new(key.into())),
            env_var: None,
        }
    }

    /// Fixed key already held as a secret
    #[must_use]
    pub fn from_secret(key: SecretString) -> Self {
        Self {
            explicit: Some(key),
            env_var: None,
        }
    }

    /// Key read from an environment variable at call time
    #[must_use]
    pub fn from_env(var: impl Into<String>) -> Self {
        Self {
            explicit: None,
            env_var: Some(var.into()),
        }
    }

    /// Explicit key, falling back to the environment variable
    #[must_use]
    pub fn with_env_fallback(mut self, var: impl Into<String>) -> Self {
        self.env_var = Some(var.into());
        self
    }

    /// Environment variable consulted, if any
    #[must_use]
    pub fn env_var(&self) -> Option<&str> {
        self.env_var.as_deref()
    }

    /// Current key, if one is available and non-blank
    #[must_use]
    pub fn resolve(&self) -> Option<SecretString> {
        if let Some(key) = &self.explicit {
            if !key.expose_secret().trim().is_empty() {
                return Some(key.clone());
            }
        }

        self.env_var
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|value| !value.trim().is_empty())
            .map(SecretString::new)
    }

    /// Whether a key is currently available
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.resolve().is_some()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("explicit", &self.explicit.as_ref().map(|_| "[REDACTED]"))
            .field("env_var", &self.env_var)
            .finish()
    }
}
