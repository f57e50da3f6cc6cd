//! # Gateway Config
//!
//! Configuration for the provider routing gateway.
//!
//! Configuration is read from a YAML, TOML or JSON file (format chosen by
//! extension), overlaid with `GATEWAY_*` environment variables, and
//! validated before use.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod loader;

// Re-export main types
pub use config::{
    AugmentationConfig, ExecutionConfig, GatewayConfig, HealthCheckConfig, ProviderConfig,
    ProviderTimeouts, RoutingConfig, ServerConfig, TelemetryConfig,
};
pub use error::ConfigError;
pub use loader::{load_config, ConfigFormat, ConfigLoader, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
