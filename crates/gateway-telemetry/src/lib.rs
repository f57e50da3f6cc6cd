//! # Gateway Telemetry
//!
//! Observability for the provider routing gateway.
//!
//! This crate provides:
//! - Structured logging (pretty or JSON) behind an `EnvFilter`
//! - Optional OpenTelemetry span export through `tracing-opentelemetry`
//! - Prometheus metrics for routing decisions, attempts and provider health

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod logging;
pub mod metrics;
pub mod tracing_setup;

// Re-export main types
pub use error::TelemetryError;
pub use logging::{env_filter, init_logging, LoggingConfig};
pub use metrics::RouterMetrics;
pub use tracing_setup::{init_tracing, shutdown_tracing, TracingConfig};
