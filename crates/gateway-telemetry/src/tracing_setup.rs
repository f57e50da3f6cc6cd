//! Tracing setup with OpenTelemetry.
//!
//! Installs the same fmt layer as [`crate::init_logging`] and, when enabled,
//! an OpenTelemetry layer so every `tracing` span also carries a trace
//! context. Span export is left to whichever exporter the deployment adds
//! to the returned [`TracerProvider`].

use crate::error::TelemetryError;
use crate::logging::{env_filter, fmt_layer, LoggingConfig};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::{
    trace::{Config, RandomIdGenerator, Sampler, TracerProvider},
    Resource,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Tracing configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Attach the OpenTelemetry layer
    pub enabled: bool,
    /// Service name
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Sampling rate (0.0 - 1.0)
    pub sampling_rate: f64,
    /// Log output settings
    pub logging: LoggingConfig,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            service_name: "provider-routing-gateway".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            sampling_rate: 1.0,
            logging: LoggingConfig::default(),
        }
    }
}

impl TracingConfig {
    /// Create a new tracing configuration
    #[must_use]
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Set the sampling rate
    #[must_use]
    pub fn with_sampling_rate(mut self, rate: f64) -> Self {
        self.sampling_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Set the log output settings
    #[must_use]
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Toggle the OpenTelemetry layer
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    fn sampler(&self) -> Sampler {
        if self.sampling_rate >= 1.0 {
            Sampler::AlwaysOn
        } else if self.sampling_rate <= 0.0 {
            Sampler::AlwaysOff
        } else {
            Sampler::TraceIdRatioBased(self.sampling_rate)
        }
    }
}

/// Install the global subscriber with optional OpenTelemetry support
///
/// # Errors
/// Returns error if a global subscriber is already installed
pub fn init_tracing(config: &TracingConfig) -> Result<Option<TracerProvider>, TelemetryError> {
    if !config.enabled {
        crate::logging::init_logging(&config.logging)?;
        return Ok(None);
    }

    let resource = Resource::new(vec![
        KeyValue::new("service.name", config.service_name.clone()),
        KeyValue::new("service.version", config.service_version.clone()),
    ]);

    let provider = TracerProvider::builder()
        .with_config(
            Config::default()
                .with_sampler(config.sampler())
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(resource),
        )
        .build();

    let tracer = provider.tracer(config.service_name.clone());

    tracing_subscriber::registry()
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .with(fmt_layer(&config.logging).with_filter(env_filter(&config.logging.level)))
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))?;

    info!(
        service = %config.service_name,
        sampling_rate = config.sampling_rate,
        "Tracing initialized"
    );

    Ok(Some(provider))
}

/// Flush and drop the tracer provider
pub fn shutdown_tracing(provider: Option<TracerProvider>) {
    if let Some(provider) = provider {
        for result in provider.force_flush() {
            if let Err(e) = result {
                tracing::warn!(error = %e, "Failed to flush spans");
            }
        }
        drop(provider);
        info!("Tracing shutdown complete");
    }
}
