//! Structured logging setup.

use crate::error::TelemetryError;
use tracing::Subscriber;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Include the event target (module path)
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            with_target: true,
        }
    }
}

impl LoggingConfig {
    /// Create a logging configuration with the given filter directive
    #[must_use]
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    /// Toggle JSON output
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Toggle event targets
    #[must_use]
    pub fn with_target(mut self, with_target: bool) -> Self {
        self.with_target = with_target;
        self
    }
}

/// Filter from `RUST_LOG`, else from `level`, else `info`
#[must_use]
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub(crate) fn fmt_layer<S>(config: &LoggingConfig) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    if config.json {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(config.with_target)
            .boxed()
    } else {
        fmt::layer().with_target(config.with_target).boxed()
    }
}

/// Install the global logging subscriber
///
/// # Errors
/// Returns error if a global subscriber is already installed
pub fn init_logging(config: &LoggingConfig) -> Result<(), TelemetryError> {
    tracing_subscriber::registry()
        .with(fmt_layer(config).with_filter(env_filter(&config.level)))
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))
}
