//! Telemetry errors.

/// Errors raised while setting up telemetry
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// A global subscriber could not be installed
    #[error("Failed to initialize telemetry: {0}")]
    Init(String),

    /// A metric could not be created or registered
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Gathered metrics could not be encoded
    #[error("Failed to encode metrics: {0}")]
    Encode(String),
}
