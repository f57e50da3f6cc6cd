//! Prometheus metrics for routing and failover.
//!
//! | Name | Type | Labels |
//! |------|------|--------|
//! | `router_decisions_total` | Counter | `source`, `category` |
//! | `router_provider_attempts_total` | Counter | `provider`, `outcome` |
//! | `router_provider_latency_seconds` | Histogram | `provider` |
//! | `router_exhausted_total` | Counter | |
//! | `router_provider_healthy` | Gauge | `provider` |
//! | `router_provider_error_count` | Gauge | `provider` |

use crate::error::TelemetryError;
use gateway_core::{DecisionSource, ProviderId, RoutingDecision};
use prometheus::{
    core::Collector, Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec,
    IntGaugeVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

const LATENCY_BUCKETS: &[f64] = &[0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0];

/// Metrics owned by one gateway instance
#[derive(Clone)]
pub struct RouterMetrics {
    registry: Registry,
    decisions: IntCounterVec,
    attempts: IntCounterVec,
    latency: HistogramVec,
    exhausted: IntCounter,
    healthy: IntGaugeVec,
    error_count: IntGaugeVec,
}

impl RouterMetrics {
    /// Create the metrics on a fresh registry
    ///
    /// # Errors
    /// Returns error if a descriptor is invalid or registered twice
    pub fn new() -> Result<Self, TelemetryError> {
        let registry = Registry::new();

        let decisions = register(
            &registry,
            IntCounterVec::new(
                Opts::new("router_decisions_total", "Routing decisions by source and category"),
                &["source", "category"],
            )?,
        )?;
        let attempts = register(
            &registry,
            IntCounterVec::new(
                Opts::new(
                    "router_provider_attempts_total",
                    "Provider attempts by outcome",
                ),
                &["provider", "outcome"],
            )?,
        )?;
        let latency = register(
            &registry,
            HistogramVec::new(
                HistogramOpts::new(
                    "router_provider_latency_seconds",
                    "Provider attempt latency",
                )
                .buckets(LATENCY_BUCKETS.to_vec()),
                &["provider"],
            )?,
        )?;
        let exhausted = register(
            &registry,
            IntCounter::new(
                "router_exhausted_total",
                "Requests for which every provider failed",
            )?,
        )?;
        let healthy = register(
            &registry,
            IntGaugeVec::new(
                Opts::new("router_provider_healthy", "1 if the provider is healthy"),
                &["provider"],
            )?,
        )?;
        let error_count = register(
            &registry,
            IntGaugeVec::new(
                Opts::new(
                    "router_provider_error_count",
                    "Current consecutive error count",
                ),
                &["provider"],
            )?,
        )?;

        Ok(Self {
            registry,
            decisions,
            attempts,
            latency,
            exhausted,
            healthy,
            error_count,
        })
    }

    /// Underlying registry
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Count a routing decision
    pub fn record_decision(&self, decision: &RoutingDecision) {
        let source = match decision.source {
            DecisionSource::Manual => "manual",
            DecisionSource::ManualCoerced => "manual_coerced",
            DecisionSource::Automatic => "automatic",
        };
        let category = decision.category.map_or("none", |c| c.as_str());
        self.decisions.with_label_values(&[source, category]).inc();
    }

    /// Count one provider attempt and observe its latency
    pub fn record_attempt(&self, provider: ProviderId, outcome: &str, latency: Duration) {
        self.attempts
            .with_label_values(&[provider.as_str(), outcome])
            .inc();
        self.latency
            .with_label_values(&[provider.as_str()])
            .observe(latency.as_secs_f64());
    }

    /// Count a request that exhausted every provider
    pub fn record_exhausted(&self) {
        self.exhausted.inc();
    }

    /// Publish a provider's current health
    pub fn set_provider_health(&self, provider: ProviderId, healthy: bool, error_count: u32) {
        self.healthy
            .with_label_values(&[provider.as_str()])
            .set(i64::from(healthy));
        self.error_count
            .with_label_values(&[provider.as_str()])
            .set(i64::from(error_count));
    }

    /// Encode every metric in the Prometheus text format
    ///
    /// # Errors
    /// Returns error if encoding fails
    pub fn render(&self) -> Result<String, TelemetryError> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| TelemetryError::Encode(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::Encode(e.to_string()))
    }
}

impl std::fmt::Debug for RouterMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterMetrics").finish_non_exhaustive()
    }
}

fn register<C>(registry: &Registry, collector: C) -> Result<C, TelemetryError>
where
    C: Collector + Clone + 'static,
{
    registry.register(Box::new(collector.clone()))?;
    Ok(collector)
}
