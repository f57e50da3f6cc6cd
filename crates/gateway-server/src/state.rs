//! Application state shared across handlers.

use crate::service::RoutingService;
use gateway_resilience::HealthMonitor;
use gateway_telemetry::RouterMetrics;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Routing pipeline
    pub service: Arc<RoutingService>,
    /// Background health prober
    pub monitor: Arc<HealthMonitor>,
    /// Metrics registry
    pub metrics: Arc<RouterMetrics>,
    /// Whole-request timeout applied by the HTTP layer
    pub request_timeout: Duration,
}

impl AppState {
    /// Default whole-request timeout
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

    /// Create state around a service and its monitor
    #[must_use]
    pub fn new(service: Arc<RoutingService>, monitor: Arc<HealthMonitor>) -> Self {
        let metrics = Arc::clone(service.metrics());
        Self {
            service,
            monitor,
            metrics,
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the whole-request timeout
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.service)
            .field("monitor_running", &self.monitor.is_running())
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
