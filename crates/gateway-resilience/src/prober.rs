//! Background health probing.
//!
//! A [`HealthMonitor`] owns at most one tokio task that probes every provider
//! on a fixed interval and reports results into the shared
//! [`ProviderHealthRegistry`].

use crate::health::{HealthSnapshot, ProviderHealthRegistry};
use futures::future::join_all;
use gateway_core::{
    GatewayResult, GenerationRequest, ModelCatalog, ProviderAdapter, ProviderDirectory, ProviderId,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// What a probe does
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeMode {
    /// Authenticated model-list or equivalent request
    #[default]
    Connectivity,
    /// Tiny generation call (billable)
    Completion,
}

/// Prober settings
#[derive(Debug, Clone)]
pub struct ProberConfig {
    /// Time between probe rounds
    pub probe_interval: Duration,
    /// Bound on a single probe
    pub probe_timeout: Duration,
    /// Probe kind
    pub mode: ProbeMode,
}

impl Default for ProberConfig {
    fn default() -> Self {
        Self {
            probe_interval: Duration::from_secs(60),
            probe_timeout: Duration::from_secs(5),
            mode: ProbeMode::Connectivity,
        }
    }
}

/// Periodic health prober with an explicit start/stop lifecycle
pub struct HealthMonitor {
    registry: Arc<ProviderHealthRegistry>,
    directory: Arc<dyn ProviderDirectory>,
    catalog: ModelCatalog,
    config: ProberConfig,
    shutdown_tx: watch::Sender<bool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl HealthMonitor {
    /// Create a stopped monitor
    #[must_use]
    pub fn new(
        registry: Arc<ProviderHealthRegistry>,
        directory: Arc<dyn ProviderDirectory>,
        config: ProberConfig,
    ) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            registry,
            directory,
            catalog: ModelCatalog::default(),
            config,
            shutdown_tx,
            handle: Mutex::new(None),
        }
    }

    /// Set the catalog used for completion probes
    #[must_use]
    pub fn with_catalog(mut self, catalog: ModelCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Registry the monitor reports into
    #[must_use]
    pub fn registry(&self) -> &Arc<ProviderHealthRegistry> {
        &self.registry
    }

    /// Prober settings
    #[must_use]
    pub fn config(&self) -> &ProberConfig {
        &self.config
    }

    /// Whether the background task is running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Spawn the probing task; a no-op while already running
    ///
    /// The first round runs immediately.
    pub fn start(self: &Arc<Self>) {
        let mut handle = self.handle.lock();
        if handle.as_ref().is_some_and(|h| !h.is_finished()) {
            debug!("Health monitor already running");
            return;
        }

        self.shutdown_tx.send_replace(false);
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let monitor = Arc::clone(self);

        info!(
            interval_secs = self.config.probe_interval.as_secs(),
            mode = ?self.config.mode,
            "Starting health monitor"
        );

        *handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(monitor.config.probe_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        monitor.probe_now().await;
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            debug!("Health monitor task exited");
        }));
    }

    /// Signal the task and wait for it to finish; idempotent
    pub async fn stop(&self) {
        let handle = self.handle.lock().take();
        let Some(handle) = handle else {
            return;
        };

        self.shutdown_tx.send_replace(true);
        if let Err(e) = handle.await {
            warn!(error = %e, "Health monitor task did not exit cleanly");
        }
        info!("Health monitor stopped");
    }

    /// Probe every provider once, concurrently, and return the resulting health
    pub async fn probe_now(&self) -> HealthSnapshot {
        join_all(ProviderId::ALL.into_iter().map(|p| self.probe(p))).await;
        self.registry.snapshot()
    }

    async fn probe(&self, provider: ProviderId) {
        let Some(adapter) = self.directory.adapter(provider) else {
            self.registry
                .record_probe_failure(provider, "provider not registered");
            return;
        };

        if !adapter.has_credential() {
            self.registry.record_probe_failure(provider, "missing credential");
            return;
        }

        let start = Instant::now();
        let check = self.check(adapter.as_ref(), provider);

        match tokio::time::timeout(self.config.probe_timeout, check).await {
            Ok(Ok(())) => {
                let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                debug!(provider = %provider, latency_ms, "Probe succeeded");
                self.registry.record_probe_success(provider, latency_ms);
            }
            Ok(Err(e)) => {
                debug!(provider = %provider, error = %e, "Probe failed");
                self.registry.record_probe_failure(provider, e.to_string());
            }
            Err(_) => {
                debug!(provider = %provider, "Probe timed out");
                self.registry.record_probe_failure(
                    provider,
                    format!(
                        "probe timed out after {}ms",
                        self.config.probe_timeout.as_millis()
                    ),
                );
            }
        }
    }

    async fn check(
        &self,
        adapter: &dyn ProviderAdapter,
        provider: ProviderId,
    ) -> GatewayResult<()> {
        match self.config.mode {
            ProbeMode::Connectivity => adapter.check_connectivity().await,
            ProbeMode::Completion => {
                let request = GenerationRequest::builder()
                    .model(self.catalog.default_model(provider))
                    .prompt("ping")
                    .temperature(0.0)
                    .max_tokens(1)
                    .build()?;
                adapter.generate(&request).await.map(|_| ())
            }
        }
    }
}

impl std::fmt::Debug for HealthMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthMonitor")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
