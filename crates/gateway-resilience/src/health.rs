//! Per-provider health tracking.
//!
//! All records live behind one lock and every mutation goes through
//! [`ProviderHealthRegistry::update`]. Queries are answered from a
//! [`HealthSnapshot`] so a single decision never mixes two states.

use chrono::{DateTime, Utc};
use gateway_core::ProviderId;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Health thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Consecutive errors after which a provider is unhealthy
    pub max_error_count: u32,
    /// Upper bound on the stored error count
    pub error_ceiling: u32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            max_error_count: 3,
            error_ceiling: 10,
        }
    }
}

impl HealthConfig {
    /// Clamp to sane values: at least one error, ceiling not below the max
    #[must_use]
    pub fn normalized(self) -> Self {
        let max_error_count = self.max_error_count.max(1);
        Self {
            max_error_count,
            error_ceiling: self.error_ceiling.max(max_error_count),
        }
    }
}

/// Health state of one provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Whether the provider is usable
    pub is_healthy: bool,
    /// When the provider was last probed or called
    pub last_checked_at: Option<DateTime<Utc>>,
    /// Latency of the last successful probe or call
    pub last_response_time_ms: Option<u64>,
    /// Consecutive error count (decays on success)
    pub error_count: u32,
    /// Last error message
    pub last_error: Option<String>,
}

impl Default for HealthRecord {
    fn default() -> Self {
        Self {
            is_healthy: true,
            last_checked_at: None,
            last_response_time_ms: None,
            error_count: 0,
            last_error: None,
        }
    }
}

/// Point-in-time copy of every provider's health
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthSnapshot {
    records: HashMap<ProviderId, HealthRecord>,
    max_error_count: u32,
}

impl HealthSnapshot {
    /// Record for a provider
    #[must_use]
    pub fn record(&self, provider: ProviderId) -> HealthRecord {
        self.records.get(&provider).cloned().unwrap_or_default()
    }

    /// Records in canonical provider order
    pub fn iter(&self) -> impl Iterator<Item = (ProviderId, HealthRecord)> + '_ {
        ProviderId::ALL.into_iter().map(|p| (p, self.record(p)))
    }

    /// Whether the provider is healthy and below the error threshold
    #[must_use]
    pub fn is_healthy(&self, provider: ProviderId) -> bool {
        self.records
            .get(&provider)
            .map_or(true, |r| r.is_healthy && r.error_count < self.max_error_count)
    }

    /// Healthy providers in canonical order
    #[must_use]
    pub fn healthy_providers(&self) -> Vec<ProviderId> {
        ProviderId::ALL
            .into_iter()
            .filter(|p| self.is_healthy(*p))
            .collect()
    }

    /// Best provider to use
    ///
    /// The first healthy entry of `preferred`, otherwise the healthy provider
    /// with the lowest observed latency, otherwise the first known provider.
    #[must_use]
    pub fn best_provider(&self, preferred: &[ProviderId]) -> ProviderId {
        if let Some(p) = preferred.iter().copied().find(|p| self.is_healthy(*p)) {
            return p;
        }

        self.healthy_providers()
            .into_iter()
            .min_by_key(|p| {
                self.records
                    .get(p)
                    .and_then(|r| r.last_response_time_ms)
                    .unwrap_or(u64::MAX)
            })
            .unwrap_or(ProviderId::ALL[0])
    }

    /// Ordered candidates: primary, then healthy, then unhealthy providers
    #[must_use]
    pub fn fallback_chain(&self, primary: ProviderId) -> Vec<ProviderId> {
        let others = ProviderId::ALL.into_iter().filter(|p| *p != primary);
        let (healthy, unhealthy): (Vec<_>, Vec<_>) = others.partition(|p| self.is_healthy(*p));

        let mut chain = Vec::with_capacity(ProviderId::ALL.len());
        chain.push(primary);
        chain.extend(healthy);
        chain.extend(unhealthy);
        chain
    }
}

/// Shared registry of provider health
#[derive(Debug)]
pub struct ProviderHealthRegistry {
    config: HealthConfig,
    records: RwLock<HashMap<ProviderId, HealthRecord>>,
}

impl Default for ProviderHealthRegistry {
    fn default() -> Self {
        Self::new(HealthConfig::default())
    }
}

impl ProviderHealthRegistry {
    /// Create a registry with every provider optimistically healthy
    #[must_use]
    pub fn new(config: HealthConfig) -> Self {
        let records = ProviderId::ALL
            .into_iter()
            .map(|p| (p, HealthRecord::default()))
            .collect();

        Self {
            config: config.normalized(),
            records: RwLock::new(records),
        }
    }

    /// Thresholds in use
    #[must_use]
    pub fn config(&self) -> HealthConfig {
        self.config
    }

    /// Consistent copy of all records
    #[must_use]
    pub fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot {
            records: self.records.read().clone(),
            max_error_count: self.config.max_error_count,
        }
    }

    /// Record for one provider
    #[must_use]
    pub fn record(&self, provider: ProviderId) -> HealthRecord {
        self.records
            .read()
            .get(&provider)
            .cloned()
            .unwrap_or_default()
    }

    /// Healthy providers in canonical order
    #[must_use]
    pub fn healthy_providers(&self) -> Vec<ProviderId> {
        self.snapshot().healthy_providers()
    }

    /// See [`HealthSnapshot::best_provider`]
    #[must_use]
    pub fn best_provider(&self, preferred: &[ProviderId]) -> ProviderId {
        self.snapshot().best_provider(preferred)
    }

    /// See [`HealthSnapshot::fallback_chain`]
    #[must_use]
    pub fn fallback_chain(&self, primary: ProviderId) -> Vec<ProviderId> {
        self.snapshot().fallback_chain(primary)
    }

    /// A probe succeeded: the provider is fully healthy again
    pub fn record_probe_success(&self, provider: ProviderId, latency_ms: u64) {
        self.update(provider, |record, _| {
            let recovered = !record.is_healthy;
            record.error_count = 0;
            record.is_healthy = true;
            record.last_error = None;
            record.last_response_time_ms = Some(latency_ms);
            if recovered {
                info!(provider = %provider, "Provider recovered");
            }
        });
    }

    /// A probe failed
    pub fn record_probe_failure(&self, provider: ProviderId, message: impl Into<String>) {
        self.record_failure(provider, message.into());
    }

    /// A live call succeeded: the error count decays by one
    ///
    /// Health is recomputed from the decayed count rather than forced to
    /// `true`, so a provider with many recent failures needs several
    /// successes (or a passing probe) before it reports healthy again.
    pub fn record_success(&self, provider: ProviderId, latency_ms: u64) {
        self.update(provider, |record, config| {
            record.error_count = record.error_count.saturating_sub(1);
            record.is_healthy = record.error_count < config.max_error_count;
            record.last_error = None;
            record.last_response_time_ms = Some(latency_ms);
        });
    }

    /// A live call failed
    pub fn record_error(&self, provider: ProviderId, message: impl Into<String>) {
        self.record_failure(provider, message.into());
    }

    fn record_failure(&self, provider: ProviderId, message: String) {
        self.update(provider, |record, config| {
            let was_healthy = record.is_healthy;
            record.error_count = record
                .error_count
                .saturating_add(1)
                .min(config.error_ceiling);
            record.is_healthy = record.error_count < config.max_error_count;
            if was_healthy && !record.is_healthy {
                warn!(
                    provider = %provider,
                    error_count = record.error_count,
                    error = %message,
                    "Provider marked unhealthy"
                );
            }
            record.last_error = Some(message);
        });
    }

    fn update(&self, provider: ProviderId, f: impl FnOnce(&mut HealthRecord, &HealthConfig)) {
        let mut records = self.records.write();
        let record = records.entry(provider).or_default();
        f(record, &self.config);
        record.last_checked_at = Some(Utc::now());
        debug!(
            provider = %provider,
            healthy = record.is_healthy,
            error_count = record.error_count,
            "Health updated"
        );
    }
}
