//! # Gateway Resilience
//!
//! Provider health and failover for the routing gateway:
//! - Shared per-provider health registry
//! - Background health prober with start/stop lifecycle
//! - Sequential, timeout-bounded fallback executor

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fallback;
pub mod health;
pub mod prober;

// Re-export main types
pub use fallback::{
    AttemptOutcome, AttemptRecord, ExecutionFailure, ExecutionOutcome, ExecutionRequest,
    ExecutorConfig, FallbackExecutor,
};
pub use health::{HealthConfig, HealthRecord, HealthSnapshot, ProviderHealthRegistry};
pub use prober::{HealthMonitor, ProbeMode, ProberConfig};
