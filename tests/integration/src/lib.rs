//! Integration tests for the provider routing gateway
//!
//! The gateway is assembled from configuration with its real HTTP adapters,
//! each pointed at a wiremock server speaking that provider's wire format.
//! Covered:
//! - Routing decisions over the HTTP API
//! - Ordered failover across providers
//! - Health probing and its effect on failover order
//! - Research augmentation before generation
//! - Operational endpoints and serving over a real socket

pub mod fixtures;
pub mod helpers;
pub mod mock_providers;

// Re-export commonly used items
pub use fixtures::*;
pub use helpers::*;
pub use mock_providers::*;

#[cfg(test)]
mod api_tests;
#[cfg(test)]
mod failover_tests;
#[cfg(test)]
mod health_tests;
#[cfg(test)]
mod routing_tests;
