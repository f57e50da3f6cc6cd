//! # Gateway Server
//!
//! HTTP surface of the provider routing gateway.
//!
//! This crate provides:
//! - [`RoutingService`], the decide / augment / execute pipeline
//! - Assembly of that pipeline from [`gateway_config::GatewayConfig`]
//! - Axum routes for routing, generation, health and metrics
//! - Graceful shutdown on Ctrl+C or SIGTERM

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bootstrap;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod service;
pub mod shutdown;
pub mod state;

// Re-export main types
pub use bootstrap::{api_key_for, build_registry, build_state, BootstrapError};
pub use error::ApiError;
pub use routes::create_router;
pub use server::Server;
pub use service::{GenerateRequest, GenerateResponse, RouteRequest, RoutingService};
pub use shutdown::shutdown_signal;
pub use state::AppState;
