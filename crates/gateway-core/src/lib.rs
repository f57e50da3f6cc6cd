//! # Gateway Core
//!
//! Core types, traits, and error handling for the provider routing gateway.
//!
//! This crate provides the foundational types used throughout the gateway:
//! - Provider identities and the adapter/credential traits
//! - Generation request type handed to adapters
//! - Routing value types (caller config, workflow hints, decisions)
//! - Error types and handling

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod error;
pub mod provider;
pub mod request;
pub mod routing;

// Re-export commonly used types
pub use catalog::ModelCatalog;
pub use error::{GatewayError, GatewayResult};
pub use provider::{ParseProviderError, ProviderAdapter, ProviderDirectory, ProviderId};
pub use request::{
    GenerationRequest, GenerationRequestBuilder, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
pub use routing::{
    Complexity, DecisionSource, Priority, ProjectType, QueryCategory, RouterConfig,
    RoutingDecision, WorkflowContext, WorkflowStage,
};
