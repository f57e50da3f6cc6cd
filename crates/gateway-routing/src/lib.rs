//! # Gateway Routing
//!
//! Decides where a generation request should go before anything is executed.
//!
//! This crate provides:
//! - Keyword-table request classification
//! - Category-to-provider route table and the decision engine
//! - Optional reasoning augmentation of the system prompt

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod augmenter;
pub mod classifier;
pub mod decision;

// Re-export main types
pub use augmenter::{
    ProviderResearchSource, ReasoningAugmenter, ResearchSource, RESEARCH_DATA_END,
    RESEARCH_DATA_START,
};
pub use classifier::{CategoryRule, KeywordTable, QueryClassifier};
pub use decision::{ReasoningPolicy, RouteTable, RouteTarget, RoutingDecisionEngine};
