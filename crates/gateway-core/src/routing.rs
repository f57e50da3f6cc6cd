//! Routing value types shared by the decision engine, executor, and server.

use crate::provider::ProviderId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request category produced by the classifier
///
/// `Strategic` is the catch-all: anything that matches no other category
/// lands there, so classification is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryCategory {
    /// Research and analysis
    Research,
    /// Creative content
    Creative,
    /// Technical work
    Technical,
    /// Strategic planning (default)
    #[default]
    Strategic,
}

impl QueryCategory {
    /// Every category
    pub const ALL: [Self; 4] = [Self::Research, Self::Creative, Self::Technical, Self::Strategic];

    /// Lowercase name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Creative => "creative",
            Self::Technical => "technical",
            Self::Strategic => "strategic",
        }
    }
}

impl fmt::Display for QueryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied routing configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterConfig {
    /// Whether automatic routing is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Provider to use instead of automatic routing
    ///
    /// Kept as raw text so that unrecognised names can be reported rather
    /// than rejected during deserialization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_provider: Option<String>,

    /// Model to use with the manual provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_model: Option<String>,

    /// Force reasoning augmentation on or off
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_reasoning: Option<bool>,
}

impl RouterConfig {
    /// Automatic routing with no overrides
    #[must_use]
    pub fn automatic() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    /// Manual routing to the given provider
    #[must_use]
    pub fn manual(provider: impl Into<String>) -> Self {
        Self {
            enabled: false,
            manual_provider: Some(provider.into()),
            ..Default::default()
        }
    }

    /// Set the manual model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.manual_model = Some(model.into());
        self
    }

    /// Force reasoning on or off
    #[must_use]
    pub fn with_force_reasoning(mut self, force: bool) -> Self {
        self.force_reasoning = Some(force);
        self
    }

    /// Whether this config bypasses automatic routing
    ///
    /// A blank manual provider counts as absent.
    #[must_use]
    pub fn is_manual(&self) -> bool {
        !self.enabled
            || self
                .manual_provider
                .as_deref()
                .is_some_and(|p| !p.trim().is_empty())
    }
}

/// Stage of the caller's workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum WorkflowStage {
    Discovery,
    Research,
    Planning,
    Drafting,
    Review,
    Delivery,
}

/// Kind of project the request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum ProjectType {
    Content,
    Research,
    Strategy,
    Technical,
    Marketing,
    Other,
}

/// Caller's estimate of request complexity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

/// Caller-assigned priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

macro_rules! impl_display_via_serde_name {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    let name = format!("{self:?}").to_ascii_lowercase();
                    f.write_str(&name)
                }
            }
        )*
    };
}

impl_display_via_serde_name!(WorkflowStage, ProjectType, Complexity, Priority);

/// Advisory workflow hints
///
/// These bias the reasoning predicate and rationale text; they never
/// constrain which provider is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowContext {
    /// Workflow stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<WorkflowStage>,
    /// Project type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<ProjectType>,
    /// Complexity estimate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
    /// Priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl WorkflowContext {
    /// Whether the caller marked the work as complex
    #[must_use]
    pub fn is_complex(&self) -> bool {
        self.complexity == Some(Complexity::Complex)
    }

    /// Short summary of the present hints, e.g. `stage: research, priority: high`
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(stage) = self.stage {
            parts.push(format!("stage: {stage}"));
        }
        if let Some(project_type) = self.project_type {
            parts.push(format!("project: {project_type}"));
        }
        if let Some(complexity) = self.complexity {
            parts.push(format!("complexity: {complexity}"));
        }
        if let Some(priority) = self.priority {
            parts.push(format!("priority: {priority}"));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// How a routing decision was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    /// Caller selected the provider (or disabled routing)
    Manual,
    /// Caller named a provider that does not exist; the default was used
    ManualCoerced,
    /// Classifier and route table selected the provider
    Automatic,
}

/// Routing decision for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingDecision {
    /// Selected provider
    pub provider: ProviderId,
    /// Selected model
    pub model: String,
    /// Whether to run reasoning augmentation
    pub use_reasoning: bool,
    /// Human-readable explanation, never empty
    pub rationale: String,
    /// How the decision was reached
    pub source: DecisionSource,
    /// Category, when the classifier chose the route
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<QueryCategory>,
}
