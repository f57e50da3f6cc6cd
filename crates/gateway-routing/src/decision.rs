//! Routing decisions.
//!
//! The engine turns caller configuration, the classifier's verdict and
//! optional workflow hints into a [`RoutingDecision`]. It never fails: an
//! unusable manual provider is coerced to the default provider and the
//! coercion is reported through [`DecisionSource::ManualCoerced`].

use crate::classifier::QueryClassifier;
use gateway_core::{
    DecisionSource, ModelCatalog, ProviderId, QueryCategory, RouterConfig, RoutingDecision,
    WorkflowContext,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Whether a route turns reasoning augmentation on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningPolicy {
    /// Always augment
    Always,
    /// Never augment
    Never,
    /// Ask the classifier
    Inferred,
}

/// Where a category is routed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTarget {
    /// Provider for the category
    pub provider: ProviderId,
    /// Reasoning policy for the category
    pub reasoning: ReasoningPolicy,
    /// Rationale reported with the decision
    pub rationale: String,
}

impl RouteTarget {
    /// Create a route target
    #[must_use]
    pub fn new(
        provider: ProviderId,
        reasoning: ReasoningPolicy,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            reasoning,
            rationale: rationale.into(),
        }
    }
}

/// Category to provider mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: HashMap<QueryCategory, RouteTarget>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RouteTable {
    /// Built-in routes
    #[must_use]
    pub fn builtin() -> Self {
        let routes = QueryCategory::ALL
            .into_iter()
            .map(|c| (c, Self::builtin_target(c)))
            .collect();
        Self { routes }
    }

    fn builtin_target(category: QueryCategory) -> RouteTarget {
        match category {
            QueryCategory::Research => RouteTarget::new(
                ProviderId::Anthropic,
                ReasoningPolicy::Always,
                "Research and analysis task",
            ),
            QueryCategory::Creative => RouteTarget::new(
                ProviderId::OpenAI,
                ReasoningPolicy::Never,
                "Creative content task",
            ),
            QueryCategory::Technical => RouteTarget::new(
                ProviderId::Gemini,
                ReasoningPolicy::Never,
                "Technical task",
            ),
            QueryCategory::Strategic => RouteTarget::new(
                ProviderId::Anthropic,
                ReasoningPolicy::Inferred,
                "Strategic planning task",
            ),
        }
    }

    /// Replace the route for a category
    #[must_use]
    pub fn with_route(mut self, category: QueryCategory, target: RouteTarget) -> Self {
        self.routes.insert(category, target);
        self
    }

    /// Route for a category
    #[must_use]
    pub fn target(&self, category: QueryCategory) -> RouteTarget {
        self.routes
            .get(&category)
            .cloned()
            .unwrap_or_else(|| Self::builtin_target(category))
    }
}

/// Produces a [`RoutingDecision`] for each request
#[derive(Debug, Clone)]
pub struct RoutingDecisionEngine {
    classifier: QueryClassifier,
    routes: RouteTable,
    catalog: ModelCatalog,
    default_provider: ProviderId,
}

impl Default for RoutingDecisionEngine {
    fn default() -> Self {
        Self {
            classifier: QueryClassifier::default(),
            routes: RouteTable::builtin(),
            catalog: ModelCatalog::default(),
            default_provider: ProviderId::Anthropic,
        }
    }
}

impl RoutingDecisionEngine {
    /// Create an engine with built-in tables
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the classifier
    #[must_use]
    pub fn with_classifier(mut self, classifier: QueryClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Set the route table
    #[must_use]
    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    /// Set the model catalog
    #[must_use]
    pub fn with_catalog(mut self, catalog: ModelCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Set the provider used for manual routing without a provider
    #[must_use]
    pub fn with_default_provider(mut self, provider: ProviderId) -> Self {
        self.default_provider = provider;
        self
    }

    /// Model catalog in use
    #[must_use]
    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Default provider
    #[must_use]
    pub fn default_provider(&self) -> ProviderId {
        self.default_provider
    }

    /// Decide where a request goes
    pub fn decide(
        &self,
        message: &str,
        context_hint: &str,
        config: &RouterConfig,
        workflow: Option<&WorkflowContext>,
    ) -> RoutingDecision {
        let mut decision = if config.is_manual() {
            self.manual(message, context_hint, config, workflow)
        } else {
            self.automatic(message, context_hint, workflow)
        };

        if let Some(summary) = workflow.and_then(WorkflowContext::summary) {
            decision.rationale = format!("{} [{summary}]", decision.rationale);
        }

        debug!(
            provider = %decision.provider,
            model = %decision.model,
            use_reasoning = decision.use_reasoning,
            source = ?decision.source,
            "Routing decision made"
        );

        decision
    }

    fn manual(
        &self,
        message: &str,
        context_hint: &str,
        config: &RouterConfig,
        workflow: Option<&WorkflowContext>,
    ) -> RoutingDecision {
        let use_reasoning = config
            .force_reasoning
            .unwrap_or_else(|| self.classifier.needs_reasoning(message, context_hint, workflow));

        let requested = config
            .manual_provider
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());

        match requested.map(|raw| (raw, raw.parse::<ProviderId>())) {
            Some((raw, Err(_))) => {
                let provider = self.default_provider;
                warn!(
                    requested = %raw,
                    provider = %provider,
                    "Unrecognized manual provider, using default"
                );
                RoutingDecision {
                    provider,
                    model: self.catalog.default_model(provider).to_string(),
                    use_reasoning,
                    rationale: format!(
                        "Manual selection (unrecognized provider \"{raw}\", using {provider})"
                    ),
                    source: DecisionSource::ManualCoerced,
                    category: None,
                }
            }
            Some((_, Ok(provider))) => self.manual_decision(provider, config, use_reasoning),
            None => self.manual_decision(self.default_provider, config, use_reasoning),
        }
    }

    fn manual_decision(
        &self,
        provider: ProviderId,
        config: &RouterConfig,
        use_reasoning: bool,
    ) -> RoutingDecision {
        let model = config
            .manual_model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map_or_else(
                || self.catalog.default_model(provider).to_string(),
                ToString::to_string,
            );

        RoutingDecision {
            provider,
            model,
            use_reasoning,
            rationale: "Manual selection".to_string(),
            source: DecisionSource::Manual,
            category: None,
        }
    }

    fn automatic(
        &self,
        message: &str,
        context_hint: &str,
        workflow: Option<&WorkflowContext>,
    ) -> RoutingDecision {
        let category = self.classifier.classify(message, context_hint);
        let target = self.routes.target(category);

        let use_reasoning = match target.reasoning {
            ReasoningPolicy::Always => true,
            ReasoningPolicy::Never => false,
            ReasoningPolicy::Inferred => {
                self.classifier.needs_reasoning(message, context_hint, workflow)
            }
        };

        RoutingDecision {
            provider: target.provider,
            model: self.catalog.default_model(target.provider).to_string(),
            use_reasoning,
            rationale: target.rationale,
            source: DecisionSource::Automatic,
            category: Some(category),
        }
    }
}
