//! Keyword-table request classification.
//!
//! Classification is plain case-insensitive substring matching of the message
//! and context hint against per-category keyword lists. The lists live in a
//! [`KeywordTable`] rather than in control flow, so categories and keywords
//! can be changed (or loaded from config) without touching this module.

use gateway_core::{QueryCategory, WorkflowContext};
use serde::{Deserialize, Serialize};

/// Keywords for one category, evaluated in ascending `priority`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Category selected when any keyword matches
    pub category: QueryCategory,
    /// Lowercase keywords matched as substrings
    pub keywords: Vec<String>,
    /// Evaluation order, lower first
    pub priority: u8,
}

impl CategoryRule {
    /// Create a rule; keywords are normalised to lowercase
    #[must_use]
    pub fn new<I, S>(category: QueryCategory, priority: u8, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            category,
            keywords: normalise(keywords),
            priority,
        }
    }

    fn matches(&self, haystack: &str) -> bool {
        self.keywords.iter().any(|k| haystack.contains(k.as_str()))
    }
}

/// Ordered set of category rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    rules: Vec<CategoryRule>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KeywordTable {
    /// Create a table from rules; they are sorted by priority
    #[must_use]
    pub fn new(mut rules: Vec<CategoryRule>) -> Self {
        rules.sort_by_key(|r| r.priority);
        Self { rules }
    }

    /// Built-in table: research, then creative, then technical
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![
            CategoryRule::new(
                QueryCategory::Research,
                0,
                [
                    "research",
                    "analy",
                    "investigat",
                    "study",
                    "studies",
                    "market",
                    "competit",
                    "trend",
                    "statistic",
                    "survey",
                    "report",
                    "benchmark",
                    "compare",
                    "comparison",
                    "insight",
                ],
            ),
            CategoryRule::new(
                QueryCategory::Creative,
                1,
                [
                    "creative",
                    "write",
                    "writing",
                    "story",
                    "headline",
                    "catchy",
                    "slogan",
                    "tagline",
                    "brainstorm",
                    "social media",
                    "blog",
                    "caption",
                    "poem",
                    "copywriting",
                    "narrative",
                    "brand voice",
                ],
            ),
            CategoryRule::new(
                QueryCategory::Technical,
                2,
                [
                    "code",
                    "coding",
                    "technical",
                    "programming",
                    "software",
                    "debug",
                    "bug",
                    "algorithm",
                    "database",
                    "architecture",
                    "implement",
                    "deploy",
                    "infrastructure",
                    "sdk",
                    "endpoint",
                    "integration",
                ],
            ),
        ])
    }

    /// Replace the keyword list for a category, adding a rule if absent
    ///
    /// New rules are evaluated after every existing rule.
    #[must_use]
    pub fn with_keywords<I, S>(mut self, category: QueryCategory, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = normalise(keywords);
        if let Some(rule) = self.rules.iter_mut().find(|r| r.category == category) {
            rule.keywords = keywords;
        } else {
            let priority = self
                .rules
                .iter()
                .map(|r| r.priority)
                .max()
                .map_or(0, |p| p.saturating_add(1));
            self.rules.push(CategoryRule {
                category,
                keywords,
                priority,
            });
        }
        self
    }

    /// Rules in evaluation order
    #[must_use]
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// First category whose keywords occur in `haystack`
    ///
    /// `haystack` must already be lowercase.
    #[must_use]
    pub fn first_match(&self, haystack: &str) -> Option<QueryCategory> {
        self.rules
            .iter()
            .find(|r| r.matches(haystack))
            .map(|r| r.category)
    }
}

/// Built-in comprehensiveness/complexity indicators
const REASONING_INDICATORS: &[&str] = &[
    "comprehensive",
    "in-depth",
    "in depth",
    "detailed",
    "thorough",
    "complex",
    "strategy",
    "strategic",
    "analyze",
    "analysis",
    "evaluate",
    "assessment",
    "compare",
    "comparison",
    "pros and cons",
    "trade-off",
    "tradeoff",
    "implication",
    "step by step",
    "step-by-step",
    "deep dive",
    "long-term",
    "roadmap",
];

/// Stateless request classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryClassifier {
    table: KeywordTable,
    reasoning_indicators: Vec<String>,
}

impl Default for QueryClassifier {
    fn default() -> Self {
        Self::new(KeywordTable::builtin())
    }
}

impl QueryClassifier {
    /// Create a classifier over the given table with built-in reasoning indicators
    #[must_use]
    pub fn new(table: KeywordTable) -> Self {
        Self {
            table,
            reasoning_indicators: normalise(REASONING_INDICATORS),
        }
    }

    /// Replace the reasoning indicator list
    #[must_use]
    pub fn with_reasoning_indicators<I, S>(mut self, indicators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.reasoning_indicators = normalise(indicators);
        self
    }

    /// Keyword table in use
    #[must_use]
    pub fn table(&self) -> &KeywordTable {
        &self.table
    }

    /// Categorise a request; never fails, unmatched input is `Strategic`
    #[must_use]
    pub fn classify(&self, message: &str, context_hint: &str) -> QueryCategory {
        let haystack = haystack(message, context_hint);
        self.table.first_match(&haystack).unwrap_or_default()
    }

    /// Whether the request calls for deep reasoning
    #[must_use]
    pub fn needs_reasoning(
        &self,
        message: &str,
        context_hint: &str,
        workflow: Option<&WorkflowContext>,
    ) -> bool {
        if workflow.is_some_and(WorkflowContext::is_complex) {
            return true;
        }

        let haystack = haystack(message, context_hint);
        self.reasoning_indicators
            .iter()
            .any(|k| haystack.contains(k.as_str()))
    }
}

fn haystack(message: &str, context_hint: &str) -> String {
    format!("{message} {context_hint}").to_lowercase()
}

fn normalise<I, S>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keywords
        .into_iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}
