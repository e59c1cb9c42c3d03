//! Data-driven classification rules for response patterns.
//!
//! The analyzer never matches labels or vignette ids inline; every such
//! decision goes through [`PatternRules`], which a question bank can ship
//! alongside its vignettes.

use serde::{Deserialize, Serialize};

use crate::model::VignetteResponse;

/// Matches vignette identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "match", content = "value", rename_all = "snake_case")]
pub enum IdPattern {
    Any,
    Exact(String),
    Prefix(String),
    Suffix(String),
    Contains(String),
}

impl IdPattern {
    pub fn matches(&self, id: &str) -> bool {
        match self {
            IdPattern::Any => true,
            IdPattern::Exact(s) => id == s,
            IdPattern::Prefix(s) => id.starts_with(s.as_str()),
            IdPattern::Suffix(s) => id.ends_with(s.as_str()),
            IdPattern::Contains(s) => id.contains(s.as_str()),
        }
    }
}

/// A response is hedging when its label is `label` on a matching vignette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HedgingRule {
    pub label: String,
    pub vignette: IdPattern,
}

impl HedgingRule {
    pub fn new(label: impl Into<String>, vignette: IdPattern) -> Self {
        Self { label: label.into(), vignette }
    }

    pub fn matches(&self, response: &VignetteResponse) -> bool {
        response.option_label == self.label && self.vignette.matches(&response.vignette_id)
    }
}

/// The culturally ideal answer to one vignette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdealAnswer {
    pub vignette_id: String,
    pub label: String,
}

/// How an answer explains behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribution {
    /// "That's the kind of person they are."
    Dispositional,
    /// "The circumstances made them do it."
    Situational,
}

/// Label → attribution mapping entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionLabel {
    pub label: String,
    pub attribution: Attribution,
}

/// Every label/id rule the pattern analyzer uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternRules {
    pub hedging: Vec<HedgingRule>,
    pub ideal_answers: Vec<IdealAnswer>,
    pub attributions: Vec<AttributionLabel>,
    /// The most assertive option label.
    pub assertive_label: String,
    /// Labels an assertive answer can be softened to.
    pub softer_labels: Vec<String>,
    /// Label pairs at opposite ends of the option scale.
    pub polar_pairs: Vec<(String, String)>,
}

impl Default for PatternRules {
    /// Three-option scale `A` / `B` / `C` with `A` the assertive pole and
    /// `B` the middle. A `D` answer ("it depends") always hedges; a middle
    /// answer hedges on `dilemma` vignettes.
    fn default() -> Self {
        Self {
            hedging: vec![
                HedgingRule::new("B", IdPattern::Prefix("dilemma".into())),
                HedgingRule::new("D", IdPattern::Any),
            ],
            ideal_answers: Vec::new(),
            attributions: vec![
                AttributionLabel { label: "A".into(), attribution: Attribution::Dispositional },
                AttributionLabel { label: "C".into(), attribution: Attribution::Situational },
            ],
            assertive_label: "A".into(),
            softer_labels: vec!["B".into()],
            polar_pairs: vec![("A".into(), "C".into())],
        }
    }
}

impl PatternRules {
    pub fn is_hedging(&self, response: &VignetteResponse) -> bool {
        self.hedging.iter().any(|rule| rule.matches(response))
    }

    pub fn is_socially_desirable(&self, response: &VignetteResponse) -> bool {
        self.ideal_answers
            .iter()
            .any(|ideal| ideal.vignette_id == response.vignette_id && ideal.label == response.option_label)
    }

    pub fn attribution(&self, label: &str) -> Option<Attribution> {
        self.attributions
            .iter()
            .find(|a| a.label == label)
            .map(|a| a.attribution)
    }

    /// True when the labels sit at opposite poles, in either order.
    pub fn are_polar(&self, a: &str, b: &str) -> bool {
        self.polar_pairs
            .iter()
            .any(|(x, y)| (x == a && y == b) || (x == b && y == a))
    }

    /// True when an edit moved an assertive answer to a softer one.
    pub fn is_softening(&self, previous: &str, current: &str) -> bool {
        previous == self.assertive_label && self.softer_labels.iter().any(|l| l == current)
    }
}
