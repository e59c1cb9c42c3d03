//! Answered questions and mirror-pair definitions.

use serde::{Deserialize, Serialize};
use super::TraitId;

/// One answered question, finalized from the response log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VignetteResponse {
    pub vignette_id: String,
    /// Label of the final answer (e.g. `"A"`).
    pub option_label: String,
    /// Milliseconds between presentation and the final answer.
    pub elapsed_ms: u64,
    pub changed: bool,
    pub previous_label: Option<String>,
    pub change_count: u32,
}

impl VignetteResponse {
    /// A response answered once, with no edits.
    pub fn new(vignette_id: impl Into<String>, option_label: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            vignette_id: vignette_id.into(),
            option_label: option_label.into(),
            elapsed_ms,
            changed: false,
            previous_label: None,
            change_count: 0,
        }
    }

    /// Mark the response as edited `changes` times, last from `previous`.
    pub fn with_change(mut self, previous: impl Into<String>, changes: u32) -> Self {
        self.changed = changes > 0;
        self.previous_label = Some(previous.into());
        self.change_count = changes;
        self
    }
}

/// How the two answers of a mirror pair are expected to relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedCorrelation {
    /// Both framings should draw the same answer.
    Positive,
    /// The framings are inverted; the same answer twice is inconsistent.
    Negative,
    /// Self frame vs other frame; probes attribution asymmetry.
    Asymmetry,
}

impl std::fmt::Display for ExpectedCorrelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpectedCorrelation::Positive => write!(f, "positive"),
            ExpectedCorrelation::Negative => write!(f, "negative"),
            ExpectedCorrelation::Asymmetry => write!(f, "asymmetry"),
        }
    }
}

/// Two vignettes probing the same trait from different framings.
///
/// For [`ExpectedCorrelation::Asymmetry`] pairs the first vignette is the
/// self frame and the second the other frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorPair {
    pub vignette_1: String,
    pub vignette_2: String,
    pub trait_id: TraitId,
    pub expected: ExpectedCorrelation,
}

impl MirrorPair {
    pub fn new(
        vignette_1: impl Into<String>,
        vignette_2: impl Into<String>,
        trait_id: impl Into<TraitId>,
        expected: ExpectedCorrelation,
    ) -> Self {
        Self {
            vignette_1: vignette_1.into(),
            vignette_2: vignette_2.into(),
            trait_id: trait_id.into(),
            expected,
        }
    }
}
