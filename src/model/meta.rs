//! Meta-scores: how the subject answered, not what.

use serde::{Deserialize, Serialize};

/// Scores derived from timing, edits and mirror-pair consistency.
///
/// Most fields are fractions in `[0, 1]`. With no responses the
/// stability and confidence fields take the neutral value `0.5`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaScores {
    /// `1 - changed / total`.
    pub self_model_stability: f64,
    pub hedging_tendency: f64,
    pub social_desirability: f64,
    /// Fraction of asymmetry pairs answered situational-for-self,
    /// dispositional-for-others.
    pub theory_of_mind_bias: f64,
    /// Fraction of edits that softened an assertive answer.
    pub impression_management: f64,
    pub latent_contradiction: f64,
    pub response_confidence: f64,
    /// Contradictions weighted by edit churn and answer extremity.
    /// Not bounded by 1.
    pub cognitive_dissonance: f64,

    // Auxiliary raw fields
    pub change_rate: f64,
    pub average_response_ms: f64,
    pub latency_spike_ratio: f64,
}

impl MetaScores {
    /// Scores for an empty response history.
    pub fn neutral() -> Self {
        Self {
            self_model_stability: 0.5,
            hedging_tendency: 0.0,
            social_desirability: 0.0,
            theory_of_mind_bias: 0.0,
            impression_management: 0.0,
            latent_contradiction: 0.0,
            response_confidence: 0.5,
            cognitive_dissonance: 0.0,
            change_rate: 0.0,
            average_response_ms: 0.0,
            latency_spike_ratio: 0.0,
        }
    }
}

/// Diagnostic tag raised by a response-pattern rule. Not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFlag {
    LatentContradiction,
    HedgingBias,
    SocialDesirabilitySpike,
    SelfOtherAsymmetry,
    ResponseLatencySpike,
    BacktrackPattern,
    FastUniformResponses,
}

impl std::fmt::Display for ResponseFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseFlag::LatentContradiction => write!(f, "LatentContradiction"),
            ResponseFlag::HedgingBias => write!(f, "HedgingBias"),
            ResponseFlag::SocialDesirabilitySpike => write!(f, "SocialDesirabilitySpike"),
            ResponseFlag::SelfOtherAsymmetry => write!(f, "SelfOtherAsymmetry"),
            ResponseFlag::ResponseLatencySpike => write!(f, "ResponseLatencySpike"),
            ResponseFlag::BacktrackPattern => write!(f, "BacktrackPattern"),
            ResponseFlag::FastUniformResponses => write!(f, "FastUniformResponses"),
        }
    }
}
