//! Analyzer configuration.
//!
//! Every threshold the pipeline uses lives here with its default. Configs
//! are plain serde structs so a host can load them next to the question
//! bank; `validate()` rejects values the algorithms cannot work with.

use serde::{Deserialize, Serialize};

use crate::model::{TraitId, MAX_LATENT_COMPONENTS};
use crate::{Error, Result};

// ============================================================================
// Top-level
// ============================================================================

/// Configuration for the whole pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub profile: ProfileConfig,
    pub patterns: PatternConfig,
    pub projection: ProjectionConfig,
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<()> {
        self.profile.validate()?;
        self.patterns.validate()?;
        self.projection.validate()
    }
}

// ============================================================================
// Profile analysis
// ============================================================================

/// Thresholds for [`ProfileAnalyzer`](crate::analyzer::ProfileAnalyzer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// How many traits count as dominant (globally and per context).
    pub top_n: usize,
    /// How many co-activation patterns the profile keeps.
    pub pattern_top_n: usize,
    /// Smallest latent cluster worth reporting.
    pub min_cluster_size: usize,
    /// Minimum mean conditional probability for a clustering edge.
    pub min_co_activation: f64,
    /// Cap on cluster members. At most [`MAX_LATENT_COMPONENTS`].
    pub max_cluster_size: usize,
    /// Neighbors added per expanded node.
    pub max_branching: usize,
    /// Semantically opposite traits, used for contradiction tolerance
    /// and tension.
    pub opposite_pairs: Vec<(TraitId, TraitId)>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            pattern_top_n: 10,
            min_cluster_size: 3,
            min_co_activation: 0.3,
            max_cluster_size: MAX_LATENT_COMPONENTS,
            max_branching: 3,
            opposite_pairs: default_opposite_pairs(),
        }
    }
}

/// The built-in opposite-pair table.
pub fn default_opposite_pairs() -> Vec<(TraitId, TraitId)> {
    [
        ("control_seeking", "trust_delegating"),
        ("social_energizing", "solitude_recharging"),
        ("structure_seeking", "spontaneity"),
        ("logical_analysis", "empathic_attunement"),
        ("risk_taking", "risk_averse"),
        ("novelty_seeking", "tradition_keeping"),
        ("assertive_expression", "reserved_expression"),
    ]
    .into_iter()
    .map(|(a, b)| (TraitId::from(a), TraitId::from(b)))
    .collect()
}

impl ProfileConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(Error::Config("profile.top_n must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.min_co_activation) {
            return Err(Error::Config(format!(
                "profile.min_co_activation must be in [0, 1], got {}",
                self.min_co_activation
            )));
        }
        if self.max_cluster_size == 0 || self.max_cluster_size > MAX_LATENT_COMPONENTS {
            return Err(Error::Config(format!(
                "profile.max_cluster_size must be in [1, {MAX_LATENT_COMPONENTS}], got {}",
                self.max_cluster_size
            )));
        }
        if self.min_cluster_size > self.max_cluster_size {
            return Err(Error::Config(format!(
                "profile.min_cluster_size {} exceeds max_cluster_size {}",
                self.min_cluster_size, self.max_cluster_size
            )));
        }
        if self.max_branching == 0 {
            return Err(Error::Config("profile.max_branching must be at least 1".into()));
        }
        if let Some((a, _)) = self.opposite_pairs.iter().find(|(a, b)| a == b) {
            return Err(Error::Config(format!("opposite pair ({a}, {a}) pairs a trait with itself")));
        }
        Ok(())
    }
}

// ============================================================================
// Response patterns
// ============================================================================

/// Which mirror pairs divide the latent-contradiction count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionDenominator {
    /// Every configured mirror pair. Comparable across subjects who
    /// skipped different questions.
    #[default]
    AllPairs,
    /// Only pairs where both vignettes were answered.
    AnsweredPairs,
}

/// Thresholds for [`ResponsePatternAnalyzer`](crate::patterns::ResponsePatternAnalyzer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Responses faster than this count as fast.
    pub fast_response_ms: u64,
    /// Responses slower than this count as latency spikes.
    pub slow_response_ms: u64,
    /// Hedging responses needed for `HedgingBias`.
    pub hedging_flag_min: usize,
    /// Responses with more than one change needed for `BacktrackPattern`.
    pub backtrack_flag_min: usize,
    /// Share of fast responses that raises `FastUniformResponses`.
    pub fast_uniform_ratio: f64,
    /// Social desirability above this raises `SocialDesirabilitySpike`.
    pub social_desirability_flag: f64,
    /// Latency spikes are "rare" up to this share of responses.
    pub latency_spike_max_ratio: f64,
    pub contradiction_denominator: ContradictionDenominator,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            fast_response_ms: 2_000,
            slow_response_ms: 30_000,
            hedging_flag_min: 3,
            backtrack_flag_min: 3,
            fast_uniform_ratio: 0.8,
            social_desirability_flag: 0.7,
            latency_spike_max_ratio: 0.2,
            contradiction_denominator: ContradictionDenominator::AllPairs,
        }
    }
}

impl PatternConfig {
    pub fn validate(&self) -> Result<()> {
        if self.fast_response_ms >= self.slow_response_ms {
            return Err(Error::Config(format!(
                "patterns.fast_response_ms ({}) must be below slow_response_ms ({})",
                self.fast_response_ms, self.slow_response_ms
            )));
        }
        for (name, v) in [
            ("fast_uniform_ratio", self.fast_uniform_ratio),
            ("social_desirability_flag", self.social_desirability_flag),
            ("latency_spike_max_ratio", self.latency_spike_max_ratio),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(Error::Config(format!("patterns.{name} must be in [0, 1], got {v}")));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Projection
// ============================================================================

/// Constants for [`CategoricalProjector`](crate::projection::CategoricalProjector).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Floor for the confidence denominator.
    pub epsilon: f64,
    /// Variant score at or above this picks the assertive variant.
    pub variant_threshold: f64,
    /// Weight of `(1 - change rate)` in the variant score.
    pub stability_weight: f64,
    /// Average response time below this earns the speed bonus.
    pub fast_average_ms: f64,
    /// Average response time above this costs the speed penalty.
    pub slow_average_ms: f64,
    pub speed_bonus: f64,
    /// Weight of `(1 - latent contradiction)` in the variant score.
    pub consistency_weight: f64,
    /// Composite cognitive-function score needed to report a sub-trait.
    pub sub_trait_threshold: f64,
    pub max_sub_traits: usize,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.1,
            variant_threshold: 2.0,
            stability_weight: 2.0,
            fast_average_ms: 8_000.0,
            slow_average_ms: 20_000.0,
            speed_bonus: 0.5,
            consistency_weight: 1.0,
            sub_trait_threshold: 2.0,
            max_sub_traits: 3,
        }
    }
}

impl ProjectionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.epsilon <= 0.0 {
            return Err(Error::Config(format!("projection.epsilon must be positive, got {}", self.epsilon)));
        }
        if self.fast_average_ms > self.slow_average_ms {
            return Err(Error::Config(format!(
                "projection.fast_average_ms ({}) exceeds slow_average_ms ({})",
                self.fast_average_ms, self.slow_average_ms
            )));
        }
        Ok(())
    }
}
