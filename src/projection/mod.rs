//! Categorical projection: the lossy reduction of a profile to a
//! four-letter type code.
//!
//! ```text
//! Profile ──► 4 axes (weighted sums, pick larger side, tie → default letter)
//!         ──► per-axis confidence = |a - b| / max(a + b, ε)
//! MetaScores ──► variant: A (assertive) or T (turbulent)
//! Profile ──► cognitive-function composites minus the type's own two
//!         ──► up to 3 sub-traits above threshold
//! ```
//!
//! The projector keeps no state between calls. Scoring policy lives in
//! [`weights`].

pub mod weights;

use serde::{Deserialize, Serialize};

use crate::config::ProjectionConfig;
use crate::model::{MetaScores, Profile};
use crate::{Error, Result};
pub use weights::{CognitiveFunction, WeightTerm, AXES, FUNCTIONS};

// ============================================================================
// Output types
// ============================================================================

/// Scores and the chosen letter for one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisScore {
    pub axis: String,
    pub letter: char,
    pub first_score: f64,
    pub second_score: f64,
    /// In `[0, 1]`.
    pub confidence: f64,
}

/// Secondary classification from how the subject answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    Assertive,
    Turbulent,
}

impl Variant {
    pub fn letter(self) -> char {
        match self {
            Variant::Assertive => 'A',
            Variant::Turbulent => 'T',
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Variant::Assertive => "Settled self-view: answers held steady and consistent",
            Variant::Turbulent => "Unsettled self-view: answers revised or inconsistent",
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A sub-dominant cognitive pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubTrait {
    pub function: CognitiveFunction,
    pub score: f64,
    pub description: String,
}

/// Result of projecting one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Four letters, e.g. `"INTJ"`.
    pub type_code: String,
    pub axes: Vec<AxisScore>,
    pub variant: Option<Variant>,
    pub variant_score: Option<f64>,
    pub sub_traits: Vec<SubTrait>,
}

impl Projection {
    /// Type code with the variant suffix when present, e.g. `"INTJ-A"`.
    pub fn full_code(&self) -> String {
        match self.variant {
            Some(v) => format!("{}-{}", self.type_code, v.letter()),
            None => self.type_code.clone(),
        }
    }

    /// Mean confidence over the four axes.
    pub fn overall_confidence(&self) -> f64 {
        if self.axes.is_empty() {
            return 0.0;
        }
        self.axes.iter().map(|a| a.confidence).sum::<f64>() / self.axes.len() as f64
    }
}

// ============================================================================
// CategoricalProjector
// ============================================================================

/// Projects profiles to type codes.
#[derive(Debug, Clone, Default)]
pub struct CategoricalProjector {
    config: ProjectionConfig,
}

impl CategoricalProjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Project a profile, folding in meta-scores for the variant when given.
    ///
    /// Fails with [`Error::InsufficientData`] when no response fed the profile.
    pub fn project(&self, profile: &Profile, meta: Option<&MetaScores>) -> Result<Projection> {
        if profile.is_empty() {
            return Err(Error::InsufficientData(
                "cannot project a profile with no recorded responses".into(),
            ));
        }

        let axes = self.axis_scores(profile);
        let type_code: String = axes.iter().map(|a| a.letter).collect();
        let variant_score = meta.map(|m| self.variant_score(m));
        let variant = variant_score.map(|s| self.variant_for(s));
        let sub_traits = self.sub_traits(profile, &type_code);

        tracing::debug!(
            %type_code,
            variant = ?variant,
            sub_traits = sub_traits.len(),
            "projected profile"
        );

        Ok(Projection { type_code, axes, variant, variant_score, sub_traits })
    }

    /// Score all four axes.
    pub fn axis_scores(&self, profile: &Profile) -> Vec<AxisScore> {
        AXES.iter()
            .map(|axis| {
                let a = weights::score(axis.first.terms, profile);
                let b = weights::score(axis.second.terms, profile);
                let letter = if a > b {
                    axis.first.letter
                } else if b > a {
                    axis.second.letter
                } else {
                    axis.tie
                };
                AxisScore {
                    axis: axis.name.to_string(),
                    letter,
                    first_score: a,
                    second_score: b,
                    confidence: self.confidence(a, b),
                }
            })
            .collect()
    }

    /// `|a - b| / max(a + b, ε)`, clamped to `[0, 1]`.
    pub fn confidence(&self, a: f64, b: f64) -> f64 {
        ((a - b).abs() / (a + b).max(self.config.epsilon)).clamp(0.0, 1.0)
    }

    /// Weighted stability + speed + mirror consistency.
    pub fn variant_score(&self, meta: &MetaScores) -> f64 {
        let c = &self.config;
        let speed = if meta.average_response_ms < c.fast_average_ms {
            c.speed_bonus
        } else if meta.average_response_ms > c.slow_average_ms {
            -c.speed_bonus
        } else {
            0.0
        };
        c.stability_weight * (1.0 - meta.change_rate)
            + speed
            + c.consistency_weight * (1.0 - meta.latent_contradiction)
    }

    pub fn variant_for(&self, score: f64) -> Variant {
        if score >= self.config.variant_threshold {
            Variant::Assertive
        } else {
            Variant::Turbulent
        }
    }

    /// Dominant and auxiliary functions of a four-letter type code.
    pub fn function_stack(type_code: &str) -> Option<(CognitiveFunction, CognitiveFunction)> {
        let letters: Vec<char> = type_code.chars().collect();
        let &[energy, perceiving, judging, structure] = letters.as_slice() else {
            return None;
        };
        // The judging function faces outward for J types, the perceiving one for P types.
        let (outer, inner) = match structure {
            'J' => (
                CognitiveFunction::from_letter(judging, true)?,
                CognitiveFunction::from_letter(perceiving, false)?,
            ),
            'P' => (
                CognitiveFunction::from_letter(perceiving, true)?,
                CognitiveFunction::from_letter(judging, false)?,
            ),
            _ => return None,
        };
        match energy {
            'E' => Some((outer, inner)),
            'I' => Some((inner, outer)),
            _ => None,
        }
    }

    /// Composite function scores, excluding the type's dominant and
    /// auxiliary functions, above threshold, strongest first.
    pub fn sub_traits(&self, profile: &Profile, type_code: &str) -> Vec<SubTrait> {
        let stack = Self::function_stack(type_code);
        let mut found: Vec<SubTrait> = FUNCTIONS
            .iter()
            .filter(|f| stack.is_none_or(|(dom, aux)| f.function != dom && f.function != aux))
            .map(|f| SubTrait {
                function: f.function,
                score: weights::score(f.terms, profile),
                description: f.function.description().to_string(),
            })
            .filter(|s| s.score > self.config.sub_trait_threshold)
            .collect();
        found.sort_by(|a, b| b.score.total_cmp(&a.score));
        found.truncate(self.config.max_sub_traits);
        found
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContextualTraits, SituationalContext, TraitStrength};

    fn profile(traits: &[(&str, f64)]) -> Profile {
        let all_traits: Vec<TraitStrength> =
            traits.iter().map(|(t, s)| TraitStrength::new(*t, *s)).collect();
        Profile {
            dominant_traits: all_traits.iter().take(5).cloned().collect(),
            all_traits,
            contextual_dominant: Vec::new(),
            contextual_all: Vec::<ContextualTraits>::new(),
            co_activation_patterns: Vec::new(),
            trait_diversity: traits.len(),
            context_variance: 0.0,
            contradiction_tolerance: 0.0,
            tension: 0.0,
            latent_traits: Vec::new(),
            response_count: traits.len().max(1),
        }
    }

    fn meta(change_rate: f64, avg_ms: f64, contradiction: f64) -> MetaScores {
        MetaScores {
            change_rate,
            average_response_ms: avg_ms,
            latent_contradiction: contradiction,
            ..MetaScores::neutral()
        }
    }

    #[test]
    fn test_empty_profile_is_insufficient() {
        let mut p = profile(&[]);
        p.response_count = 0;
        let err = CategoricalProjector::new().project(&p, None).unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));
    }

    #[test]
    fn test_clear_type() {
        let p = profile(&[
            ("social_energizing", 3.0),
            ("abstract_pattern", 2.0),
            ("logical_analysis", 2.5),
            ("structure_seeking", 1.5),
        ]);
        let projection = CategoricalProjector::new().project(&p, None).unwrap();
        assert_eq!(projection.type_code, "ENTJ");
        assert!(projection.axes.iter().all(|a| (a.confidence - 1.0).abs() < 1e-12));
        assert_eq!(projection.variant, None);
        assert_eq!(projection.full_code(), "ENTJ");
    }

    #[test]
    fn test_ties_use_default_letters() {
        // One unrelated trait: every axis is 0 vs 0.
        let p = profile(&[("unrelated", 1.0)]);
        let projection = CategoricalProjector::new().project(&p, None).unwrap();
        assert_eq!(projection.type_code, "INFP");
        assert!(projection.axes.iter().all(|a| a.confidence == 0.0));
    }

    #[test]
    fn test_confidence_formula() {
        let projector = CategoricalProjector::new();
        assert!((projector.confidence(3.0, 1.0) - 0.5).abs() < 1e-12);
        assert_eq!(projector.confidence(0.0, 0.0), 0.0);
        // Denominator floors at epsilon.
        assert!((projector.confidence(0.05, 0.0) - 0.5).abs() < 1e-12);
        // Negative strengths still clamp into range.
        assert_eq!(projector.confidence(1.0, -1.0), 1.0);
    }

    #[test]
    fn test_variant_threshold() {
        let projector = CategoricalProjector::new();
        // 2.0 * 1.0 + 0.5 + 1.0 = 3.5
        let steady = projector.variant_score(&meta(0.0, 5_000.0, 0.0));
        assert!((steady - 3.5).abs() < 1e-12);
        assert_eq!(projector.variant_for(steady), Variant::Assertive);

        // 2.0 * 0.5 - 0.5 + 0.5 = 1.0
        let shaky = projector.variant_score(&meta(0.5, 25_000.0, 0.5));
        assert!((shaky - 1.0).abs() < 1e-12);
        assert_eq!(projector.variant_for(shaky), Variant::Turbulent);

        // 2.0 * 0.5 + 0.0 + 1.0 = 2.0, exactly at threshold
        let edge = projector.variant_score(&meta(0.5, 10_000.0, 0.0));
        assert_eq!(projector.variant_for(edge), Variant::Assertive);
    }

    #[test]
    fn test_variant_in_projection() {
        let p = profile(&[("solitude_recharging", 1.0)]);
        let projection = CategoricalProjector::new()
            .project(&p, Some(&meta(0.0, 4_000.0, 0.0)))
            .unwrap();
        assert_eq!(projection.variant, Some(Variant::Assertive));
        assert_eq!(projection.full_code(), "INFP-A");
    }

    #[test]
    fn test_function_stacks() {
        use CognitiveFunction::*;
        assert_eq!(CategoricalProjector::function_stack("INTJ"), Some((Ni, Te)));
        assert_eq!(CategoricalProjector::function_stack("ENFP"), Some((Ne, Fi)));
        assert_eq!(CategoricalProjector::function_stack("ISFJ"), Some((Si, Fe)));
        assert_eq!(CategoricalProjector::function_stack("ESTP"), Some((Se, Ti)));
        assert_eq!(CategoricalProjector::function_stack("XXXX"), None);
        assert_eq!(CategoricalProjector::function_stack("INT"), None);
    }

    #[test]
    fn test_sub_traits_exclude_own_stack() {
        let p = profile(&[
            ("future_orientation", 3.0),  // Ni
            ("planning_ahead", 3.0),      // Te
            ("harmony_seeking", 2.5),     // Fe
            ("risk_taking", 2.2),         // Se
            ("novelty_seeking", 1.0),     // Ne, below threshold
        ]);
        let subs = CategoricalProjector::new().sub_traits(&p, "INTJ");
        let functions: Vec<CognitiveFunction> = subs.iter().map(|s| s.function).collect();
        assert_eq!(functions, vec![CognitiveFunction::Fe, CognitiveFunction::Se]);
        assert!(subs[0].score > subs[1].score);
    }

    #[test]
    fn test_sub_traits_capped_at_three() {
        let p = profile(&[
            ("novelty_seeking", 5.0),
            ("risk_taking", 5.0),
            ("tradition_keeping", 5.0),
            ("harmony_seeking", 5.0),
            ("values_driven", 5.0),
        ]);
        let subs = CategoricalProjector::new().sub_traits(&p, "INTJ");
        assert_eq!(subs.len(), 3);
        assert!(subs.iter().all(|s| s.score > 2.0));
    }

    #[test]
    fn test_contextual_terms_shift_axis() {
        let mut p = profile(&[("social_energizing", 1.0), ("solitude_recharging", 1.0)]);
        p.contextual_all = vec![ContextualTraits {
            context: SituationalContext::SOCIAL,
            traits: vec![TraitStrength::new("social_energizing", 1.0)],
        }];
        let axes = CategoricalProjector::new().axis_scores(&p);
        assert_eq!(axes[0].letter, 'E');
        assert!((axes[0].first_score - 1.5).abs() < 1e-12);
        assert!((axes[0].confidence - 0.2).abs() < 1e-12);
    }
}
