//! Response-pattern analysis: meta-scores and gaming/consistency flags.
//!
//! Pure functions of the finalized response history and the mirror-pair
//! definitions. Nothing here looks at the trait manifold.
//!
//! ## Policies
//!
//! - **Response confidence** is latency-aware:
//!   `(1 - change_ratio) * (1 - 0.5 * latency_spike_ratio)`.
//! - **Latent contradiction** divides by every mirror pair by default;
//!   [`ContradictionDenominator::AnsweredPairs`] divides by answered pairs.
//! - Asymmetry pairs are never contradictions. They feed theory-of-mind bias.

pub mod rules;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::config::{ContradictionDenominator, PatternConfig};
use crate::model::*;
pub use rules::{
    Attribution, AttributionLabel, HedgingRule, IdPattern, IdealAnswer, PatternRules,
};

/// Flags raised for one response history, in declaration order.
pub type FlagSet = SmallVec<[ResponseFlag; 4]>;

/// Response confidence loses up to this share to latency spikes.
const LATENCY_CONFIDENCE_PENALTY: f64 = 0.5;
/// Extra dissonance weight per edit on either side of a contradiction.
const DISSONANCE_PER_CHANGE: f64 = 0.2;
/// Dissonance multiplier for polar-opposite contradictions.
const DISSONANCE_POLAR: f64 = 1.5;

/// How one mirror pair was answered.
#[derive(Debug, Clone)]
struct PairOutcome<'a> {
    pair: &'a MirrorPair,
    answers: Option<(&'a VignetteResponse, &'a VignetteResponse)>,
    contradictory: bool,
    polar: bool,
    asymmetric: bool,
}

// ============================================================================
// ResponsePatternAnalyzer
// ============================================================================

/// Meta-score analysis over one finalized response history.
#[derive(Debug, Clone)]
pub struct ResponsePatternAnalyzer<'a> {
    responses: &'a [VignetteResponse],
    mirror_pairs: &'a [MirrorPair],
    rules: PatternRules,
    config: PatternConfig,
    by_vignette: HashMap<&'a str, &'a VignetteResponse>,
}

impl<'a> ResponsePatternAnalyzer<'a> {
    /// Analyzer with default rules and thresholds.
    pub fn new(responses: &'a [VignetteResponse], mirror_pairs: &'a [MirrorPair]) -> Self {
        Self::with_rules(responses, mirror_pairs, PatternRules::default(), PatternConfig::default())
    }

    pub fn with_rules(
        responses: &'a [VignetteResponse],
        mirror_pairs: &'a [MirrorPair],
        rules: PatternRules,
        config: PatternConfig,
    ) -> Self {
        // A vignette answered twice keeps its last response.
        let by_vignette = responses
            .iter()
            .map(|r| (r.vignette_id.as_str(), r))
            .collect();
        Self { responses, mirror_pairs, rules, config, by_vignette }
    }

    pub fn rules(&self) -> &PatternRules {
        &self.rules
    }

    fn total(&self) -> usize {
        self.responses.len()
    }

    fn fraction(&self, count: usize) -> f64 {
        if self.responses.is_empty() {
            return 0.0;
        }
        count as f64 / self.total() as f64
    }

    // ========================================================================
    // Response-level scores
    // ========================================================================

    /// `changed / total`; 0 with no responses.
    pub fn change_rate(&self) -> f64 {
        self.fraction(self.responses.iter().filter(|r| r.changed).count())
    }

    /// `1 - change_rate`; 0.5 with no responses.
    pub fn self_model_stability(&self) -> f64 {
        if self.responses.is_empty() {
            return 0.5;
        }
        1.0 - self.change_rate()
    }

    pub fn hedging_count(&self) -> usize {
        self.responses.iter().filter(|r| self.rules.is_hedging(r)).count()
    }

    pub fn hedging_tendency(&self) -> f64 {
        self.fraction(self.hedging_count())
    }

    pub fn social_desirability(&self) -> f64 {
        self.fraction(
            self.responses
                .iter()
                .filter(|r| self.rules.is_socially_desirable(r))
                .count(),
        )
    }

    /// Among edited responses, the share that softened an assertive answer.
    pub fn impression_management(&self) -> f64 {
        let changed: Vec<&VignetteResponse> = self.responses.iter().filter(|r| r.changed).collect();
        if changed.is_empty() {
            return 0.0;
        }
        let softened = changed
            .iter()
            .filter(|r| {
                r.previous_label
                    .as_deref()
                    .is_some_and(|prev| self.rules.is_softening(prev, &r.option_label))
            })
            .count();
        softened as f64 / changed.len() as f64
    }

    pub fn average_response_ms(&self) -> f64 {
        if self.responses.is_empty() {
            return 0.0;
        }
        self.responses.iter().map(|r| r.elapsed_ms as f64).sum::<f64>() / self.total() as f64
    }

    /// Share of responses slower than the slow threshold.
    pub fn latency_spike_ratio(&self) -> f64 {
        self.fraction(
            self.responses
                .iter()
                .filter(|r| r.elapsed_ms > self.config.slow_response_ms)
                .count(),
        )
    }

    /// Latency-aware confidence; 0.5 with no responses.
    pub fn response_confidence(&self) -> f64 {
        if self.responses.is_empty() {
            return 0.5;
        }
        (1.0 - self.change_rate()) * (1.0 - LATENCY_CONFIDENCE_PENALTY * self.latency_spike_ratio())
    }

    // ========================================================================
    // Mirror-pair scores
    // ========================================================================

    fn outcomes(&self) -> Vec<PairOutcome<'a>> {
        self.mirror_pairs
            .iter()
            .map(|pair| {
                let answers = match (
                    self.by_vignette.get(pair.vignette_1.as_str()),
                    self.by_vignette.get(pair.vignette_2.as_str()),
                ) {
                    (Some(&a), Some(&b)) => Some((a, b)),
                    _ => None,
                };
                let (contradictory, polar, asymmetric) = match answers {
                    Some((a, b)) => {
                        let polar = self.rules.are_polar(&a.option_label, &b.option_label);
                        let contradictory = match pair.expected {
                            ExpectedCorrelation::Positive => polar,
                            ExpectedCorrelation::Negative => a.option_label == b.option_label,
                            ExpectedCorrelation::Asymmetry => false,
                        };
                        let asymmetric = pair.expected == ExpectedCorrelation::Asymmetry
                            && self.rules.attribution(&a.option_label) == Some(Attribution::Situational)
                            && self.rules.attribution(&b.option_label) == Some(Attribution::Dispositional);
                        (contradictory, polar, asymmetric)
                    }
                    None => (false, false, false),
                };
                PairOutcome { pair, answers, contradictory, polar, asymmetric }
            })
            .collect()
    }

    /// Asymmetry pairs answered situational for self, dispositional for others,
    /// over all asymmetry pairs.
    pub fn theory_of_mind_bias(&self) -> f64 {
        let outcomes = self.outcomes();
        let asymmetry_pairs = outcomes
            .iter()
            .filter(|o| o.pair.expected == ExpectedCorrelation::Asymmetry)
            .count();
        if asymmetry_pairs == 0 {
            return 0.0;
        }
        let asymmetric = outcomes.iter().filter(|o| o.asymmetric).count();
        asymmetric as f64 / asymmetry_pairs as f64
    }

    /// Share of mirror pairs whose answers violate the expected correlation.
    pub fn latent_contradiction(&self) -> f64 {
        let outcomes = self.outcomes();
        let violated = outcomes.iter().filter(|o| o.contradictory).count();
        let denominator = match self.config.contradiction_denominator {
            ContradictionDenominator::AllPairs => outcomes.len(),
            ContradictionDenominator::AnsweredPairs => {
                outcomes.iter().filter(|o| o.answers.is_some()).count()
            }
        };
        if denominator == 0 {
            return 0.0;
        }
        violated as f64 / denominator as f64
    }

    /// Contradictions weighted by edit churn and extremity, over all pairs.
    pub fn cognitive_dissonance(&self) -> f64 {
        let outcomes = self.outcomes();
        if outcomes.is_empty() {
            return 0.0;
        }
        let weighted: f64 = outcomes
            .iter()
            .filter(|o| o.contradictory)
            .filter_map(|o| o.answers.map(|answers| (answers, o.polar)))
            .map(|((a, b), polar)| {
                let churn = 1.0 + DISSONANCE_PER_CHANGE * f64::from(a.change_count + b.change_count);
                let extremity = if polar { DISSONANCE_POLAR } else { 1.0 };
                churn * extremity
            })
            .sum();
        weighted / outcomes.len() as f64
    }

    // ========================================================================
    // Aggregates
    // ========================================================================

    /// Every meta-score at once.
    pub fn analyze(&self) -> MetaScores {
        if self.responses.is_empty() && self.mirror_pairs.is_empty() {
            return MetaScores::neutral();
        }
        MetaScores {
            self_model_stability: self.self_model_stability(),
            hedging_tendency: self.hedging_tendency(),
            social_desirability: self.social_desirability(),
            theory_of_mind_bias: self.theory_of_mind_bias(),
            impression_management: self.impression_management(),
            latent_contradiction: self.latent_contradiction(),
            response_confidence: self.response_confidence(),
            cognitive_dissonance: self.cognitive_dissonance(),
            change_rate: self.change_rate(),
            average_response_ms: self.average_response_ms(),
            latency_spike_ratio: self.latency_spike_ratio(),
        }
    }

    /// Independent diagnostic rules; any subset may fire.
    pub fn detect_flags(&self) -> FlagSet {
        let outcomes = self.outcomes();
        let mut flags = FlagSet::new();

        if outcomes.iter().any(|o| o.contradictory) {
            flags.push(ResponseFlag::LatentContradiction);
        }
        if self.hedging_count() >= self.config.hedging_flag_min {
            flags.push(ResponseFlag::HedgingBias);
        }
        if self.social_desirability() > self.config.social_desirability_flag {
            flags.push(ResponseFlag::SocialDesirabilitySpike);
        }
        if outcomes.iter().any(|o| o.asymmetric) {
            flags.push(ResponseFlag::SelfOtherAsymmetry);
        }
        let spikes = self.latency_spike_ratio();
        if spikes > 0.0 && spikes <= self.config.latency_spike_max_ratio {
            flags.push(ResponseFlag::ResponseLatencySpike);
        }
        let backtracks = self.responses.iter().filter(|r| r.change_count > 1).count();
        if backtracks >= self.config.backtrack_flag_min {
            flags.push(ResponseFlag::BacktrackPattern);
        }
        let fast = self
            .responses
            .iter()
            .filter(|r| r.elapsed_ms < self.config.fast_response_ms)
            .count();
        if !self.responses.is_empty() && self.fraction(fast) >= self.config.fast_uniform_ratio {
            flags.push(ResponseFlag::FastUniformResponses);
        }

        if !flags.is_empty() {
            tracing::debug!(?flags, responses = self.total(), "response flags raised");
        }
        flags
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn answered(id: &str, label: &str) -> VignetteResponse {
        VignetteResponse::new(id, label, 5_000)
    }

    #[test]
    fn test_empty_history_is_neutral() {
        let analyzer = ResponsePatternAnalyzer::new(&[], &[]);
        assert_eq!(analyzer.self_model_stability(), 0.5);
        assert_eq!(analyzer.response_confidence(), 0.5);
        assert_eq!(analyzer.latent_contradiction(), 0.0);
        assert_eq!(analyzer.theory_of_mind_bias(), 0.0);
        assert_eq!(analyzer.analyze(), MetaScores::neutral());
        assert!(analyzer.detect_flags().is_empty());
    }

    #[test]
    fn test_no_mirror_pairs_means_no_contradiction() {
        let responses = vec![answered("w1", "A"), answered("w2", "C")];
        let analyzer = ResponsePatternAnalyzer::new(&responses, &[]);
        assert_eq!(analyzer.latent_contradiction(), 0.0);
        assert_eq!(analyzer.theory_of_mind_bias(), 0.0);
        assert_eq!(analyzer.cognitive_dissonance(), 0.0);
    }

    #[test]
    fn test_stability_and_change_rate() {
        let responses = vec![
            answered("w1", "A"),
            answered("w2", "B").with_change("A", 1),
            answered("w3", "C"),
            answered("w4", "C").with_change("B", 2),
        ];
        let analyzer = ResponsePatternAnalyzer::new(&responses, &[]);
        assert!(approx(analyzer.change_rate(), 0.5));
        assert!(approx(analyzer.self_model_stability(), 0.5));
        assert!(approx(analyzer.impression_management(), 0.5));
    }

    #[test]
    fn test_hedging_and_social_desirability() {
        let mut rules = PatternRules::default();
        rules.ideal_answers.push(IdealAnswer { vignette_id: "s1".into(), label: "A".into() });
        let responses = vec![
            answered("dilemma_1", "B"),
            answered("dilemma_2", "B"),
            answered("w1", "D"),
            answered("s1", "A"),
        ];
        let analyzer = ResponsePatternAnalyzer::with_rules(&responses, &[], rules, PatternConfig::default());
        assert_eq!(analyzer.hedging_count(), 3);
        assert!(approx(analyzer.hedging_tendency(), 0.75));
        assert!(approx(analyzer.social_desirability(), 0.25));
        assert!(analyzer.detect_flags().contains(&ResponseFlag::HedgingBias));
    }

    #[test]
    fn test_contradiction_rules_per_correlation() {
        let responses = vec![
            answered("p1", "A"), answered("p2", "C"),   // positive, polar: violated
            answered("n1", "B"), answered("n2", "B"),   // negative, same: violated
            answered("q1", "A"), answered("q2", "B"),   // positive, not polar: fine
            answered("s1", "C"), answered("o1", "A"),   // asymmetry: never violated
        ];
        let pairs = vec![
            MirrorPair::new("p1", "p2", "x", ExpectedCorrelation::Positive),
            MirrorPair::new("n1", "n2", "x", ExpectedCorrelation::Negative),
            MirrorPair::new("q1", "q2", "x", ExpectedCorrelation::Positive),
            MirrorPair::new("s1", "o1", "x", ExpectedCorrelation::Asymmetry),
        ];
        let analyzer = ResponsePatternAnalyzer::new(&responses, &pairs);
        assert!(approx(analyzer.latent_contradiction(), 0.5));
        assert!(approx(analyzer.theory_of_mind_bias(), 1.0));

        let flags = analyzer.detect_flags();
        assert!(flags.contains(&ResponseFlag::LatentContradiction));
        assert!(flags.contains(&ResponseFlag::SelfOtherAsymmetry));
    }

    #[test]
    fn test_contradiction_denominator_on_partial_answers() {
        // Two pairs; only the first fully answered, and it is violated.
        let responses = vec![answered("n1", "A"), answered("n2", "A"), answered("m1", "C")];
        let pairs = vec![
            MirrorPair::new("n1", "n2", "x", ExpectedCorrelation::Negative),
            MirrorPair::new("m1", "m2", "x", ExpectedCorrelation::Negative),
        ];

        let all = ResponsePatternAnalyzer::new(&responses, &pairs);
        assert!(approx(all.latent_contradiction(), 0.5));

        let config = PatternConfig {
            contradiction_denominator: ContradictionDenominator::AnsweredPairs,
            ..Default::default()
        };
        let answered_only =
            ResponsePatternAnalyzer::with_rules(&responses, &pairs, PatternRules::default(), config);
        assert!(approx(answered_only.latent_contradiction(), 1.0));
    }

    #[test]
    fn test_answered_denominator_with_nothing_answered() {
        let pairs = vec![MirrorPair::new("n1", "n2", "x", ExpectedCorrelation::Negative)];
        let config = PatternConfig {
            contradiction_denominator: ContradictionDenominator::AnsweredPairs,
            ..Default::default()
        };
        let analyzer = ResponsePatternAnalyzer::with_rules(&[], &pairs, PatternRules::default(), config);
        assert_eq!(analyzer.latent_contradiction(), 0.0);
    }

    #[test]
    fn test_theory_of_mind_counts_unanswered_asymmetry_pairs() {
        let responses = vec![answered("self_1", "C"), answered("other_1", "A")];
        let pairs = vec![
            MirrorPair::new("self_1", "other_1", "x", ExpectedCorrelation::Asymmetry),
            MirrorPair::new("self_2", "other_2", "x", ExpectedCorrelation::Asymmetry),
            MirrorPair::new("self_1", "other_1", "x", ExpectedCorrelation::Positive),
        ];
        let analyzer = ResponsePatternAnalyzer::new(&responses, &pairs);
        assert!(approx(analyzer.theory_of_mind_bias(), 0.5));
    }

    #[test]
    fn test_cognitive_dissonance_weights() {
        let responses = vec![
            answered("p1", "A").with_change("B", 2),
            answered("p2", "C").with_change("B", 1),
            answered("n1", "B"),
            answered("n2", "B"),
        ];
        let pairs = vec![
            MirrorPair::new("p1", "p2", "x", ExpectedCorrelation::Positive),
            MirrorPair::new("n1", "n2", "x", ExpectedCorrelation::Negative),
            MirrorPair::new("z1", "z2", "x", ExpectedCorrelation::Positive),
            MirrorPair::new("z3", "z4", "x", ExpectedCorrelation::Negative),
        ];
        // p: (1 + 0.2 * 3) * 1.5 = 2.4; n: (1 + 0) * 1.0 = 1.0; over 4 pairs
        let analyzer = ResponsePatternAnalyzer::new(&responses, &pairs);
        assert!(approx(analyzer.cognitive_dissonance(), 3.4 / 4.0));
    }

    #[test]
    fn test_latency_aware_confidence() {
        let mut responses: Vec<VignetteResponse> =
            (0..9).map(|i| answered(&format!("w{i}"), "A")).collect();
        responses.push(VignetteResponse::new("slow", "A", 45_000));
        responses[0] = answered("w0", "B").with_change("A", 1);

        let analyzer = ResponsePatternAnalyzer::new(&responses, &[]);
        assert!(approx(analyzer.latency_spike_ratio(), 0.1));
        // (1 - 0.1) * (1 - 0.5 * 0.1)
        assert!(approx(analyzer.response_confidence(), 0.9 * 0.95));
        assert!(analyzer.detect_flags().contains(&ResponseFlag::ResponseLatencySpike));
    }

    #[test]
    fn test_uniformly_slow_is_not_a_spike() {
        let responses: Vec<VignetteResponse> = (0..4)
            .map(|i| VignetteResponse::new(format!("w{i}"), "A", 40_000))
            .collect();
        let analyzer = ResponsePatternAnalyzer::new(&responses, &[]);
        assert!(approx(analyzer.latency_spike_ratio(), 1.0));
        assert!(!analyzer.detect_flags().contains(&ResponseFlag::ResponseLatencySpike));
    }

    #[test]
    fn test_fast_uniform_and_backtrack_flags() {
        let mut responses: Vec<VignetteResponse> = (0..5)
            .map(|i| VignetteResponse::new(format!("w{i}"), "A", 800))
            .collect();
        for r in responses.iter_mut().take(3) {
            *r = r.clone().with_change("C", 2);
        }

        let flags = ResponsePatternAnalyzer::new(&responses, &[]).detect_flags();
        assert_eq!(
            flags.as_slice(),
            &[ResponseFlag::BacktrackPattern, ResponseFlag::FastUniformResponses]
        );
    }

    #[test]
    fn test_social_desirability_spike() {
        let mut rules = PatternRules::default();
        for id in ["s1", "s2", "s3", "s4"] {
            rules.ideal_answers.push(IdealAnswer { vignette_id: id.into(), label: "A".into() });
        }
        let responses = vec![
            answered("s1", "A"), answered("s2", "A"), answered("s3", "A"), answered("s4", "B"),
        ];
        let analyzer = ResponsePatternAnalyzer::with_rules(&responses, &[], rules, PatternConfig::default());
        assert!(approx(analyzer.social_desirability(), 0.75));
        assert!(analyzer.detect_flags().contains(&ResponseFlag::SocialDesirabilitySpike));
    }
}
