//! Profile analysis: metrics and clustering over a [`TraitManifold`].
//!
//! The analyzer borrows a manifold and never mutates it. Every ranking
//! sorts by strength (or count) descending and breaks ties by first-seen
//! order, so identical response sequences produce identical profiles.

mod latent;

use hashbrown::HashSet;

use crate::config::ProfileConfig;
use crate::manifold::{PairKey, TraitManifold};
use crate::model::*;
use latent::ClusterParams;

// ============================================================================
// ProfileAnalyzer
// ============================================================================

/// Read-only analysis pass over one session's manifold.
#[derive(Debug, Clone)]
pub struct ProfileAnalyzer<'m> {
    manifold: &'m TraitManifold,
    config: ProfileConfig,
}

impl<'m> ProfileAnalyzer<'m> {
    /// Analyzer with the default [`ProfileConfig`].
    pub fn new(manifold: &'m TraitManifold) -> Self {
        Self::with_config(manifold, ProfileConfig::default())
    }

    pub fn with_config(manifold: &'m TraitManifold, config: ProfileConfig) -> Self {
        Self { manifold, config }
    }

    pub fn manifold(&self) -> &TraitManifold {
        self.manifold
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    // ========================================================================
    // Rankings
    // ========================================================================

    /// Top `top_n` traits by total strength.
    pub fn dominant_traits(&self, top_n: usize) -> Vec<TraitStrength> {
        let mut ranked = self.all_traits();
        ranked.truncate(top_n);
        ranked
    }

    /// Every activated trait, strongest first.
    pub fn all_traits(&self) -> Vec<TraitStrength> {
        rank(
            self.manifold
                .traits()
                .iter()
                .map(|t| TraitStrength::new(t.clone(), self.manifold.total_strength(t.as_str())))
                .collect(),
        )
    }

    /// Top traits over activations whose context intersects `context`.
    ///
    /// Traits with no matching activation are left out.
    pub fn contextual_dominant_traits(&self, context: SituationalContext, top_n: usize) -> Vec<TraitStrength> {
        let mut ranked = self.contextual_traits(context);
        ranked.truncate(top_n);
        ranked
    }

    fn contextual_traits(&self, context: SituationalContext) -> Vec<TraitStrength> {
        rank(
            self.manifold
                .traits()
                .iter()
                .filter_map(|t| {
                    let mut matched = false;
                    let strength: f64 = self.manifold
                        .activations(t.as_str())
                        .iter()
                        .filter(|a| a.context.intersects(context))
                        .inspect(|_| matched = true)
                        .map(|a| a.strength)
                        .sum();
                    matched.then(|| TraitStrength::new(t.clone(), strength))
                })
                .collect(),
        )
    }

    /// Observed pairs ranked by raw count (not probability).
    pub fn co_activation_patterns(&self, top_n: usize) -> Vec<CoActivationPattern> {
        let mut patterns: Vec<CoActivationPattern> = self.manifold
            .pairs()
            .filter(|(_, count)| *count > 0)
            .map(|(key, count)| CoActivationPattern {
                trait_1: key.first().clone(),
                trait_2: key.second().clone(),
                count,
                probability: self.manifold.co_activation_probability(
                    key.first().as_str(),
                    key.second().as_str(),
                ),
            })
            .collect();
        patterns.sort_by(|a, b| b.count.cmp(&a.count));
        patterns.truncate(top_n);
        patterns
    }

    // ========================================================================
    // Metrics
    // ========================================================================

    /// Distinct traits with at least one activation.
    pub fn trait_diversity(&self) -> usize {
        self.manifold
            .traits()
            .iter()
            .filter(|t| self.manifold.activation_count(t.as_str()) > 0)
            .count()
    }

    /// Mean over traits of the population variance of each trait's
    /// strength across context buckets. 0 with fewer than two buckets.
    pub fn context_variance(&self) -> f64 {
        let contexts = self.manifold.contexts();
        let traits = self.manifold.traits();
        if contexts.len() < 2 || traits.is_empty() {
            return 0.0;
        }

        let total: f64 = traits
            .iter()
            .map(|t| {
                let values: Vec<f64> = contexts
                    .iter()
                    .map(|c| self.manifold.contextual_strength(t.as_str(), *c))
                    .collect();
                population_variance(&values)
            })
            .sum();
        total / traits.len() as f64
    }

    /// Mean co-occurrence count over opposite pairs that were observed.
    pub fn contradiction_tolerance(&self) -> f64 {
        let observed = self.observed_opposites();
        if observed.is_empty() {
            return 0.0;
        }
        let total: u32 = observed.iter().map(|(_, count)| count).sum();
        f64::from(total) / observed.len() as f64
    }

    /// Count-weighted mean of `sqrt(S(a) * S(b))` over observed opposite pairs.
    pub fn tension(&self) -> f64 {
        let observed = self.observed_opposites();
        let total_count: u32 = observed.iter().map(|(_, count)| count).sum();
        if total_count == 0 {
            return 0.0;
        }

        let weighted: f64 = observed
            .iter()
            .map(|(key, count)| {
                let product = self.manifold.total_strength(key.first().as_str())
                    * self.manifold.total_strength(key.second().as_str());
                product.max(0.0).sqrt() * f64::from(*count)
            })
            .sum();
        weighted / f64::from(total_count)
    }

    /// Opposite pairs with a non-zero count, each unordered pair once.
    fn observed_opposites(&self) -> Vec<(PairKey, u32)> {
        let mut seen = HashSet::new();
        self.config
            .opposite_pairs
            .iter()
            .filter_map(|(a, b)| PairKey::new(a, b))
            .filter(|key| seen.insert(key.clone()))
            .filter_map(|key| {
                let count = self.manifold.co_occurrence(key.first().as_str(), key.second().as_str());
                (count > 0).then_some((key, count))
            })
            .collect()
    }

    // ========================================================================
    // Latent traits
    // ========================================================================

    /// Cluster co-activating traits, using the configured cap and branching.
    pub fn discover_latent_traits(&self, min_cluster_size: usize, min_co_activation: f64) -> Vec<LatentTrait> {
        latent::discover(
            self.manifold,
            &self.all_traits(),
            ClusterParams {
                min_size: min_cluster_size,
                min_co_activation,
                max_size: self.config.max_cluster_size,
                max_branching: self.config.max_branching,
            },
        )
    }

    /// [`discover_latent_traits`](Self::discover_latent_traits) with the
    /// configured thresholds.
    pub fn latent_traits(&self) -> Vec<LatentTrait> {
        self.discover_latent_traits(self.config.min_cluster_size, self.config.min_co_activation)
    }

    // ========================================================================
    // Profile
    // ========================================================================

    /// Assemble the immutable [`Profile`] snapshot.
    pub fn generate_profile(&self) -> Profile {
        let all_traits = self.all_traits();
        let top_n = self.config.top_n;

        let contextual_all: Vec<ContextualTraits> = SituationalContext::TAGS
            .into_iter()
            .map(|context| ContextualTraits { context, traits: self.contextual_traits(context) })
            .filter(|c| !c.traits.is_empty())
            .collect();
        let contextual_dominant = contextual_all
            .iter()
            .map(|c| ContextualTraits {
                context: c.context,
                traits: c.traits.iter().take(top_n).cloned().collect(),
            })
            .collect();

        let profile = Profile {
            dominant_traits: all_traits.iter().take(top_n).cloned().collect(),
            contextual_dominant,
            contextual_all,
            co_activation_patterns: self.co_activation_patterns(self.config.pattern_top_n),
            trait_diversity: self.trait_diversity(),
            context_variance: self.context_variance(),
            contradiction_tolerance: self.contradiction_tolerance(),
            tension: self.tension(),
            latent_traits: latent::discover(
                self.manifold,
                &all_traits,
                ClusterParams {
                    min_size: self.config.min_cluster_size,
                    min_co_activation: self.config.min_co_activation,
                    max_size: self.config.max_cluster_size,
                    max_branching: self.config.max_branching,
                },
            ),
            response_count: self.manifold.response_count(),
            all_traits,
        };

        tracing::debug!(
            responses = profile.response_count,
            diversity = profile.trait_diversity,
            latent = profile.latent_traits.len(),
            tension = profile.tension,
            "generated profile"
        );
        profile
    }
}

/// Stable sort, strongest first; equal strengths keep input order.
fn rank(mut traits: Vec<TraitStrength>) -> Vec<TraitStrength> {
    traits.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    traits
}

fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

// ============================================================================
// Tests
// ============================================================================
