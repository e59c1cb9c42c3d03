//! Sparse multi-hot trait accumulator.
//!
//! The manifold is pure bookkeeping: every answered question calls
//! [`TraitManifold::record`] once with the chosen option's trait activations
//! and the question's context. Nothing is normalized, clamped or validated.
//!
//! ## Layout
//!
//! - **Sparse vector**: trait → activations in response order
//! - **Context profiles**: context → (trait → accumulated strength)
//! - **Co-occurrence**: canonical pair → number of responses activating both
//!
//! First-seen order of traits, contexts and pairs is tracked alongside the
//! hash maps. Every ranking built on top of the manifold breaks ties by that
//! order, so two manifolds fed the same responses rank identically.
//!
//! A manifold belongs to exactly one session. It holds no locks; hosts
//! running many sessions give each its own instance.

pub mod pair;

use hashbrown::HashMap;

use crate::model::{Activation, SituationalContext, TraitId};
pub use pair::PairKey;

// ============================================================================
// TraitManifold
// ============================================================================

/// Session-scoped sparse accumulator of trait activations.
#[derive(Debug, Clone, Default)]
pub struct TraitManifold {
    sparse_vector: HashMap<TraitId, Vec<Activation>>,
    context_profiles: HashMap<SituationalContext, HashMap<TraitId, f64>>,
    co_occurrence: HashMap<PairKey, u32>,
    /// Traits in first-seen order.
    trait_order: Vec<TraitId>,
    /// Non-empty contexts in first-seen order.
    context_order: Vec<SituationalContext>,
    /// Pairs in first-seen order.
    pair_order: Vec<PairKey>,
    response_count: usize,
}

impl TraitManifold {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one answered question.
    ///
    /// Appends an [`Activation`] per `(trait, strength)`, adds the strength
    /// to the context bucket when `context` is non-empty, and increments
    /// the counter of every distinct pair of traits in this call.
    pub fn record<I, T>(&mut self, activations: I, context: SituationalContext)
    where
        I: IntoIterator<Item = (T, f64)>,
        T: Into<TraitId>,
    {
        let mut present: Vec<TraitId> = Vec::new();

        for (trait_id, strength) in activations {
            let trait_id = trait_id.into();

            if !self.sparse_vector.contains_key(&trait_id) {
                self.trait_order.push(trait_id.clone());
            }
            self.sparse_vector
                .entry(trait_id.clone())
                .or_default()
                .push(Activation::new(trait_id.clone(), strength, context));

            if !context.is_empty() {
                if !self.context_profiles.contains_key(&context) {
                    self.context_order.push(context);
                }
                *self.context_profiles
                    .entry(context)
                    .or_default()
                    .entry(trait_id.clone())
                    .or_insert(0.0) += strength;
            }

            if !present.contains(&trait_id) {
                present.push(trait_id);
            }
        }

        // C(k, 2) increments; k is the handful of traits one option activates.
        for (i, a) in present.iter().enumerate() {
            for b in &present[i + 1..] {
                let Some(key) = PairKey::new(a, b) else { continue };
                match self.co_occurrence.get_mut(&key) {
                    Some(count) => *count += 1,
                    None => {
                        self.pair_order.push(key.clone());
                        self.co_occurrence.insert(key, 1);
                    }
                }
            }
        }

        self.response_count += 1;
        tracing::trace!(
            traits = present.len(),
            %context,
            responses = self.response_count,
            "recorded response"
        );
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Strength accumulated for `trait_id` in exactly `context` (0 if absent).
    pub fn contextual_strength(&self, trait_id: &str, context: SituationalContext) -> f64 {
        self.context_profiles
            .get(&context)
            .and_then(|profile| profile.get(trait_id))
            .copied()
            .unwrap_or(0.0)
    }

    /// Sum of every activation strength recorded for `trait_id`.
    pub fn total_strength(&self, trait_id: &str) -> f64 {
        self.activations(trait_id).iter().map(|a| a.strength).sum()
    }

    pub fn activation_count(&self, trait_id: &str) -> usize {
        self.activations(trait_id).len()
    }

    /// Activations of one trait in response order.
    pub fn activations(&self, trait_id: &str) -> &[Activation] {
        self.sparse_vector.get(trait_id).map_or(&[], Vec::as_slice)
    }

    /// Number of responses that activated both traits. Order-insensitive.
    pub fn co_occurrence(&self, a: &str, b: &str) -> u32 {
        PairKey::new(&TraitId::from(a), &TraitId::from(b))
            .and_then(|key| self.co_occurrence.get(&key).copied())
            .unwrap_or(0)
    }

    /// Empirical P(`b` fires | `a` fires) = co-occurrence(a, b) / activations(a).
    ///
    /// Asymmetric in general; 0 when the pair was never observed.
    pub fn co_activation_probability(&self, a: &str, b: &str) -> f64 {
        let count = self.co_occurrence(a, b);
        let base = self.activation_count(a);
        if count == 0 || base == 0 {
            return 0.0;
        }
        f64::from(count) / base as f64
    }

    /// Traits in first-seen order.
    pub fn traits(&self) -> &[TraitId] {
        &self.trait_order
    }

    /// Non-empty contexts in first-seen order.
    pub fn contexts(&self) -> &[SituationalContext] {
        &self.context_order
    }

    /// Observed pairs with their counts, in first-seen order.
    pub fn pairs(&self) -> impl Iterator<Item = (&PairKey, u32)> + '_ {
        self.pair_order
            .iter()
            .map(|key| (key, self.co_occurrence.get(key).copied().unwrap_or(0)))
    }

    pub fn sparse_vector(&self) -> &HashMap<TraitId, Vec<Activation>> {
        &self.sparse_vector
    }

    pub fn pair_counts(&self) -> &HashMap<PairKey, u32> {
        &self.co_occurrence
    }

    pub fn context_profiles(&self) -> &HashMap<SituationalContext, HashMap<TraitId, f64>> {
        &self.context_profiles
    }

    /// Number of `record` calls so far.
    pub fn response_count(&self) -> usize {
        self.response_count
    }

    pub fn is_empty(&self) -> bool {
        self.response_count == 0
    }
}

// ============================================================================
// Tests
// ============================================================================
