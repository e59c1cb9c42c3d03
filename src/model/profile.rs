//! Profile snapshot and the derived structures it carries.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use super::{SituationalContext, TraitId, TraitStrength};

/// Upper bound on the number of traits in one latent cluster.
pub const MAX_LATENT_COMPONENTS: usize = 10;

/// Two traits observed together, with P(`trait_2` | `trait_1`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoActivationPattern {
    pub trait_1: TraitId,
    pub trait_2: TraitId,
    pub count: u32,
    pub probability: f64,
}

/// An emergent cluster of co-activating traits.
///
/// Recomputed on every analysis pass; the id only distinguishes clusters
/// within one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatentTrait {
    pub id: String,
    pub components: SmallVec<[TraitId; MAX_LATENT_COMPONENTS]>,
    /// Mean total strength of the component traits.
    pub strength: f64,
    /// Mean conditional co-activation probability inside the cluster.
    pub cohesion: f64,
}

impl LatentTrait {
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn contains(&self, trait_id: &str) -> bool {
        self.components.iter().any(|c| c.as_str() == trait_id)
    }
}

/// Traits ranked within one situational context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextualTraits {
    pub context: SituationalContext,
    pub traits: Vec<TraitStrength>,
}

/// Immutable snapshot of a completed session's trait structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Top traits by total strength.
    pub dominant_traits: Vec<TraitStrength>,
    /// Every activated trait, strongest first.
    pub all_traits: Vec<TraitStrength>,
    /// Top traits per single context tag (tags with no data are omitted).
    pub contextual_dominant: Vec<ContextualTraits>,
    /// Every trait per single context tag, strongest first.
    pub contextual_all: Vec<ContextualTraits>,
    pub co_activation_patterns: Vec<CoActivationPattern>,
    pub trait_diversity: usize,
    pub context_variance: f64,
    pub contradiction_tolerance: f64,
    pub tension: f64,
    pub latent_traits: Vec<LatentTrait>,
    /// Number of `record` calls that fed this profile.
    pub response_count: usize,
}

impl Profile {
    /// Global total strength of a trait (0 if never activated).
    pub fn strength(&self, trait_id: &str) -> f64 {
        self.all_traits
            .iter()
            .find(|t| t.trait_id.as_str() == trait_id)
            .map_or(0.0, |t| t.strength)
    }

    /// Strength of a trait over activations carrying the single tag `context`.
    ///
    /// Only single tags have per-tag lists. A combined or empty context
    /// returns 0; per-tag sums cannot be added without double-counting
    /// activations that carry several of the tags.
    pub fn contextual_strength(&self, trait_id: &str, context: SituationalContext) -> f64 {
        self.contextual_all
            .iter()
            .find(|c| c.context == context)
            .and_then(|c| c.traits.iter().find(|t| t.trait_id.as_str() == trait_id))
            .map_or(0.0, |t| t.strength)
    }

    /// The dominant traits for a single context tag.
    pub fn dominant_in(&self, context: SituationalContext) -> &[TraitStrength] {
        self.contextual_dominant
            .iter()
            .find(|c| c.context == context)
            .map_or(&[], |c| c.traits.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.response_count == 0
    }
}

// ============================================================================
// Tests
// ============================================================================
