//! Activation: one trait's weighted firing from a single answered question.

use serde::{Deserialize, Serialize};
use super::{SituationalContext, TraitId};

/// A single trait activation. Created by the manifold, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activation {
    pub trait_id: TraitId,
    /// Expected in `[0, 1]`; not enforced.
    pub strength: f64,
    pub context: SituationalContext,
}

impl Activation {
    pub(crate) fn new(trait_id: TraitId, strength: f64, context: SituationalContext) -> Self {
        Self { trait_id, strength, context }
    }
}
