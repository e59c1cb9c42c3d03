//! Canonical unordered trait pair.

use serde::{Deserialize, Serialize};
use crate::model::TraitId;

/// An unordered pair of distinct traits, stored smaller-id first.
///
/// `(a, b)` and `(b, a)` build the same key, so every unordered pair owns
/// exactly one co-occurrence counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    first: TraitId,
    second: TraitId,
}

impl PairKey {
    /// Canonical key for two traits; `None` for a self-pair.
    pub fn new(a: &TraitId, b: &TraitId) -> Option<Self> {
        match a.cmp(b) {
            std::cmp::Ordering::Less => Some(Self { first: a.clone(), second: b.clone() }),
            std::cmp::Ordering::Greater => Some(Self { first: b.clone(), second: a.clone() }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn first(&self) -> &TraitId {
        &self.first
    }

    pub fn second(&self) -> &TraitId {
        &self.second
    }

    pub fn contains(&self, trait_id: &TraitId) -> bool {
        &self.first == trait_id || &self.second == trait_id
    }

    /// The member that is not `trait_id`.
    pub fn other(&self, trait_id: &TraitId) -> Option<&TraitId> {
        if &self.first == trait_id { Some(&self.second) }
        else if &self.second == trait_id { Some(&self.first) }
        else { None }
    }
}

impl std::fmt::Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}
