//! Trait identifier.

use serde::{Deserialize, Serialize};

/// Opaque trait identifier.
///
/// The ordering is plain lexicographic order on the underlying string. It
/// carries no meaning beyond giving co-activation pairs a canonical layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitId(pub String);

impl TraitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TraitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TraitId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TraitId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::borrow::Borrow<str> for TraitId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A trait together with an accumulated strength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitStrength {
    pub trait_id: TraitId,
    pub strength: f64,
}

impl TraitStrength {
    pub fn new(trait_id: impl Into<TraitId>, strength: f64) -> Self {
        Self { trait_id: trait_id.into(), strength }
    }
}
