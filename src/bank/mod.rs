//! # Question Bank
//!
//! Typed schema for the externally authored test content: trait
//! dictionary, vignettes with per-option trait activations, mirror-pair
//! definitions and the response-pattern rules that go with them.
//!
//! A bank is validated once at load time and is immutable afterwards.
//! Share it across sessions behind an `Arc`; the core never sees raw JSON.
//!
//! ```json
//! {
//!   "traits": [{"id": "logical_analysis", "name": "Logical analysis", "category": "decisions"}],
//!   "vignettes": [{
//!     "id": "work_01",
//!     "contexts": ["work", "stress"],
//!     "options": [{"label": "A", "text": "…", "activations": {"logical_analysis": 0.8}}]
//!   }],
//!   "mirror_pairs": [],
//!   "pattern_rules": {}
//! }
//! ```

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::model::{MirrorPair, SituationalContext, TraitId};
use crate::patterns::PatternRules;
use crate::{Error, Result};

// ============================================================================
// Schema
// ============================================================================

/// Display metadata for one trait. The core only uses `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitDefinition {
    pub id: TraitId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

/// One answer option and the traits choosing it activates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VignetteOption {
    pub label: String,
    #[serde(default)]
    pub text: String,
    /// Trait → activation strength, iterated in trait-id order.
    pub activations: BTreeMap<TraitId, f64>,
}

/// One forced-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vignette {
    pub id: String,
    #[serde(default)]
    pub text: String,
    /// Context tag names (`"work"`, `"social"`, …).
    #[serde(default)]
    pub contexts: Vec<String>,
    pub options: Vec<VignetteOption>,
}

impl Vignette {
    /// The context bit-set named by `contexts`.
    pub fn context(&self) -> SituationalContext {
        self.contexts
            .iter()
            .filter_map(|name| SituationalContext::parse_tag(name))
            .fold(SituationalContext::NONE, |acc, tag| acc | tag)
    }

    pub fn option(&self, label: &str) -> Option<&VignetteOption> {
        self.options.iter().find(|o| o.label == label)
    }
}

#[derive(Deserialize)]
struct RawBank {
    traits: Vec<TraitDefinition>,
    vignettes: Vec<Vignette>,
    #[serde(default)]
    mirror_pairs: Vec<MirrorPair>,
    #[serde(default)]
    pattern_rules: PatternRules,
}

// ============================================================================
// QuestionBank
// ============================================================================

/// Validated, immutable test content.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    traits: Vec<TraitDefinition>,
    vignettes: Vec<Vignette>,
    mirror_pairs: Vec<MirrorPair>,
    pattern_rules: PatternRules,
    vignette_index: HashMap<String, usize>,
    trait_index: HashMap<TraitId, usize>,
}

impl QuestionBank {
    /// Build and validate a bank.
    pub fn new(
        traits: Vec<TraitDefinition>,
        vignettes: Vec<Vignette>,
        mirror_pairs: Vec<MirrorPair>,
        pattern_rules: PatternRules,
    ) -> Result<Self> {
        let mut trait_index = HashMap::new();
        for (i, t) in traits.iter().enumerate() {
            if trait_index.insert(t.id.clone(), i).is_some() {
                return Err(Error::InvalidBank(format!("duplicate trait id '{}'", t.id)));
            }
        }

        let mut vignette_index = HashMap::new();
        for (i, v) in vignettes.iter().enumerate() {
            if vignette_index.insert(v.id.clone(), i).is_some() {
                return Err(Error::InvalidBank(format!("duplicate vignette id '{}'", v.id)));
            }
            validate_vignette(v, &trait_index)?;
        }

        for pair in &mirror_pairs {
            for id in [&pair.vignette_1, &pair.vignette_2] {
                if !vignette_index.contains_key(id.as_str()) {
                    return Err(Error::InvalidBank(format!("mirror pair references unknown vignette '{id}'")));
                }
            }
            if pair.vignette_1 == pair.vignette_2 {
                return Err(Error::InvalidBank(format!("mirror pair mirrors '{}' onto itself", pair.vignette_1)));
            }
            if !trait_index.contains_key(&pair.trait_id) {
                return Err(Error::InvalidBank(format!("mirror pair probes unknown trait '{}'", pair.trait_id)));
            }
        }

        tracing::debug!(
            traits = traits.len(),
            vignettes = vignettes.len(),
            mirror_pairs = mirror_pairs.len(),
            "question bank validated"
        );

        Ok(Self { traits, vignettes, mirror_pairs, pattern_rules, vignette_index, trait_index })
    }

    /// Parse and validate a bank from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawBank = serde_json::from_str(json)?;
        Self::new(raw.traits, raw.vignettes, raw.mirror_pairs, raw.pattern_rules)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: RawBank = serde_json::from_reader(reader)?;
        Self::new(raw.traits, raw.vignettes, raw.mirror_pairs, raw.pattern_rules)
    }

    /// Load a bank from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn traits(&self) -> &[TraitDefinition] {
        &self.traits
    }

    pub fn vignettes(&self) -> &[Vignette] {
        &self.vignettes
    }

    pub fn mirror_pairs(&self) -> &[MirrorPair] {
        &self.mirror_pairs
    }

    pub fn pattern_rules(&self) -> &PatternRules {
        &self.pattern_rules
    }

    pub fn vignette(&self, id: &str) -> Option<&Vignette> {
        self.vignette_index.get(id).map(|&i| &self.vignettes[i])
    }

    pub fn trait_definition(&self, id: &str) -> Option<&TraitDefinition> {
        self.trait_index.get(id).map(|&i| &self.traits[i])
    }
}

fn validate_vignette(v: &Vignette, traits: &HashMap<TraitId, usize>) -> Result<()> {
    if v.options.is_empty() {
        return Err(Error::InvalidBank(format!("vignette '{}' has no options", v.id)));
    }

    let mut tags = HashSet::new();
    for name in &v.contexts {
        let tag = SituationalContext::parse_tag(name).ok_or_else(|| {
            Error::InvalidBank(format!("vignette '{}' has unknown context '{name}'", v.id))
        })?;
        if !tags.insert(tag) {
            return Err(Error::InvalidBank(format!("vignette '{}' lists context '{name}' twice", v.id)));
        }
    }

    let mut labels = HashSet::new();
    for option in &v.options {
        if !labels.insert(option.label.as_str()) {
            return Err(Error::InvalidBank(format!(
                "vignette '{}' has duplicate option label '{}'",
                v.id, option.label
            )));
        }
        if let Some(unknown) = option.activations.keys().find(|t| !traits.contains_key(*t)) {
            return Err(Error::InvalidBank(format!(
                "vignette '{}' option '{}' activates unknown trait '{unknown}'",
                v.id, option.label
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
