//! Scoring policy for the categorical projection, as named weight tables.
//!
//! Each score is a weighted sum of trait strengths. A term either reads
//! the trait's global strength or its strength within one context tag.
//! The projector only evaluates these tables; changing the policy means
//! changing data here, not control flow.

use serde::{Deserialize, Serialize};

use crate::model::{Profile, SituationalContext};

const SOCIAL: SituationalContext = SituationalContext::SOCIAL;
const STRESS: SituationalContext = SituationalContext::STRESS;
const WORK: SituationalContext = SituationalContext::WORK;
const CONFLICT: SituationalContext = SituationalContext::CONFLICT;
const CREATIVE: SituationalContext = SituationalContext::CREATIVE;
const CRISIS: SituationalContext = SituationalContext::CRISIS;
const LEARNING: SituationalContext = SituationalContext::LEARNING;

// ============================================================================
// Terms
// ============================================================================

/// One `weight × strength(trait[, context])` term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightTerm {
    pub trait_id: &'static str,
    /// `None` reads the global strength.
    pub context: Option<SituationalContext>,
    pub weight: f64,
}

const fn global(trait_id: &'static str, weight: f64) -> WeightTerm {
    WeightTerm { trait_id, context: None, weight }
}

const fn within(trait_id: &'static str, context: SituationalContext, weight: f64) -> WeightTerm {
    WeightTerm { trait_id, context: Some(context), weight }
}

impl WeightTerm {
    pub fn evaluate(&self, profile: &Profile) -> f64 {
        let strength = match self.context {
            None => profile.strength(self.trait_id),
            Some(context) => profile.contextual_strength(self.trait_id, context),
        };
        self.weight * strength
    }
}

/// Weighted sum of a term table.
pub fn score(terms: &[WeightTerm], profile: &Profile) -> f64 {
    terms.iter().map(|t| t.evaluate(profile)).sum()
}

// ============================================================================
// Axes
// ============================================================================

/// One side of a binary axis.
#[derive(Debug, Clone, Copy)]
pub struct AxisSide {
    pub letter: char,
    pub terms: &'static [WeightTerm],
}

/// A binary axis; `tie` names the letter chosen when both sides score equal.
#[derive(Debug, Clone, Copy)]
pub struct AxisWeights {
    pub name: &'static str,
    pub first: AxisSide,
    pub second: AxisSide,
    pub tie: char,
}

/// The four axes in type-code order. Ties favor I, N, F and P.
pub static AXES: [AxisWeights; 4] = [
    AxisWeights {
        name: "energy",
        first: AxisSide {
            letter: 'E',
            terms: &[
                global("social_energizing", 1.0),
                global("assertive_expression", 0.8),
                global("externally_processing", 0.8),
                within("social_energizing", SOCIAL, 0.5),
            ],
        },
        second: AxisSide {
            letter: 'I',
            terms: &[
                global("solitude_recharging", 1.0),
                global("reflective_processing", 0.8),
                global("reserved_expression", 0.8),
                within("solitude_recharging", STRESS, 0.5),
            ],
        },
        tie: 'I',
    },
    AxisWeights {
        name: "information",
        first: AxisSide {
            letter: 'S',
            terms: &[
                global("concrete_detail", 1.0),
                global("practical_focus", 0.8),
                global("tradition_keeping", 0.6),
                within("concrete_detail", WORK, 0.5),
            ],
        },
        second: AxisSide {
            letter: 'N',
            terms: &[
                global("abstract_pattern", 1.0),
                global("future_orientation", 0.8),
                global("novelty_seeking", 0.6),
                within("abstract_pattern", CREATIVE, 0.5),
            ],
        },
        tie: 'N',
    },
    AxisWeights {
        name: "decisions",
        first: AxisSide {
            letter: 'T',
            terms: &[
                global("logical_analysis", 1.0),
                global("objective_critique", 0.8),
                global("control_seeking", 0.4),
                within("logical_analysis", CONFLICT, 0.5),
            ],
        },
        second: AxisSide {
            letter: 'F',
            terms: &[
                global("empathic_attunement", 1.0),
                global("harmony_seeking", 0.8),
                global("values_driven", 0.6),
                within("empathic_attunement", CONFLICT, 0.5),
            ],
        },
        tie: 'F',
    },
    AxisWeights {
        name: "structure",
        first: AxisSide {
            letter: 'J',
            terms: &[
                global("structure_seeking", 1.0),
                global("planning_ahead", 0.8),
                global("closure_seeking", 0.6),
                global("risk_averse", 0.3),
                within("structure_seeking", STRESS, 0.5),
            ],
        },
        second: AxisSide {
            letter: 'P',
            terms: &[
                global("spontaneity", 1.0),
                global("adaptive_flexibility", 0.8),
                global("option_keeping", 0.6),
                global("risk_taking", 0.3),
                within("adaptive_flexibility", CRISIS, 0.5),
            ],
        },
        tie: 'P',
    },
];

// ============================================================================
// Cognitive functions
// ============================================================================

/// The eight cognitive functions used for sub-trait discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CognitiveFunction {
    Ne,
    Ni,
    Se,
    Si,
    Te,
    Ti,
    Fe,
    Fi,
}

impl CognitiveFunction {
    /// Function for a perceiving (`S`/`N`) or judging (`T`/`F`) letter.
    pub fn from_letter(letter: char, extraverted: bool) -> Option<Self> {
        Some(match (letter, extraverted) {
            ('N', true) => Self::Ne,
            ('N', false) => Self::Ni,
            ('S', true) => Self::Se,
            ('S', false) => Self::Si,
            ('T', true) => Self::Te,
            ('T', false) => Self::Ti,
            ('F', true) => Self::Fe,
            ('F', false) => Self::Fi,
            _ => return None,
        })
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Ne => "Extraverted intuition: generates possibilities and connections",
            Self::Ni => "Introverted intuition: converges on long-range patterns",
            Self::Se => "Extraverted sensing: acts on the immediate situation",
            Self::Si => "Introverted sensing: relies on proven experience",
            Self::Te => "Extraverted thinking: organizes people and resources toward goals",
            Self::Ti => "Introverted thinking: builds internally consistent frameworks",
            Self::Fe => "Extraverted feeling: reads and harmonizes group dynamics",
            Self::Fi => "Introverted feeling: measures choices against personal values",
        }
    }
}

impl std::fmt::Display for CognitiveFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Ne => "Ne",
            Self::Ni => "Ni",
            Self::Se => "Se",
            Self::Si => "Si",
            Self::Te => "Te",
            Self::Ti => "Ti",
            Self::Fe => "Fe",
            Self::Fi => "Fi",
        };
        write!(f, "{name}")
    }
}

/// Composite score table for one cognitive function.
#[derive(Debug, Clone, Copy)]
pub struct FunctionWeights {
    pub function: CognitiveFunction,
    pub terms: &'static [WeightTerm],
}

pub static FUNCTIONS: [FunctionWeights; 8] = [
    FunctionWeights {
        function: CognitiveFunction::Ne,
        terms: &[
            global("novelty_seeking", 1.0),
            global("abstract_pattern", 0.6),
            global("externally_processing", 0.4),
            within("abstract_pattern", CREATIVE, 0.5),
        ],
    },
    FunctionWeights {
        function: CognitiveFunction::Ni,
        terms: &[
            global("future_orientation", 1.0),
            global("abstract_pattern", 0.6),
            global("reflective_processing", 0.4),
            within("future_orientation", CRISIS, 0.5),
        ],
    },
    FunctionWeights {
        function: CognitiveFunction::Se,
        terms: &[
            global("risk_taking", 1.0),
            global("spontaneity", 0.6),
            global("practical_focus", 0.4),
            within("risk_taking", CRISIS, 0.5),
        ],
    },
    FunctionWeights {
        function: CognitiveFunction::Si,
        terms: &[
            global("tradition_keeping", 1.0),
            global("concrete_detail", 0.6),
            global("risk_averse", 0.4),
            within("concrete_detail", STRESS, 0.5),
        ],
    },
    FunctionWeights {
        function: CognitiveFunction::Te,
        terms: &[
            global("planning_ahead", 1.0),
            global("control_seeking", 0.6),
            global("logical_analysis", 0.4),
            within("control_seeking", WORK, 0.5),
        ],
    },
    FunctionWeights {
        function: CognitiveFunction::Ti,
        terms: &[
            global("logical_analysis", 1.0),
            global("objective_critique", 0.6),
            global("reflective_processing", 0.4),
            within("logical_analysis", LEARNING, 0.5),
        ],
    },
    FunctionWeights {
        function: CognitiveFunction::Fe,
        terms: &[
            global("harmony_seeking", 1.0),
            global("empathic_attunement", 0.6),
            global("social_energizing", 0.4),
            within("harmony_seeking", SOCIAL, 0.5),
        ],
    },
    FunctionWeights {
        function: CognitiveFunction::Fi,
        terms: &[
            global("values_driven", 1.0),
            global("empathic_attunement", 0.4),
            global("solitude_recharging", 0.4),
            within("values_driven", CONFLICT, 0.5),
        ],
    },
];
