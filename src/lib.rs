//! # trait-manifold — Sparse Multi-Hot Trait Profiling
//!
//! Accumulates trait activations from answered vignettes into a sparse
//! manifold, derives a profile from it, projects that profile onto a
//! four-letter categorical type and scores the response history itself.
//!
//! ## Design Principles
//!
//! 1. **Sparse first**: only traits that were ever activated exist
//! 2. **Clean DTOs**: `Profile`, `MetaScores`, `Projection` cross all boundaries
//! 3. **Analyzers borrow**: the manifold is the only mutable state
//! 4. **Deterministic**: identical response sequences give identical output
//!
//! ## Quick Start
//!
//! ```rust
//! use trait_manifold::{
//!     CategoricalProjector, ProfileAnalyzer, ResponsePatternAnalyzer,
//!     SituationalContext, TraitManifold, VignetteResponse,
//! };
//!
//! # fn example() -> trait_manifold::Result<()> {
//! let mut manifold = TraitManifold::new();
//! manifold.record(
//!     [("logical_analysis", 0.8), ("solitude_recharging", 0.4)],
//!     SituationalContext::WORK,
//! );
//! manifold.record([("logical_analysis", 0.6)], SituationalContext::CONFLICT);
//!
//! let profile = ProfileAnalyzer::new(&manifold).generate_profile();
//!
//! let responses = vec![
//!     VignetteResponse::new("work_01", "A", 4_200),
//!     VignetteResponse::new("conflict_01", "A", 6_100),
//! ];
//! let meta = ResponsePatternAnalyzer::new(&responses, &[]).analyze();
//!
//! let projection = CategoricalProjector::new().project(&profile, Some(&meta))?;
//! println!("{}", projection.full_code());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Type | Output |
//! |-------|------|--------|
//! | Accumulate | [`TraitManifold`] | activations, context buckets, pair counts |
//! | Analyze | [`ProfileAnalyzer`] | [`Profile`] with latent clusters |
//! | Score history | [`ResponsePatternAnalyzer`] | [`MetaScores`] and flags |
//! | Project | [`CategoricalProjector`] | [`Projection`] (`INFP-A`) |
//! | Drive a session | [`Assessment`] | [`AssessmentReport`] |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod manifold;
pub mod analyzer;
pub mod patterns;
pub mod projection;
pub mod bank;
pub mod session;
pub mod config;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    TraitId, TraitStrength, SituationalContext, Activation,
    VignetteResponse, MirrorPair, ExpectedCorrelation,
    Profile, CoActivationPattern, LatentTrait, ContextualTraits,
    MetaScores, ResponseFlag,
};

// ============================================================================
// Re-exports: Engines
// ============================================================================

pub use manifold::{TraitManifold, PairKey};
pub use analyzer::ProfileAnalyzer;
pub use patterns::{ResponsePatternAnalyzer, PatternRules, FlagSet};
pub use projection::{
    CategoricalProjector, Projection, AxisScore, Variant, SubTrait, CognitiveFunction,
};

// ============================================================================
// Re-exports: Sessions and configuration
// ============================================================================

pub use bank::{QuestionBank, TraitDefinition, Vignette, VignetteOption};
pub use session::{Assessment, AssessmentReport, ResponseLog};
pub use config::{
    AnalyzerConfig, ProfileConfig, PatternConfig, ProjectionConfig,
    ContradictionDenominator,
};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid question bank: {0}")]
    InvalidBank(String),

    #[error("Unknown vignette: {0}")]
    UnknownVignette(String),

    #[error("Unknown option '{label}' for vignette {vignette}")]
    UnknownOption { vignette: String, label: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
