//! # Trait Model
//!
//! Plain DTOs shared by the manifold, the analyzers and the projector.
//!
//! Design rule: no I/O, no mutable state beyond construction.
//! Everything here is safe to share read-only across threads.

pub mod trait_id;
pub mod context;
pub mod activation;
pub mod response;
pub mod profile;
pub mod meta;

pub use trait_id::{TraitId, TraitStrength};
pub use context::SituationalContext;
pub use activation::Activation;
pub use response::{VignetteResponse, MirrorPair, ExpectedCorrelation};
pub use profile::{
    Profile, CoActivationPattern, LatentTrait, ContextualTraits,
    MAX_LATENT_COMPONENTS,
};
pub use meta::{MetaScores, ResponseFlag};
