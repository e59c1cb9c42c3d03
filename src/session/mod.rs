//! Assessment session: drives one subject through the whole pipeline.
//!
//! ```text
//! present/answer ──► ResponseLog
//! complete():
//!   final answers ──► TraitManifold::record (one call per answered vignette)
//!                 ──► ProfileAnalyzer ──► Profile ──┐
//!   finalized log ──► ResponsePatternAnalyzer ──► MetaScores + flags
//!                                                   └─► CategoricalProjector
//! ```
//!
//! Each session owns its log and builds its own manifold. The bank is
//! shared read-only.

pub mod log;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzer::ProfileAnalyzer;
use crate::bank::QuestionBank;
use crate::config::AnalyzerConfig;
use crate::manifold::TraitManifold;
use crate::model::{MetaScores, Profile, VignetteResponse};
use crate::patterns::{FlagSet, ResponsePatternAnalyzer};
use crate::projection::{CategoricalProjector, Projection};
use crate::{Error, Result};
pub use log::{QuestionState, ResponseLog, Selection};

/// Everything produced for one completed session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentReport {
    pub profile: Profile,
    pub projection: Projection,
    pub meta_scores: MetaScores,
    pub flags: FlagSet,
    pub responses: Vec<VignetteResponse>,
}

/// One subject's test session.
#[derive(Debug, Clone)]
pub struct Assessment {
    bank: Arc<QuestionBank>,
    config: AnalyzerConfig,
    log: ResponseLog,
}

impl Assessment {
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        Self { bank, config: AnalyzerConfig::default(), log: ResponseLog::new() }
    }

    /// Session with a custom configuration, validated up front.
    pub fn with_config(bank: Arc<QuestionBank>, config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { bank, config, log: ResponseLog::new() })
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn log(&self) -> &ResponseLog {
        &self.log
    }

    pub fn present(&mut self, vignette_id: &str, at: DateTime<Utc>) -> Result<()> {
        if self.bank.vignette(vignette_id).is_none() {
            return Err(Error::UnknownVignette(vignette_id.to_string()));
        }
        self.log.present(vignette_id, at);
        Ok(())
    }

    pub fn answer(&mut self, vignette_id: &str, label: &str, at: DateTime<Utc>) -> Result<()> {
        let vignette = self
            .bank
            .vignette(vignette_id)
            .ok_or_else(|| Error::UnknownVignette(vignette_id.to_string()))?;
        if vignette.option(label).is_none() {
            return Err(Error::UnknownOption {
                vignette: vignette_id.to_string(),
                label: label.to_string(),
            });
        }
        self.log.answer(vignette_id, label, at);
        Ok(())
    }

    pub fn answered_count(&self) -> usize {
        self.log.answered_count()
    }

    /// Feed every final answer into a fresh manifold.
    pub fn build_manifold(&self, responses: &[VignetteResponse]) -> Result<TraitManifold> {
        let mut manifold = TraitManifold::new();
        for response in responses {
            let vignette = self
                .bank
                .vignette(&response.vignette_id)
                .ok_or_else(|| Error::UnknownVignette(response.vignette_id.clone()))?;
            let option = vignette.option(&response.option_label).ok_or_else(|| Error::UnknownOption {
                vignette: response.vignette_id.clone(),
                label: response.option_label.clone(),
            })?;
            manifold.record(
                option.activations.iter().map(|(t, s)| (t.clone(), *s)),
                vignette.context(),
            );
        }
        Ok(manifold)
    }

    /// Run the full analysis over the answers so far.
    ///
    /// Fails with [`Error::InsufficientData`] when nothing was answered.
    pub fn complete(&self) -> Result<AssessmentReport> {
        let responses = self.log.finalize();
        if responses.is_empty() {
            return Err(Error::InsufficientData("no vignette has been answered".into()));
        }

        let manifold = self.build_manifold(&responses)?;
        let profile = ProfileAnalyzer::with_config(&manifold, self.config.profile.clone()).generate_profile();

        // The analyzer borrows `responses`, which move into the report below.
        let (meta_scores, flags) = {
            let patterns = ResponsePatternAnalyzer::with_rules(
                &responses,
                self.bank.mirror_pairs(),
                self.bank.pattern_rules().clone(),
                self.config.patterns.clone(),
            );
            (patterns.analyze(), patterns.detect_flags())
        };

        let projection = CategoricalProjector::with_config(self.config.projection.clone())
            .project(&profile, Some(&meta_scores))?;

        tracing::info!(
            responses = responses.len(),
            type_code = %projection.full_code(),
            flags = flags.len(),
            "assessment complete"
        );

        Ok(AssessmentReport { profile, projection, meta_scores, flags, responses })
    }
}

// ============================================================================
// Tests
// ============================================================================
