//! Per-question presentation and edit log.
//!
//! The host calls [`ResponseLog::present`] when a vignette is shown and
//! [`ResponseLog::answer`] on every selection. At completion the log is
//! finalized into one [`VignetteResponse`] per answered vignette.

use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::model::VignetteResponse;

/// One selection made while a vignette was on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub label: String,
    pub at: DateTime<Utc>,
}

/// Everything that happened to one vignette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionState {
    pub vignette_id: String,
    /// First presentation; revisits keep the original time.
    pub shown_at: DateTime<Utc>,
    pub selections: Vec<Selection>,
}

impl QuestionState {
    pub fn current(&self) -> Option<&str> {
        self.selections.last().map(|s| s.label.as_str())
    }

    fn to_response(&self) -> Option<VignetteResponse> {
        let last = self.selections.last()?;
        let elapsed_ms = (last.at - self.shown_at).num_milliseconds().max(0) as u64;
        let change_count = (self.selections.len() - 1) as u32;
        let previous_label = self
            .selections
            .len()
            .checked_sub(2)
            .map(|i| self.selections[i].label.clone());

        Some(VignetteResponse {
            vignette_id: self.vignette_id.clone(),
            option_label: last.label.clone(),
            elapsed_ms,
            changed: change_count > 0,
            previous_label,
            change_count,
        })
    }
}

/// Ordered log of question states for one session.
#[derive(Debug, Clone, Default)]
pub struct ResponseLog {
    states: Vec<QuestionState>,
    index: HashMap<String, usize>,
}

impl ResponseLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn state_mut(&mut self, vignette_id: &str, at: DateTime<Utc>) -> &mut QuestionState {
        let i = match self.index.get(vignette_id) {
            Some(&i) => i,
            None => {
                self.states.push(QuestionState {
                    vignette_id: vignette_id.to_string(),
                    shown_at: at,
                    selections: Vec::new(),
                });
                self.index.insert(vignette_id.to_string(), self.states.len() - 1);
                self.states.len() - 1
            }
        };
        &mut self.states[i]
    }

    /// Note that a vignette was shown. Only the first call sets the time.
    pub fn present(&mut self, vignette_id: &str, at: DateTime<Utc>) {
        self.state_mut(vignette_id, at);
    }

    /// Record a selection. Re-selecting the current answer is not an edit.
    /// Answering a vignette never presented counts as presented at `at`.
    pub fn answer(&mut self, vignette_id: &str, label: &str, at: DateTime<Utc>) {
        let state = self.state_mut(vignette_id, at);
        if state.current() == Some(label) {
            return;
        }
        state.selections.push(Selection { label: label.to_string(), at });
    }

    pub fn state(&self, vignette_id: &str) -> Option<&QuestionState> {
        self.index.get(vignette_id).map(|&i| &self.states[i])
    }

    pub fn current_answer(&self, vignette_id: &str) -> Option<&str> {
        self.state(vignette_id).and_then(QuestionState::current)
    }

    /// States in first-presentation order.
    pub fn states(&self) -> &[QuestionState] {
        &self.states
    }

    pub fn answered_count(&self) -> usize {
        self.states.iter().filter(|s| !s.selections.is_empty()).count()
    }

    /// One response per answered vignette, in first-presentation order.
    pub fn finalize(&self) -> Vec<VignetteResponse> {
        self.states.iter().filter_map(QuestionState::to_response).collect()
    }
}
