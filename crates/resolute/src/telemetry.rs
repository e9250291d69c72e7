//! Selector telemetry recorded while tests run.
//!
//! The store is owned by the caller for the duration of one run and handed to
//! the reducer by reference. Nothing here is global, so unrelated runs never
//! see each other's scores.

use crate::grounding::LiveReference;
use crate::result::ResoluteResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Test-scoped map of selector scores
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TelemetryStore {
    scores: BTreeMap<String, Vec<f64>>,
}

impl TelemetryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a score for a test; non-finite values are dropped
    pub fn record(&mut self, test_name: impl Into<String>, score: f64) {
        if !score.is_finite() {
            return;
        }
        self.scores
            .entry(test_name.into())
            .or_default()
            .push(score.clamp(0.0, 1.0));
    }

    /// Record the chosen candidate of a grounding decision
    pub fn record_reference(&mut self, test_name: impl Into<String>, reference: &LiveReference) {
        self.record(test_name, reference.score());
    }

    /// Scores recorded for a test
    #[must_use]
    pub fn scores_for(&self, test_name: &str) -> &[f64] {
        self.scores.get(test_name).map_or(&[], Vec::as_slice)
    }

    /// Mean score for a test, `None` when nothing was recorded
    #[must_use]
    pub fn mean_for(&self, test_name: &str) -> Option<f64> {
        let scores = self.scores_for(test_name);
        if scores.is_empty() {
            return None;
        }
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }

    /// Number of tests with telemetry
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether no telemetry has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Merge another store into this one
    pub fn merge(&mut self, other: Self) {
        for (test, mut scores) in other.scores {
            self.scores.entry(test).or_default().append(&mut scores);
        }
    }

    /// Load telemetry from a JSON file (`{"test": [0.9, 0.8]}`)
    ///
    /// # Errors
    ///
    /// Returns an I/O or JSON error
    pub fn load(path: &Path) -> ResoluteResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut store: Self = serde_json::from_str(&content)?;
        for scores in store.scores.values_mut() {
            scores.retain(|s| s.is_finite());
            for s in scores.iter_mut() {
                *s = s.clamp(0.0, 1.0);
            }
        }
        Ok(store)
    }

    /// Save telemetry as JSON
    ///
    /// # Errors
    ///
    /// Returns an I/O or JSON error
    pub fn save(&self, path: &Path) -> ResoluteResult<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
