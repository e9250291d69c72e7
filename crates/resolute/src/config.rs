//! Engine configuration.
//!
//! ```yaml
//! grounding:
//!   score_threshold: 0.8
//! scoring:
//!   uniqueness: 0.30
//! guard:
//!   recovery_timeout_ms: 5000
//!   heal: true
//! reducer:
//!   retry_penalty: 0.1
//! ```
//!
//! Every section and field is optional and falls back to its default.

use crate::grounding::{Grounder, GroundingConfig};
use crate::guard::{ActionGuard, GuardConfig};
use crate::reducer::{ExecutionReducer, HeuristicConfig};
use crate::result::ResoluteResult;
use crate::scoring::ScoringWeights;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete engine configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResoluteConfig {
    /// Grounding threshold
    pub grounding: GroundingConfig,
    /// Scoring factor weights
    pub scoring: ScoringWeights,
    /// Action guard recovery
    pub guard: GuardConfig,
    /// Heuristic selector quality penalties
    pub reducer: HeuristicConfig,
}

impl ResoluteConfig {
    /// Parse from YAML and validate
    ///
    /// # Errors
    ///
    /// Returns a YAML error or a configuration error
    pub fn from_yaml(yaml: &str) -> ResoluteResult<Self> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml_ng::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an I/O, YAML or configuration error
    pub fn load(path: &Path) -> ResoluteResult<Self> {
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }

    /// Serialize to YAML
    ///
    /// # Errors
    ///
    /// Returns a YAML error
    pub fn to_yaml(&self) -> ResoluteResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found
    pub fn validate(&self) -> ResoluteResult<()> {
        self.grounding.validate()?;
        self.scoring.validate()?;
        self.reducer.validate()
    }

    /// Set the grounding threshold
    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.grounding.score_threshold = threshold;
        self
    }

    /// Set scoring weights
    #[must_use]
    pub const fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.scoring = weights;
        self
    }

    /// Set guard options
    #[must_use]
    pub const fn with_guard(mut self, guard: GuardConfig) -> Self {
        self.guard = guard;
        self
    }

    /// Set reducer penalties
    #[must_use]
    pub const fn with_reducer(mut self, reducer: HeuristicConfig) -> Self {
        self.reducer = reducer;
        self
    }

    /// Grounder for this configuration
    #[must_use]
    pub const fn grounder(&self) -> Grounder {
        Grounder::new(self.grounding, self.scoring)
    }

    /// Action guard for this configuration
    #[must_use]
    pub const fn guard(&self) -> ActionGuard {
        ActionGuard::new(self.guard)
    }

    /// Reducer for this configuration
    #[must_use]
    pub const fn reducer(&self) -> ExecutionReducer {
        ExecutionReducer::new(self.reducer)
    }
}
