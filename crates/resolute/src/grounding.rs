//! Grounding: resolve a [`Target`] to one trustworthy live reference.
//!
//! Grounding is a pure selection policy. It generates candidates, probes the
//! page once per candidate to score them, and picks the best one at or above
//! the configured threshold. It never waits or retries; that is the job of
//! [`crate::guard::ActionGuard`].

use crate::candidate::{generate_candidates, Selector, SelectorCandidate, Strategy};
use crate::page::Page;
use crate::plan::{Step, Target};
use crate::result::{ResoluteError, ResoluteResult};
use crate::scoring::{rank, Scorer, ScoringWeights};
use crate::telemetry::TelemetryStore;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default minimum score a candidate needs to be acted on
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.8;

/// Grounding options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundingConfig {
    /// Minimum score in [0, 1]
    pub score_threshold: f64,
}

impl Default for GroundingConfig {
    fn default() -> Self {
        Self {
            score_threshold: DEFAULT_SCORE_THRESHOLD,
        }
    }
}

impl GroundingConfig {
    /// Set the score threshold
    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = threshold;
        self
    }

    /// Check the threshold lies in [0, 1]
    ///
    /// # Errors
    ///
    /// Returns a configuration error otherwise
    pub fn validate(&self) -> ResoluteResult<()> {
        if (0.0..=1.0).contains(&self.score_threshold) {
            Ok(())
        } else {
            Err(ResoluteError::config(format!(
                "score_threshold must be within [0, 1], got {}",
                self.score_threshold
            )))
        }
    }
}

/// Outcome of grounding one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveReference {
    /// Key of the grounded target
    pub target_key: String,
    /// Chosen candidate
    pub chosen: SelectorCandidate,
    /// Other candidates at or above the threshold, best first
    pub alternates: Vec<SelectorCandidate>,
    /// Every scored candidate, best first
    pub candidates: Vec<SelectorCandidate>,
}

impl LiveReference {
    /// Selector to act on
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.chosen.selector
    }

    /// Strategy of the chosen candidate
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.chosen.strategy
    }

    /// Score of the chosen candidate
    #[must_use]
    pub const fn score(&self) -> f64 {
        self.chosen.score
    }

    /// Best qualifying alternate, if any
    #[must_use]
    pub fn next_alternate(&self) -> Option<&SelectorCandidate> {
        self.alternates.first()
    }
}

/// Pick the best candidate at or above `threshold`.
///
/// Candidates are re-ranked first, so ties resolve by strategy priority
/// regardless of input order.
///
/// # Errors
///
/// Returns `ThresholdNotMet` with the best observed score if nothing qualifies
pub fn select(
    target_key: &str,
    mut candidates: Vec<SelectorCandidate>,
    threshold: f64,
) -> ResoluteResult<LiveReference> {
    rank(&mut candidates);
    let best_score = candidates.first().map_or(0.0, |c| c.score);

    let mut qualifying = candidates.iter().filter(|c| c.score >= threshold).cloned();
    let Some(chosen) = qualifying.next() else {
        return Err(ResoluteError::ThresholdNotMet {
            key: target_key.to_string(),
            best_score,
            threshold,
        });
    };
    let alternates = qualifying.collect();

    Ok(LiveReference {
        target_key: target_key.to_string(),
        chosen,
        alternates,
        candidates,
    })
}

/// Grounding selector
#[derive(Debug, Clone, Copy, Default)]
pub struct Grounder {
    scorer: Scorer,
    config: GroundingConfig,
}

impl Grounder {
    /// Create a grounder
    #[must_use]
    pub const fn new(config: GroundingConfig, weights: ScoringWeights) -> Self {
        Self {
            scorer: Scorer::new(weights),
            config,
        }
    }

    /// Create a grounder with default weights and the given threshold
    #[must_use]
    pub fn with_threshold(threshold: f64) -> Self {
        Self::new(
            GroundingConfig::default().with_threshold(threshold),
            ScoringWeights::default(),
        )
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &GroundingConfig {
        &self.config
    }

    /// Ground a target against the current page
    ///
    /// # Errors
    ///
    /// Returns `InvalidTarget` for a target without hints, `ThresholdNotMet`
    /// when no candidate qualifies, or a page error from probing
    pub fn ground<P: Page + ?Sized>(
        &self,
        page: &P,
        target: &Target,
    ) -> ResoluteResult<LiveReference> {
        target.validate()?;
        let candidates = generate_candidates(target);
        let scored = self.scorer.score_all(page, candidates)?;

        match select(&target.key, scored, self.config.score_threshold) {
            Ok(reference) => {
                info!(
                    target = %reference.target_key,
                    method = %reference.strategy(),
                    expression = %reference.chosen.expression,
                    score = reference.score(),
                    alternates = reference.alternates.len(),
                    "grounded target"
                );
                Ok(reference)
            }
            Err(err) => {
                warn!(target = %target.key, error = %err, "grounding failed");
                Err(err)
            }
        }
    }

    /// Ground a target and record the chosen score under `test_name`
    ///
    /// # Errors
    ///
    /// Same as [`Grounder::ground`]; nothing is recorded on failure
    pub fn ground_recorded<P: Page + ?Sized>(
        &self,
        page: &P,
        target: &Target,
        test_name: &str,
        telemetry: &mut TelemetryStore,
    ) -> ResoluteResult<LiveReference> {
        let reference = self.ground(page, target)?;
        telemetry.record_reference(test_name, &reference);
        Ok(reference)
    }

    /// Ground every target of a step, stopping at the first failure
    ///
    /// # Errors
    ///
    /// Returns the first grounding error
    pub fn ground_step<P: Page + ?Sized>(
        &self,
        page: &P,
        step: &Step,
    ) -> ResoluteResult<Vec<LiveReference>> {
        step.targets
            .iter()
            .map(|target| self.ground(page, target))
            .collect()
    }
}
