//! Candidate scoring.
//!
//! A candidate's confidence is a weighted composite of independent factors,
//! capped by a per-strategy ceiling:
//!
//! ```text
//! composite = 0.30·uniqueness + 0.25·semantic + 0.20·stability
//!           + 0.10·interactability + 0.05·scope + 0.10·presence
//! score     = min(ceiling(strategy), composite)
//! ```
//!
//! The five documented factors sum to 0.90. The remaining 0.10 is a presence
//! term awarded to any candidate that matches at least one element, so a
//! perfect candidate reaches 1.0 before its ceiling applies. Zero matches
//! disqualify a candidate outright.

use crate::candidate::{Selector, SelectorCandidate, Strategy};
use crate::page::{ElementState, Page, Scope};
use crate::result::{ResoluteError, ResoluteResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Weight of the uniqueness factor
pub const UNIQUENESS_WEIGHT: f64 = 0.30;
/// Weight of the semantic precision factor
pub const SEMANTIC_WEIGHT: f64 = 0.25;
/// Weight of the hint stability factor
pub const STABILITY_WEIGHT: f64 = 0.20;
/// Weight of the interactability factor
pub const INTERACTABILITY_WEIGHT: f64 = 0.10;
/// Weight of the scope fidelity factor
pub const SCOPE_WEIGHT: f64 = 0.05;
/// Baseline awarded for matching at least one element
pub const PRESENCE_WEIGHT: f64 = 0.10;

/// Depth up to which scope fidelity is not penalized
pub const SHALLOW_DEPTH: u32 = 8;
/// Depth at which the depth factor reaches zero
pub const MAX_DEPTH: u32 = 24;

/// Factor weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Uniqueness weight
    pub uniqueness: f64,
    /// Semantic precision weight
    pub semantic: f64,
    /// Hint stability weight
    pub stability: f64,
    /// Interactability weight
    pub interactability: f64,
    /// Scope fidelity weight
    pub scope: f64,
    /// Presence baseline
    pub presence: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            uniqueness: UNIQUENESS_WEIGHT,
            semantic: SEMANTIC_WEIGHT,
            stability: STABILITY_WEIGHT,
            interactability: INTERACTABILITY_WEIGHT,
            scope: SCOPE_WEIGHT,
            presence: PRESENCE_WEIGHT,
        }
    }
}

impl ScoringWeights {
    /// Sum of the five quality factors, excluding presence
    #[must_use]
    pub fn factor_total(&self) -> f64 {
        self.uniqueness + self.semantic + self.stability + self.interactability + self.scope
    }

    /// Sum of all weights
    #[must_use]
    pub fn total(&self) -> f64 {
        self.factor_total() + self.presence
    }

    /// Check every weight is finite and non-negative and the total does not exceed 1
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the offending weight
    pub fn validate(&self) -> ResoluteResult<()> {
        let weights = [
            ("uniqueness", self.uniqueness),
            ("semantic", self.semantic),
            ("stability", self.stability),
            ("interactability", self.interactability),
            ("scope", self.scope),
            ("presence", self.presence),
        ];
        for (name, w) in weights {
            if !w.is_finite() || w < 0.0 {
                return Err(ResoluteError::config(format!(
                    "scoring weight '{name}' must be a non-negative number, got {w}"
                )));
            }
        }
        if self.total() > 1.0 + 1e-9 {
            return Err(ResoluteError::config(format!(
                "scoring weights sum to {:.3}, must not exceed 1.0",
                self.total()
            )));
        }
        Ok(())
    }
}

/// Everything the scorer needs to know about one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreInputs {
    /// Strategy of the candidate
    pub strategy: Strategy,
    /// Whether the text part of the selector is an exact match on role+name
    pub exact: bool,
    /// Number of elements matched
    pub match_count: usize,
    /// First match is visible
    pub visible: bool,
    /// First match is enabled
    pub enabled: bool,
    /// Nesting depth of the first match
    pub depth: u32,
    /// Scope boundary of the first match
    pub scope: Scope,
}

impl ScoreInputs {
    /// Build inputs from a selector and the states it matched
    #[must_use]
    pub fn from_probe(selector: &Selector, matches: &[ElementState]) -> Self {
        let first = matches.first().copied().unwrap_or(ElementState {
            visible: false,
            enabled: false,
            depth: 0,
            scope: Scope::Document,
        });
        let exact = match selector {
            Selector::Structural { role, text } => role.is_some() && text.is_some(),
            _ => true,
        };
        Self {
            strategy: selector.strategy(),
            exact,
            match_count: matches.len(),
            visible: first.visible,
            enabled: first.enabled,
            depth: first.depth,
            scope: first.scope,
        }
    }
}

/// Per-factor contribution of a scored candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Weighted uniqueness
    pub uniqueness: f64,
    /// Weighted semantic precision
    pub semantic: f64,
    /// Weighted stability
    pub stability: f64,
    /// Weighted interactability
    pub interactability: f64,
    /// Weighted scope fidelity
    pub scope: f64,
    /// Presence baseline
    pub presence: f64,
    /// Sum of the above
    pub composite: f64,
    /// Strategy ceiling
    pub ceiling: f64,
    /// `min(ceiling, composite)`
    pub score: f64,
}

impl ScoreBreakdown {
    const fn disqualified(ceiling: f64) -> Self {
        Self {
            uniqueness: 0.0,
            semantic: 0.0,
            stability: 0.0,
            interactability: 0.0,
            scope: 0.0,
            presence: 0.0,
            composite: 0.0,
            ceiling,
            score: 0.0,
        }
    }
}

/// A-priori ceiling of a strategy
#[must_use]
pub const fn ceiling(strategy: Strategy) -> f64 {
    match strategy {
        Strategy::Role => 0.95,
        Strategy::Label => 0.90,
        Strategy::Placeholder => 0.85,
        Strategy::TestId => 0.80,
        Strategy::Scoped => 0.70,
        Strategy::Structural => 0.50,
    }
}

/// 1 for a unique match, 1/n for n matches, 0 for none
#[must_use]
pub fn uniqueness(match_count: usize) -> f64 {
    match match_count {
        0 => 0.0,
        n => 1.0 / n as f64,
    }
}

/// How precisely the selector captures the element's meaning
#[must_use]
pub const fn semantic_precision(strategy: Strategy, exact: bool) -> f64 {
    match strategy {
        Strategy::Role => 1.0,
        Strategy::Label => 0.8,
        Strategy::Placeholder => 0.7,
        Strategy::TestId => 0.6,
        Strategy::Scoped => 0.5,
        Strategy::Structural if exact => 0.4,
        Strategy::Structural => 0.3,
    }
}

/// How stable the underlying hint tends to be across releases
#[must_use]
pub const fn stability(strategy: Strategy) -> f64 {
    match strategy {
        Strategy::TestId => 1.0,
        Strategy::Role => 0.95,
        Strategy::Label => 0.9,
        Strategy::Placeholder => 0.75,
        Strategy::Scoped => 0.5,
        Strategy::Structural => 0.3,
    }
}

/// Full credit only for visible and enabled elements
#[must_use]
pub const fn interactability(visible: bool, enabled: bool) -> f64 {
    match (visible, enabled) {
        (true, true) => 1.0,
        (true, false) => 0.5,
        (false, _) => 0.0,
    }
}

/// Penalizes deep nesting and frame or shadow boundaries
#[must_use]
pub fn scope_fidelity(depth: u32, scope: Scope) -> f64 {
    let depth_factor = if depth <= SHALLOW_DEPTH {
        1.0
    } else if depth >= MAX_DEPTH {
        0.0
    } else {
        1.0 - f64::from(depth - SHALLOW_DEPTH) / f64::from(MAX_DEPTH - SHALLOW_DEPTH)
    };
    let boundary = match scope {
        Scope::Document => 1.0,
        Scope::ShadowRoot => 0.6,
        Scope::Frame => 0.4,
    };
    depth_factor * boundary
}

/// Score one candidate from its live facts
#[must_use]
pub fn score_breakdown(inputs: &ScoreInputs, weights: &ScoringWeights) -> ScoreBreakdown {
    let cap = ceiling(inputs.strategy);
    if inputs.match_count == 0 {
        return ScoreBreakdown::disqualified(cap);
    }

    let uniqueness = weights.uniqueness * uniqueness(inputs.match_count);
    let semantic = weights.semantic * semantic_precision(inputs.strategy, inputs.exact);
    let stability = weights.stability * stability(inputs.strategy);
    let interactability =
        weights.interactability * interactability(inputs.visible, inputs.enabled);
    let scope = weights.scope * scope_fidelity(inputs.depth, inputs.scope);
    let presence = weights.presence;

    let composite = uniqueness + semantic + stability + interactability + scope + presence;
    ScoreBreakdown {
        uniqueness,
        semantic,
        stability,
        interactability,
        scope,
        presence,
        composite,
        ceiling: cap,
        score: composite.min(cap).clamp(0.0, 1.0),
    }
}

/// Final score of one candidate
#[must_use]
pub fn score(inputs: &ScoreInputs, weights: &ScoringWeights) -> f64 {
    score_breakdown(inputs, weights).score
}

/// Sort candidates by score descending, ties broken by strategy priority
pub fn rank(candidates: &mut [SelectorCandidate]) {
    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.strategy.priority().cmp(&b.strategy.priority()))
    });
}

/// Scores candidates against a live page
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    weights: ScoringWeights,
}

impl Scorer {
    /// Create a scorer with custom weights
    #[must_use]
    pub const fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// The weights in use
    #[must_use]
    pub const fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Probe each candidate on the page, score it, and rank the result
    ///
    /// # Errors
    ///
    /// Returns error if the page cannot be probed
    pub fn score_all<P: Page + ?Sized>(
        &self,
        page: &P,
        candidates: Vec<SelectorCandidate>,
    ) -> ResoluteResult<Vec<SelectorCandidate>> {
        let mut scored = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let matches = page.probe(&candidate.selector)?;
            let inputs = ScoreInputs::from_probe(&candidate.selector, &matches);
            let breakdown = score_breakdown(&inputs, &self.weights);
            debug!(
                strategy = %candidate.strategy,
                expression = %candidate.expression,
                matches = inputs.match_count,
                composite = breakdown.composite,
                score = breakdown.score,
                "scored candidate"
            );
            scored.push(candidate.with_score(breakdown.score));
        }
        rank(&mut scored);
        Ok(scored)
    }
}
