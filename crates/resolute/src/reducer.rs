//! Execution reducer: classify attempts and consolidate them per test.
//!
//! ## Per environment
//!
//! Records of one (test, environment) pair are taken in canonical order:
//!
//! - any flaky marker → `Flaky`
//! - a single record → its status (unknown stays unknown)
//! - first failed, last passed → `Flaky`
//! - first failed, last failed → `Failed`
//! - otherwise → the last status
//!
//! ## Across environments
//!
//! `Flaky` dominates `Failed`, which dominates `Passed`. Environments that
//! could not be classified are ignored unless no environment could be.
//!
//! ## Selector quality
//!
//! The mean of recorded telemetry scores when the store has any for the test,
//! otherwise a penalty-based heuristic. Both live in [0, 1].
//!
//! The reducer is a pure fold: it sorts a copy of its input, keys everything
//! by `BTreeMap`, and never fails.

use crate::execution::{ExecutionRecord, ExecutionStatus};
use crate::result::{ResoluteError, ResoluteResult};
use crate::telemetry::TelemetryStore;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Consolidated classification of a test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Passed everywhere it was classified
    Passed,
    /// Failed without recovering
    Failed,
    /// Failed then passed, or marked flaky by the engine
    Flaky,
    /// No usable status
    Unknown,
}

impl Classification {
    /// Dominance rank; higher wins
    #[must_use]
    pub const fn severity(&self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Passed => 1,
            Self::Failed => 2,
            Self::Flaky => 3,
        }
    }

    /// The dominant of two classifications
    #[must_use]
    pub const fn dominant(self, other: Self) -> Self {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }

    /// Canonical name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Flaky => "flaky",
            Self::Unknown => "unknown",
        }
    }

    const fn from_status(status: ExecutionStatus) -> Self {
        match status {
            ExecutionStatus::Passed => Self::Passed,
            ExecutionStatus::Failed => Self::Failed,
            ExecutionStatus::FlakyMarker => Self::Flaky,
            ExecutionStatus::Unknown => Self::Unknown,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify the ordered attempt statuses of one (test, environment) pair
#[must_use]
pub fn classify_sequence(statuses: &[ExecutionStatus]) -> Classification {
    if statuses.contains(&ExecutionStatus::FlakyMarker) {
        return Classification::Flaky;
    }
    match statuses {
        [] => Classification::Unknown,
        [only] => Classification::from_status(*only),
        [first, .., last] => match (first, last) {
            (ExecutionStatus::Failed, ExecutionStatus::Passed) => Classification::Flaky,
            (ExecutionStatus::Failed, ExecutionStatus::Failed) => Classification::Failed,
            (_, last) => Classification::from_status(*last),
        },
    }
}

/// Consolidate per-environment classifications into one
#[must_use]
pub fn consolidate<I>(classifications: I) -> Classification
where
    I: IntoIterator<Item = Classification>,
{
    classifications
        .into_iter()
        .fold(Classification::Unknown, Classification::dominant)
}

/// Source of a selector quality score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// Mean of recorded grounding scores
    Telemetry,
    /// Failure, retry and selector complexity penalties
    Heuristic,
}

/// Default penalty per failed record
pub const DEFAULT_FAILURE_PENALTY: f64 = 0.2;
/// Default penalty per retry
pub const DEFAULT_RETRY_PENALTY: f64 = 0.1;
/// Default penalty at maximum selector complexity
pub const DEFAULT_COMPLEXITY_PENALTY: f64 = 0.3;

/// Heuristic selector quality penalties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Subtracted per failed record
    pub failure_penalty: f64,
    /// Subtracted per retry
    pub retry_penalty: f64,
    /// Multiplied by mean selector complexity and subtracted
    pub complexity_penalty: f64,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            failure_penalty: DEFAULT_FAILURE_PENALTY,
            retry_penalty: DEFAULT_RETRY_PENALTY,
            complexity_penalty: DEFAULT_COMPLEXITY_PENALTY,
        }
    }
}

impl HeuristicConfig {
    /// Set failure penalty
    #[must_use]
    pub const fn with_failure_penalty(mut self, penalty: f64) -> Self {
        self.failure_penalty = penalty;
        self
    }

    /// Set retry penalty
    #[must_use]
    pub const fn with_retry_penalty(mut self, penalty: f64) -> Self {
        self.retry_penalty = penalty;
        self
    }

    /// Set complexity penalty
    #[must_use]
    pub const fn with_complexity_penalty(mut self, penalty: f64) -> Self {
        self.complexity_penalty = penalty;
        self
    }

    /// Check every penalty is finite and non-negative
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the offending penalty
    pub fn validate(&self) -> ResoluteResult<()> {
        for (name, value) in [
            ("failure_penalty", self.failure_penalty),
            ("retry_penalty", self.retry_penalty),
            ("complexity_penalty", self.complexity_penalty),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ResoluteError::config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Heuristic score in [0, 1]
    #[must_use]
    pub fn score(&self, failed_records: usize, retries: usize, complexity: f64) -> f64 {
        let raw = 1.0
            - self.failure_penalty * failed_records as f64
            - self.retry_penalty * retries as f64
            - self.complexity_penalty * complexity.clamp(0.0, 1.0);
        if raw.is_nan() {
            0.0
        } else {
            raw.clamp(0.0, 1.0)
        }
    }
}

/// Selector length at which the length component saturates
const COMPLEXITY_LENGTH_CAP: f64 = 120.0;
/// Structural token count at which the token component saturates
const COMPLEXITY_TOKEN_CAP: f64 = 4.0;
const COMPLEXITY_LENGTH_WEIGHT: f64 = 0.4;
const COMPLEXITY_TOKEN_WEIGHT: f64 = 0.6;

fn structural_tokens() -> Option<&'static Regex> {
    static TOKENS: OnceLock<Option<Regex>> = OnceLock::new();
    TOKENS
        .get_or_init(|| {
            Regex::new(
                r"(>>|\s[>~+]\s|:nth-|nth=|:eq\(|//|::|\.\.|\[\d+\]|ancestor|following-sibling|preceding-sibling)",
            )
            .ok()
        })
        .as_ref()
}

/// Superficial complexity of a selector string in [0, 1].
///
/// Long selectors and selectors built from combinators, `nth-` pseudo
/// classes, XPath axes or positional indices score higher.
#[must_use]
pub fn selector_complexity(selector: &str) -> f64 {
    let selector = selector.trim();
    if selector.is_empty() {
        return 0.0;
    }
    let length = (selector.chars().count() as f64 / COMPLEXITY_LENGTH_CAP).min(1.0);
    let tokens = structural_tokens().map_or(0, |re| re.find_iter(selector).count());
    let tokens = (tokens as f64 / COMPLEXITY_TOKEN_CAP).min(1.0);
    COMPLEXITY_LENGTH_WEIGHT * length + COMPLEXITY_TOKEN_WEIGHT * tokens
}

/// Outcome of one environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentOutcome {
    /// Environment name
    pub environment: String,
    /// Classification of its attempts
    pub classification: Classification,
    /// Number of attempts
    pub attempts: usize,
    /// Summed attempt duration
    pub duration_ms: u64,
}

impl EnvironmentOutcome {
    /// Attempts beyond the first
    #[must_use]
    pub const fn retries(&self) -> usize {
        self.attempts.saturating_sub(1)
    }
}

/// Consolidated result of one logical test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedResult {
    /// Test name
    pub test_name: String,
    /// Overall classification
    pub classification: Classification,
    /// Retries summed over environments
    pub retry_count: usize,
    /// Selector quality in [0, 1]
    pub selector_quality_score: f64,
    /// Which tier produced the score
    pub score_source: ScoreSource,
    /// Per-environment breakdown, sorted by environment
    pub environments: Vec<EnvironmentOutcome>,
    /// Summed duration of every attempt
    pub total_duration_ms: u64,
    /// Input records in canonical order
    pub contributing_records: Vec<ExecutionRecord>,
}

impl ConsolidatedResult {
    /// Selector quality on the [0, 10] reporting scale
    #[must_use]
    pub fn reporting_score(&self) -> f64 {
        self.selector_quality_score * 10.0
    }

    /// Outcome of one environment
    #[must_use]
    pub fn environment(&self, name: &str) -> Option<&EnvironmentOutcome> {
        self.environments.iter().find(|e| e.environment == name)
    }
}

/// Counts per classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of tests
    pub total: usize,
    /// Passed tests
    pub passed: usize,
    /// Failed tests
    pub failed: usize,
    /// Flaky tests
    pub flaky: usize,
    /// Unclassified tests
    pub unknown: usize,
}

impl RunSummary {
    /// Passed tests over all tests, 0 for an empty run
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64
        }
    }

    fn count(&mut self, classification: Classification) {
        self.total += 1;
        match classification {
            Classification::Passed => self.passed += 1,
            Classification::Failed => self.failed += 1,
            Classification::Flaky => self.flaky += 1,
            Classification::Unknown => self.unknown += 1,
        }
    }
}

/// Everything the reducer produced for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Results keyed by test name
    pub results: BTreeMap<String, ConsolidatedResult>,
    /// Counts
    pub summary: RunSummary,
    /// SHA-256 of the canonical record set
    pub fingerprint: String,
}

impl RunReport {
    /// Result for a test
    #[must_use]
    pub fn get(&self, test_name: &str) -> Option<&ConsolidatedResult> {
        self.results.get(test_name)
    }

    /// Results in test name order
    pub fn iter(&self) -> impl Iterator<Item = &ConsolidatedResult> {
        self.results.values()
    }

    /// Results with a given classification
    pub fn with_classification(
        &self,
        classification: Classification,
    ) -> impl Iterator<Item = &ConsolidatedResult> {
        self.results
            .values()
            .filter(move |r| r.classification == classification)
    }

    /// Number of tests
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the run had no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Hash the canonical record set
#[must_use]
pub fn fingerprint(canonical: &[ExecutionRecord]) -> String {
    let mut hasher = Sha256::new();
    for record in canonical {
        match serde_json::to_vec(record) {
            Ok(bytes) => hasher.update(&bytes),
            Err(_) => hasher.update(format!("{record:?}").as_bytes()),
        }
        hasher.update(b"\n");
    }
    let result = hasher.finalize();
    format!("{result:x}")
}

/// Folds execution records into per-test results
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionReducer {
    heuristic: HeuristicConfig,
}

impl ExecutionReducer {
    /// Create a reducer
    #[must_use]
    pub const fn new(heuristic: HeuristicConfig) -> Self {
        Self { heuristic }
    }

    /// Active heuristic penalties
    #[must_use]
    pub const fn heuristic(&self) -> &HeuristicConfig {
        &self.heuristic
    }

    /// Reduce a run's records.
    ///
    /// The output depends only on the multiset of records, not their order.
    #[must_use]
    pub fn reduce(&self, records: &[ExecutionRecord], telemetry: &TelemetryStore) -> RunReport {
        let mut canonical = records.to_vec();
        canonical.sort();

        let mut grouped: BTreeMap<&str, BTreeMap<&str, Vec<&ExecutionRecord>>> = BTreeMap::new();
        for record in &canonical {
            grouped
                .entry(record.test_name.as_str())
                .or_default()
                .entry(record.environment.as_str())
                .or_default()
                .push(record);
        }

        let mut results = BTreeMap::new();
        let mut summary = RunSummary::default();
        for (test_name, environments) in grouped {
            let result = self.reduce_test(test_name, &environments, telemetry);
            summary.count(result.classification);
            results.insert(test_name.to_string(), result);
        }

        info!(
            tests = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            flaky = summary.flaky,
            unknown = summary.unknown,
            "reduced execution records"
        );

        RunReport {
            results,
            summary,
            fingerprint: fingerprint(&canonical),
        }
    }

    fn reduce_test(
        &self,
        test_name: &str,
        environments: &BTreeMap<&str, Vec<&ExecutionRecord>>,
        telemetry: &TelemetryStore,
    ) -> ConsolidatedResult {
        let outcomes: Vec<EnvironmentOutcome> = environments
            .iter()
            .map(|(environment, attempts)| {
                let statuses: Vec<ExecutionStatus> = attempts.iter().map(|r| r.status).collect();
                let classification = classify_sequence(&statuses);
                if classification == Classification::Unknown {
                    warn!(
                        test = test_name,
                        environment = *environment,
                        "no recognized status for environment"
                    );
                }
                EnvironmentOutcome {
                    environment: (*environment).to_string(),
                    classification,
                    attempts: attempts.len(),
                    duration_ms: attempts
                        .iter()
                        .map(|r| r.duration_ms)
                        .fold(0u64, u64::saturating_add),
                }
            })
            .collect();

        let classification = consolidate(outcomes.iter().map(|o| o.classification));
        let retry_count = outcomes.iter().map(EnvironmentOutcome::retries).sum();
        let total_duration_ms = outcomes
            .iter()
            .map(|o| o.duration_ms)
            .fold(0u64, u64::saturating_add);
        let contributing_records: Vec<ExecutionRecord> = environments
            .values()
            .flatten()
            .map(|r| (*r).clone())
            .collect();

        let (selector_quality_score, score_source) = match telemetry.mean_for(test_name) {
            Some(mean) => (mean.clamp(0.0, 1.0), ScoreSource::Telemetry),
            None => (
                self.heuristic_score(&contributing_records, retry_count),
                ScoreSource::Heuristic,
            ),
        };

        debug!(
            test = test_name,
            classification = %classification,
            retries = retry_count,
            score = selector_quality_score,
            source = ?score_source,
            "consolidated test"
        );

        ConsolidatedResult {
            test_name: test_name.to_string(),
            classification,
            retry_count,
            selector_quality_score,
            score_source,
            environments: outcomes,
            total_duration_ms,
            contributing_records,
        }
    }

    fn heuristic_score(&self, records: &[ExecutionRecord], retries: usize) -> f64 {
        let failed = records.iter().filter(|r| r.status.is_failed()).count();
        let complexities: Vec<f64> = records
            .iter()
            .flat_map(|r| r.selectors.iter())
            .map(|s| selector_complexity(s))
            .collect();
        let complexity = if complexities.is_empty() {
            0.0
        } else {
            complexities.iter().sum::<f64>() / complexities.len() as f64
        };
        self.heuristic.score(failed, retries, complexity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ExecutionStatus::{Failed, FlakyMarker, Passed, Unknown};

    fn record(test: &str, env: &str, attempt: u32, status: ExecutionStatus) -> ExecutionRecord {
        ExecutionRecord::new(test, env, attempt, status)
    }

    fn reduce(records: &[ExecutionRecord]) -> RunReport {
        ExecutionReducer::default().reduce(records, &TelemetryStore::new())
    }

    mod sequence_tests {
        use super::*;

        #[test]
        fn test_failed_then_passed_is_flaky() {
            assert_eq!(classify_sequence(&[Failed, Passed]), Classification::Flaky);
        }

        #[test]
        fn test_failed_twice_is_failed() {
            assert_eq!(classify_sequence(&[Failed, Failed]), Classification::Failed);
        }

        #[test]
        fn test_single_pass() {
            assert_eq!(classify_sequence(&[Passed]), Classification::Passed);
        }

        #[test]
        fn test_marker_wins_regardless_of_position() {
            assert_eq!(
                classify_sequence(&[Passed, FlakyMarker, Passed]),
                Classification::Flaky
            );
            assert_eq!(
                classify_sequence(&[Failed, Failed, FlakyMarker]),
                Classification::Flaky
            );
            assert_eq!(classify_sequence(&[FlakyMarker]), Classification::Flaky);
        }

        #[test]
        fn test_passed_then_failed_uses_last() {
            assert_eq!(classify_sequence(&[Passed, Failed]), Classification::Failed);
        }

        #[test]
        fn test_failed_then_unknown_uses_last() {
            assert_eq!(classify_sequence(&[Failed, Unknown]), Classification::Unknown);
        }

        #[test]
        fn test_middle_attempts_ignored() {
            assert_eq!(
                classify_sequence(&[Failed, Passed, Failed]),
                Classification::Failed
            );
        }

        #[test]
        fn test_empty_and_single_unknown() {
            assert_eq!(classify_sequence(&[]), Classification::Unknown);
            assert_eq!(classify_sequence(&[Unknown]), Classification::Unknown);
        }
    }

    mod consolidate_tests {
        use super::*;
        use Classification as C;

        #[test]
        fn test_flaky_dominates_passed() {
            assert_eq!(consolidate([C::Flaky, C::Passed]), C::Flaky);
        }

        #[test]
        fn test_failed_dominates_passed() {
            assert_eq!(consolidate([C::Passed, C::Failed]), C::Failed);
        }

        #[test]
        fn test_all_passed() {
            assert_eq!(consolidate([C::Passed, C::Passed]), C::Passed);
        }

        #[test]
        fn test_flaky_dominates_failed() {
            assert_eq!(consolidate([C::Failed, C::Flaky]), C::Flaky);
        }

        #[test]
        fn test_unknown_ignored_when_any_known() {
            assert_eq!(consolidate([C::Unknown, C::Passed]), C::Passed);
        }

        #[test]
        fn test_all_unknown() {
            assert_eq!(consolidate([C::Unknown, C::Unknown]), C::Unknown);
            assert_eq!(consolidate([]), C::Unknown);
        }
    }

    mod reducer_tests {
        use super::*;

        #[test]
        fn test_cross_environment_flaky() {
            let report = reduce(&[
                record("login", "chromium", 0, Failed),
                record("login", "chromium", 1, Passed),
                record("login", "firefox", 0, Passed),
            ]);
            let r = report.get("login").unwrap();
            assert_eq!(r.classification, Classification::Flaky);
            assert_eq!(r.retry_count, 1);
            assert_eq!(
                r.environment("chromium").unwrap().classification,
                Classification::Flaky
            );
            assert_eq!(report.summary.flaky, 1);
        }

        #[test]
        fn test_cross_environment_failed() {
            let report = reduce(&[
                record("cart", "chromium", 0, Passed),
                record("cart", "webkit", 0, Failed),
            ]);
            assert_eq!(
                report.get("cart").unwrap().classification,
                Classification::Failed
            );
        }

        #[test]
        fn test_retry_count_sums_environments() {
            let report = reduce(&[
                record("t", "a", 0, Failed),
                record("t", "a", 1, Failed),
                record("t", "a", 2, Passed),
                record("t", "b", 0, Failed),
                record("t", "b", 1, Passed),
            ]);
            assert_eq!(report.get("t").unwrap().retry_count, 3);
        }

        #[test]
        fn test_attempts_sorted_by_index() {
            let report = reduce(&[
                record("t", "a", 1, Passed),
                record("t", "a", 0, Failed),
            ]);
            let r = report.get("t").unwrap();
            assert_eq!(r.classification, Classification::Flaky);
            assert_eq!(r.contributing_records[0].attempt_index, 0);
        }

        #[test]
        fn test_unknown_status_degrades() {
            let report = reduce(&[record("t", "a", 0, Unknown)]);
            assert_eq!(
                report.get("t").unwrap().classification,
                Classification::Unknown
            );
            assert_eq!(report.summary.unknown, 1);
        }

        #[test]
        fn test_empty_test_name_grouped_literally() {
            let report = reduce(&[record("", "a", 0, Passed), record("", "b", 0, Passed)]);
            assert_eq!(report.len(), 1);
            assert_eq!(report.get("").unwrap().environments.len(), 2);
        }

        #[test]
        fn test_empty_input() {
            let report = reduce(&[]);
            assert!(report.is_empty());
            assert_eq!(report.summary.pass_rate(), 0.0);
        }

        #[test]
        fn test_durations_summed() {
            let report = reduce(&[
                record("t", "a", 0, Failed).with_duration(100),
                record("t", "a", 1, Passed).with_duration(50),
                record("t", "b", 0, Passed).with_duration(70),
            ]);
            let r = report.get("t").unwrap();
            assert_eq!(r.total_duration_ms, 220);
            assert_eq!(r.environment("a").unwrap().duration_ms, 150);
        }

        #[test]
        fn test_durations_saturate() {
            let report = reduce(&[
                record("t", "a", 0, Failed).with_duration(u64::MAX),
                record("t", "a", 1, Passed).with_duration(1),
                record("t", "b", 0, Passed).with_duration(u64::MAX),
            ]);
            let r = report.get("t").unwrap();
            assert_eq!(r.environment("a").unwrap().duration_ms, u64::MAX);
            assert_eq!(r.total_duration_ms, u64::MAX);
            assert_eq!(r.classification, Classification::Flaky);
        }

        #[test]
        fn test_order_independent_and_idempotent() {
            let records = vec![
                record("b", "webkit", 0, Failed).with_selector("#pay > button:nth-child(2)"),
                record("a", "chromium", 1, Passed),
                record("b", "webkit", 1, Passed),
                record("a", "chromium", 0, Failed),
                record("a", "firefox", 0, Passed),
            ];
            let mut reversed = records.clone();
            reversed.reverse();
            let first = reduce(&records);
            assert_eq!(first, reduce(&reversed));
            assert_eq!(first, reduce(&records));
            assert_eq!(first.fingerprint.len(), 64);
        }

        #[test]
        fn test_fingerprint_changes_with_input() {
            let a = reduce(&[record("t", "a", 0, Passed)]);
            let b = reduce(&[record("t", "a", 0, Failed)]);
            assert_ne!(a.fingerprint, b.fingerprint);
        }

        #[test]
        fn test_summary_counts() {
            let report = reduce(&[
                record("a", "x", 0, Passed),
                record("b", "x", 0, Failed),
                record("c", "x", 0, FlakyMarker),
                record("d", "x", 0, Passed),
            ]);
            assert_eq!(report.summary.total, 4);
            assert_eq!(report.summary.passed, 2);
            assert!((report.summary.pass_rate() - 0.5).abs() < 1e-9);
            assert_eq!(report.with_classification(Classification::Failed).count(), 1);
        }
    }

    mod quality_tests {
        use super::*;

        #[test]
        fn test_telemetry_preferred() {
            let mut telemetry = TelemetryStore::new();
            telemetry.record("t", 0.9);
            telemetry.record("t", 0.7);
            let report = ExecutionReducer::default().reduce(
                &[record("t", "a", 0, Failed), record("t", "a", 1, Failed)],
                &telemetry,
            );
            let r = report.get("t").unwrap();
            assert_eq!(r.score_source, ScoreSource::Telemetry);
            assert!((r.selector_quality_score - 0.8).abs() < 1e-9);
            assert!((r.reporting_score() - 8.0).abs() < 1e-9);
        }

        #[test]
        fn test_heuristic_fallback() {
            let report = reduce(&[
                record("t", "a", 0, Failed),
                record("t", "a", 1, Passed),
            ]);
            let r = report.get("t").unwrap();
            assert_eq!(r.score_source, ScoreSource::Heuristic);
            // one failure, one retry, no selectors
            assert!((r.selector_quality_score - 0.7).abs() < 1e-9);
        }

        #[test]
        fn test_clean_run_scores_one() {
            let report = reduce(&[record("t", "a", 0, Passed)]);
            assert_eq!(report.get("t").unwrap().selector_quality_score, 1.0);
        }

        #[test]
        fn test_heavy_failure_clamps_to_zero() {
            let records: Vec<_> = (0..10).map(|i| record("t", "a", i, Failed)).collect();
            assert_eq!(reduce(&records).get("t").unwrap().selector_quality_score, 0.0);
        }

        #[test]
        fn test_complexity() {
            assert_eq!(selector_complexity(""), 0.0);
            let simple = selector_complexity("role=button[name=\"Save\"]");
            let nested = selector_complexity("//div[3]/following-sibling::span[2] >> nth=0");
            assert!(simple < 0.2, "{simple}");
            assert!(nested > simple);
            assert!(nested <= 1.0);
        }

        #[test]
        fn test_complex_selectors_lower_score() {
            let plain = reduce(&[record("t", "a", 0, Passed).with_selector("[data-testid=\"pay\"]")]);
            let brittle = reduce(&[record("t", "a", 0, Passed)
                .with_selector("body > div:nth-child(3) > form > button:nth-of-type(2)")]);
            assert!(
                brittle.get("t").unwrap().selector_quality_score
                    < plain.get("t").unwrap().selector_quality_score
            );
        }

        #[test]
        fn test_config_validation() {
            assert!(HeuristicConfig::default().validate().is_ok());
            assert!(HeuristicConfig::default()
                .with_retry_penalty(-0.1)
                .validate()
                .is_err());
            assert!(HeuristicConfig::default()
                .with_failure_penalty(f64::NAN)
                .validate()
                .is_err());
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn status() -> impl Strategy<Value = ExecutionStatus> {
            prop_oneof![
                Just(Passed),
                Just(Failed),
                Just(FlakyMarker),
                Just(Unknown)
            ]
        }

        fn records() -> impl Strategy<Value = Vec<ExecutionRecord>> {
            prop::collection::vec(
                ("[ab]", "[xy]", 0u32..4, status(), "[a-z#>: ]{0,40}"),
                0..12,
            )
            .prop_map(|rows| {
                rows.into_iter()
                    .map(|(t, e, i, s, sel)| record(&t, &e, i, s).with_selector(sel))
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn prop_heuristic_bounded(failed in 0usize..50, retries in 0usize..50, complexity in -1.0f64..2.0) {
                let score = HeuristicConfig::default().score(failed, retries, complexity);
                prop_assert!((0.0..=1.0).contains(&score));
            }

            #[test]
            fn prop_heuristic_non_increasing_in_retries(failed in 0usize..5, retries in 0usize..20, complexity in 0.0f64..1.0) {
                let h = HeuristicConfig::default();
                prop_assert!(h.score(failed, retries + 1, complexity) <= h.score(failed, retries, complexity));
            }

            #[test]
            fn prop_complexity_bounded(s in ".{0,300}") {
                let c = selector_complexity(&s);
                prop_assert!((0.0..=1.0).contains(&c));
            }

            #[test]
            fn prop_reduce_order_independent(mut rows in records()) {
                let forward = reduce(&rows);
                rows.reverse();
                prop_assert_eq!(forward, reduce(&rows));
            }

            #[test]
            fn prop_scores_in_range(rows in records()) {
                for result in reduce(&rows).iter() {
                    prop_assert!((0.0..=1.0).contains(&result.selector_quality_score));
                    prop_assert!((0.0..=10.0).contains(&result.reporting_score()));
                }
            }
        }
    }
}
