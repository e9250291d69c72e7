//! Resolute: selector grounding and execution classification for E2E tests
//!
//! Two engines share one crate:
//!
//! - **Grounding**: turn a semantic [`Target`] into one trustworthy live
//!   element reference, validate it before every interaction, and recover
//!   from transient failures exactly once.
//! - **Classification**: fold per-attempt, per-environment
//!   [`ExecutionRecord`]s into one passed / failed / flaky verdict per test
//!   with a bounded selector quality score.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌────────┐   ┌──────────┐   ┌───────┐
//! │ Target   │──►│ Candidate │──►│ Scorer │──►│ Grounder │──►│ Guard │
//! │ (plan)   │   │ generator │   │        │   │          │   │       │
//! └──────────┘   └───────────┘   └────────┘   └────┬─────┘   └───┬───┘
//!                                                  │ telemetry   │ records
//!                                                  ▼             ▼
//!                                             ┌──────────────────────┐
//!                                             │  ExecutionReducer    │
//!                                             │  → RunReport         │
//!                                             └──────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use resolute::prelude::*;
//!
//! let mut page = MockPage::new().with(
//!     &Selector::role("button", "Sign in"),
//!     vec![ElementState::interactable()],
//! );
//! let target = Target::new("submit").with_role("button").with_name("Sign in");
//!
//! let reference = Grounder::default().ground(&page, &target)?;
//! let outcome = ActionGuard::default().safe_click(&mut page, &reference)?;
//! assert_eq!(outcome.attempts(), 1);
//! # Ok::<(), ResoluteError>(())
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod candidate;
pub mod config;
pub mod execution;
pub mod grounding;
pub mod guard;
pub mod mock;
pub mod page;
pub mod plan;
pub mod reducer;
mod result;
pub mod scoring;
pub mod telemetry;
pub mod validator;

pub use candidate::{generate_candidates, Selector, SelectorCandidate, Strategy};
pub use config::ResoluteConfig;
pub use execution::{load_records, parse_records, Attachment, ExecutionRecord, ExecutionStatus};
pub use grounding::{select, Grounder, GroundingConfig, LiveReference, DEFAULT_SCORE_THRESHOLD};
pub use guard::{
    ActionGuard, ActionOutcome, AttemptPhase, GuardConfig, Interaction,
    DEFAULT_RECOVERY_TIMEOUT_MS,
};
pub use mock::{MockAction, MockPage};
pub use page::{ElementState, Page, Scope};
pub use plan::{Plan, Step, Target};
pub use reducer::{
    classify_sequence, consolidate, selector_complexity, Classification, ConsolidatedResult,
    EnvironmentOutcome, ExecutionReducer, HeuristicConfig, RunReport, RunSummary, ScoreSource,
};
pub use result::{ResoluteError, ResoluteResult};
pub use scoring::{ScoreBreakdown, ScoreInputs, Scorer, ScoringWeights};
pub use telemetry::TelemetryStore;
pub use validator::validate;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::candidate::*;
    pub use super::config::*;
    pub use super::execution::*;
    pub use super::grounding::*;
    pub use super::guard::*;
    pub use super::mock::*;
    pub use super::page::*;
    pub use super::plan::*;
    pub use super::reducer::*;
    pub use super::result::*;
    pub use super::scoring::{ScoreBreakdown, ScoreInputs, Scorer, ScoringWeights};
    pub use super::telemetry::*;
    pub use super::validator::validate;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::prelude::*;

    mod pipeline_tests {
        use super::*;

        const LOGIN_PLAN: &str = r#"
name: login
steps:
  - id: credentials
    intent: Enter credentials
    targets:
      - key: email
        label: Email
      - key: password
        placeholder: Password
  - id: submit
    intent: Sign in
    targets:
      - key: submit
        role: button
        name: Sign in
        test_id: login-submit
"#;

        const LOGIN_PAGE: &str = r#"
elements:
  'label="Email"':
    - { visible: true, depth: 4 }
  'placeholder="Password"':
    - { visible: true, depth: 4 }
  'role=button[name="Sign in"]':
    - { visible: false, depth: 5 }
  '[data-testid="login-submit"]':
    - { visible: false, depth: 5 }
on_wait:
  'role=button[name="Sign in"]':
    - { visible: true, depth: 5 }
"#;

        #[test]
        fn test_plan_to_report() {
            let plan = Plan::from_yaml(LOGIN_PLAN).unwrap();
            let mut page = MockPage::from_yaml(LOGIN_PAGE).unwrap();
            let config = ResoluteConfig::default();
            let grounder = config.grounder();
            let guard = config.guard();
            let mut telemetry = TelemetryStore::new();

            let credentials = plan.step("credentials").unwrap();
            for target in &credentials.targets {
                let reference = grounder
                    .ground_recorded(&page, target, "login", &mut telemetry)
                    .unwrap();
                guard.safe_fill(&mut page, &reference, "secret").unwrap();
            }

            // hidden button: role scores 0.89 and still qualifies
            let submit = plan.step("submit").unwrap().target("submit").unwrap();
            let reference = grounder
                .ground_recorded(&page, submit, "login", &mut telemetry)
                .unwrap();
            assert_eq!(reference.strategy(), Strategy::Role);
            let outcome = guard.safe_click(&mut page, &reference).unwrap();
            assert!(outcome.healed());

            let records = vec![
                ExecutionRecord::new("login", "chromium", 0, ExecutionStatus::Failed),
                ExecutionRecord::new("login", "chromium", 1, ExecutionStatus::Passed),
            ];
            let report = config.reducer().reduce(&records, &telemetry);
            let result = report.get("login").unwrap();
            assert_eq!(result.classification, Classification::Flaky);
            assert_eq!(result.score_source, ScoreSource::Telemetry);
            assert!(result.selector_quality_score > 0.8);
        }
    }
}
