//! Action guard: validated interactions with one bounded recovery.
//!
//! ```text
//!   Initial ──ok──────────────────────────────► done (attempts = 1)
//!      │
//!      └─err (recoverable)─► wait_for_visible ─► Recovery ──ok──► done (attempts = 2)
//!                                                   │
//!                                                   └─err─► HealFailed { original }
//! ```
//!
//! There is no loop: worst case is one validation + action, one wait of
//! `recovery_timeout`, and one more validation + action. When the first
//! attempt failed on match count and the reference carries a qualifying
//! alternate, recovery moves to that alternate instead of the same selector.

use crate::candidate::{Selector, Strategy};
use crate::grounding::LiveReference;
use crate::page::Page;
use crate::result::{ResoluteError, ResoluteResult};
use crate::validator::validate;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Default recovery wait window (5 seconds)
pub const DEFAULT_RECOVERY_TIMEOUT_MS: u64 = 5000;

/// Action guard options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Wait window before the single retry, in milliseconds
    pub recovery_timeout_ms: u64,
    /// Whether the recovery attempt is made at all
    pub heal: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            recovery_timeout_ms: DEFAULT_RECOVERY_TIMEOUT_MS,
            heal: true,
        }
    }
}

impl GuardConfig {
    /// Set the recovery wait window
    #[must_use]
    pub const fn with_recovery_timeout(mut self, timeout_ms: u64) -> Self {
        self.recovery_timeout_ms = timeout_ms;
        self
    }

    /// Enable or disable recovery
    #[must_use]
    pub const fn with_heal(mut self, heal: bool) -> Self {
        self.heal = heal;
        self
    }

    /// Recovery window as Duration
    #[must_use]
    pub const fn recovery_timeout(&self) -> Duration {
        Duration::from_millis(self.recovery_timeout_ms)
    }
}

/// Phase in which an action finally succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptPhase {
    /// First attempt
    Initial,
    /// The single recovery attempt
    Recovery,
}

/// Interaction to perform on a grounded element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction<'a> {
    /// Click
    Click,
    /// Replace the element's value
    Fill(&'a str),
}

impl Interaction<'_> {
    /// Action name for logs and errors
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Fill(_) => "fill",
        }
    }
}

/// Result of a guarded interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Target key
    pub target_key: String,
    /// Action name
    pub action: String,
    /// Selector the successful attempt used
    pub selector: Selector,
    /// Strategy of that selector
    pub strategy: Strategy,
    /// Phase that succeeded
    pub phase: AttemptPhase,
}

impl ActionOutcome {
    /// Whether recovery was needed
    #[must_use]
    pub fn healed(&self) -> bool {
        self.phase == AttemptPhase::Recovery
    }

    /// Attempts made (1 or 2)
    #[must_use]
    pub fn attempts(&self) -> u8 {
        match self.phase {
            AttemptPhase::Initial => 1,
            AttemptPhase::Recovery => 2,
        }
    }
}

/// Wraps interactions with validation and a single recovery attempt
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionGuard {
    config: GuardConfig,
}

impl ActionGuard {
    /// Create a guard
    #[must_use]
    pub const fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Validate then click
    ///
    /// # Errors
    ///
    /// Returns the original error when recovery is disabled or not applicable,
    /// otherwise `HealFailed` carrying it if the recovery attempt also failed
    pub fn safe_click<P: Page + ?Sized>(
        &self,
        page: &mut P,
        reference: &LiveReference,
    ) -> ResoluteResult<ActionOutcome> {
        self.perform(page, reference, Interaction::Click)
    }

    /// Validate then fill
    ///
    /// # Errors
    ///
    /// Same as [`ActionGuard::safe_click`]
    pub fn safe_fill<P: Page + ?Sized>(
        &self,
        page: &mut P,
        reference: &LiveReference,
        value: &str,
    ) -> ResoluteResult<ActionOutcome> {
        self.perform(page, reference, Interaction::Fill(value))
    }

    /// Run an interaction through the two-state policy
    ///
    /// # Errors
    ///
    /// Same as [`ActionGuard::safe_click`]
    pub fn perform<P: Page + ?Sized>(
        &self,
        page: &mut P,
        reference: &LiveReference,
        interaction: Interaction<'_>,
    ) -> ResoluteResult<ActionOutcome> {
        let primary = reference.selector();
        let original = match attempt(page, primary, interaction) {
            Ok(()) => {
                return Ok(outcome(
                    reference,
                    interaction,
                    primary,
                    AttemptPhase::Initial,
                ))
            }
            Err(err) => err,
        };

        if !self.config.heal || !original.is_recoverable() {
            return Err(original);
        }

        let retry_selector = if original.is_match_error() {
            reference
                .next_alternate()
                .map_or(primary, |alternate| &alternate.selector)
        } else {
            primary
        };
        info!(
            target = %reference.target_key,
            action = interaction.name(),
            error = %original,
            retry = %retry_selector,
            timeout_ms = self.config.recovery_timeout_ms,
            "attempting recovery"
        );

        let recovery = page
            .wait_for_visible(retry_selector, self.config.recovery_timeout())
            .and_then(|()| attempt(page, retry_selector, interaction));

        match recovery {
            Ok(()) => Ok(outcome(
                reference,
                interaction,
                retry_selector,
                AttemptPhase::Recovery,
            )),
            Err(retry_err) => {
                warn!(
                    target = %reference.target_key,
                    action = interaction.name(),
                    retry_error = %retry_err,
                    "recovery failed"
                );
                Err(ResoluteError::HealFailed {
                    action: interaction.name().to_string(),
                    target: reference.target_key.clone(),
                    original: Box::new(original),
                })
            }
        }
    }
}

fn attempt<P: Page + ?Sized>(
    page: &mut P,
    selector: &Selector,
    interaction: Interaction<'_>,
) -> ResoluteResult<()> {
    validate(page, selector)?;
    match interaction {
        Interaction::Click => page.click(selector),
        Interaction::Fill(value) => page.fill(selector, value),
    }
}

fn outcome(
    reference: &LiveReference,
    interaction: Interaction<'_>,
    selector: &Selector,
    phase: AttemptPhase,
) -> ActionOutcome {
    ActionOutcome {
        target_key: reference.target_key.clone(),
        action: interaction.name().to_string(),
        selector: selector.clone(),
        strategy: selector.strategy(),
        phase,
    }
}
