//! In-memory [`Page`] for tests and offline grounding.
//!
//! Elements are keyed by selector expression (the `Display` form of a
//! [`Selector`]). A page can be scripted to reveal elements when waited on and
//! to reject a number of interactions, which is enough to exercise every path
//! of the validator and the action guard without a browser.
//!
//! Page snapshots deserialize from YAML:
//!
//! ```yaml
//! elements:
//!   'role=button[name="Save"]':
//!     - { visible: true, enabled: true, depth: 3 }
//!   'label="Email"':
//!     - { visible: false }
//! on_wait:
//!   'label="Email"':
//!     - { visible: true }
//! ```

use crate::candidate::Selector;
use crate::page::{ElementState, Page};
use crate::result::{ResoluteError, ResoluteResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Interaction recorded by a [`MockPage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockAction {
    /// Click on expression
    Click(String),
    /// Fill expression with value
    Fill(String, String),
    /// Wait for expression with timeout in ms
    Wait(String, u64),
}

/// Scriptable in-memory page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockPage {
    /// Current matches per expression
    #[serde(default)]
    elements: BTreeMap<String, Vec<ElementState>>,
    /// Matches an expression switches to once waited on
    #[serde(default)]
    on_wait: BTreeMap<String, Vec<ElementState>>,
    /// Remaining interactions to reject per expression
    #[serde(default)]
    failures: BTreeMap<String, usize>,
    #[serde(skip)]
    values: BTreeMap<String, String>,
    #[serde(skip)]
    log: Vec<MockAction>,
}

impl MockPage {
    /// Create an empty page
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a page snapshot from YAML
    ///
    /// # Errors
    ///
    /// Returns a YAML error on malformed input
    pub fn from_yaml(yaml: &str) -> ResoluteResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load a page snapshot file (YAML or JSON)
    ///
    /// # Errors
    ///
    /// Returns an I/O or parse error
    pub fn load(path: &Path) -> ResoluteResult<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(serde_json::from_str(&content)?),
            _ => Self::from_yaml(&content),
        }
    }

    /// Set the elements a selector matches
    #[must_use]
    pub fn with(mut self, selector: &Selector, states: Vec<ElementState>) -> Self {
        self.elements.insert(selector.to_string(), states);
        self
    }

    /// Set the elements a selector matches after a wait
    #[must_use]
    pub fn with_on_wait(mut self, selector: &Selector, states: Vec<ElementState>) -> Self {
        self.on_wait.insert(selector.to_string(), states);
        self
    }

    /// Reject the next `count` interactions with a selector
    #[must_use]
    pub fn with_failures(mut self, selector: &Selector, count: usize) -> Self {
        self.failures.insert(selector.to_string(), count);
        self
    }

    /// Replace the matches of a selector
    pub fn set(&mut self, selector: &Selector, states: Vec<ElementState>) {
        self.elements.insert(selector.to_string(), states);
    }

    /// Interactions performed so far
    #[must_use]
    pub fn actions(&self) -> &[MockAction] {
        &self.log
    }

    /// Number of clicks performed on a selector
    #[must_use]
    pub fn click_count(&self, selector: &Selector) -> usize {
        let expr = selector.to_string();
        self.log
            .iter()
            .filter(|a| matches!(a, MockAction::Click(e) if *e == expr))
            .count()
    }

    /// Value last filled into a selector
    #[must_use]
    pub fn value_of(&self, selector: &Selector) -> Option<&str> {
        self.values.get(&selector.to_string()).map(String::as_str)
    }

    fn interact(&mut self, action: &str, expr: &str) -> ResoluteResult<()> {
        if let Some(remaining) = self.failures.get_mut(expr) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(ResoluteError::ActionFailed {
                    action: action.to_string(),
                    selector: expr.to_string(),
                    message: "interaction rejected".to_string(),
                });
            }
        }
        if self.elements.get(expr).map_or(true, Vec::is_empty) {
            return Err(ResoluteError::ActionFailed {
                action: action.to_string(),
                selector: expr.to_string(),
                message: "no element to interact with".to_string(),
            });
        }
        Ok(())
    }
}

impl Page for MockPage {
    fn probe(&self, selector: &Selector) -> ResoluteResult<Vec<ElementState>> {
        Ok(self
            .elements
            .get(&selector.to_string())
            .cloned()
            .unwrap_or_default())
    }

    fn click(&mut self, selector: &Selector) -> ResoluteResult<()> {
        let expr = selector.to_string();
        self.interact("click", &expr)?;
        self.log.push(MockAction::Click(expr));
        Ok(())
    }

    fn fill(&mut self, selector: &Selector, value: &str) -> ResoluteResult<()> {
        let expr = selector.to_string();
        self.interact("fill", &expr)?;
        self.values.insert(expr.clone(), value.to_string());
        self.log.push(MockAction::Fill(expr, value.to_string()));
        Ok(())
    }

    fn wait_for_visible(&mut self, selector: &Selector, timeout: Duration) -> ResoluteResult<()> {
        let expr = selector.to_string();
        let ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self.log.push(MockAction::Wait(expr.clone(), ms));
        if let Some(states) = self.on_wait.remove(&expr) {
            self.elements.insert(expr.clone(), states);
        }
        let visible = self
            .elements
            .get(&expr)
            .is_some_and(|states| states.iter().any(|s| s.visible));
        if visible {
            Ok(())
        } else {
            Err(ResoluteError::Timeout { ms })
        }
    }
}
