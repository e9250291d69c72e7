//! Live page abstraction.
//!
//! The core never drives a browser itself. Anything that can count matches,
//! report element state and perform clicks/fills implements [`Page`]: a CDP
//! client, a WebDriver session, or the in-memory [`crate::mock::MockPage`].
//!
//! Callers must serialize interactions with one page; mutating operations take
//! `&mut self` so the borrow checker enforces it.

use crate::candidate::Selector;
use crate::result::ResoluteResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Boundary an element sits behind, relative to the top document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Same frame as the top document
    #[default]
    Document,
    /// Inside an open shadow root
    ShadowRoot,
    /// Inside a child frame
    Frame,
}

/// Live state of one matched element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementState {
    /// Rendered and not hidden
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Not disabled
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// DOM nesting depth from the scope root
    #[serde(default)]
    pub depth: u32,
    /// Scope boundary
    #[serde(default)]
    pub scope: Scope,
}

const fn default_true() -> bool {
    true
}

impl Default for ElementState {
    fn default() -> Self {
        Self {
            visible: true,
            enabled: true,
            depth: 0,
            scope: Scope::Document,
        }
    }
}

impl ElementState {
    /// A visible, enabled, shallow element in the top document
    #[must_use]
    pub fn interactable() -> Self {
        Self::default()
    }

    /// A hidden element
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::default()
        }
    }

    /// A visible but disabled element
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Set the nesting depth
    #[must_use]
    pub const fn at_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Set the scope boundary
    #[must_use]
    pub const fn in_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Visible and enabled
    #[must_use]
    pub const fn is_interactable(&self) -> bool {
        self.visible && self.enabled
    }
}

/// Operations the core needs from a live page
pub trait Page {
    /// State of every element the selector currently matches, in document order
    ///
    /// # Errors
    ///
    /// Returns error if the page cannot be queried
    fn probe(&self, selector: &Selector) -> ResoluteResult<Vec<ElementState>>;

    /// Click the single element matched by the selector
    ///
    /// # Errors
    ///
    /// Returns `ActionFailed` if the engine rejects the interaction
    fn click(&mut self, selector: &Selector) -> ResoluteResult<()>;

    /// Replace the value of the element matched by the selector
    ///
    /// # Errors
    ///
    /// Returns `ActionFailed` if the engine rejects the interaction
    fn fill(&mut self, selector: &Selector, value: &str) -> ResoluteResult<()>;

    /// Block until the selector matches a visible element or the window elapses
    ///
    /// # Errors
    ///
    /// Returns `Timeout` when the window elapses first
    fn wait_for_visible(&mut self, selector: &Selector, timeout: Duration) -> ResoluteResult<()>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_interactable() {
        let state = ElementState::default();
        assert!(state.is_interactable());
        assert_eq!(state.scope, Scope::Document);
        assert_eq!(state.depth, 0);
    }

    #[test]
    fn test_hidden_and_disabled() {
        assert!(!ElementState::hidden().is_interactable());
        assert!(!ElementState::disabled().is_interactable());
        assert!(ElementState::disabled().visible);
    }

    #[test]
    fn test_builders() {
        let state = ElementState::interactable()
            .at_depth(12)
            .in_scope(Scope::Frame);
        assert_eq!(state.depth, 12);
        assert_eq!(state.scope, Scope::Frame);
    }

    #[test]
    fn test_deserialize_defaults() {
        let state: ElementState = serde_json::from_str("{}").unwrap();
        assert!(state.visible);
        assert!(state.enabled);
        let state: ElementState =
            serde_json::from_str(r#"{"visible": false, "scope": "shadow_root"}"#)
                .unwrap();
        assert!(!state.visible);
        assert_eq!(state.scope, Scope::ShadowRoot);
    }
}
