//! Candidate generation: from a semantic [`Target`] to concrete selectors.
//!
//! Every hint on a target yields one independent candidate. Candidates are
//! produced in a fixed priority order that reflects how robust each strategy
//! tends to be against markup drift:
//!
//! ```text
//! role+name  >  label  >  placeholder  >  test id  >  scoped fallback  >  structural
//! ```
//!
//! The structural candidate (role plus literal text) is a last resort and is
//! only derived when no explicit hint produced anything.

use crate::plan::{non_blank, Target};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Location strategy, in generator priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// ARIA role plus accessible name
    Role,
    /// Associated `<label>` text
    Label,
    /// Placeholder text
    Placeholder,
    /// `data-testid` attribute
    TestId,
    /// Author-supplied scoped expression
    Scoped,
    /// Derived role and/or literal text match
    Structural,
}

impl Strategy {
    /// All strategies in priority order
    pub const ALL: [Self; 6] = [
        Self::Role,
        Self::Label,
        Self::Placeholder,
        Self::TestId,
        Self::Scoped,
        Self::Structural,
    ];

    /// Priority rank (0 is most robust)
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Role => 0,
            Self::Label => 1,
            Self::Placeholder => 2,
            Self::TestId => 3,
            Self::Scoped => 4,
            Self::Structural => 5,
        }
    }

    /// Method name used in audit logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Role => "role",
            Self::Label => "label",
            Self::Placeholder => "placeholder",
            Self::TestId => "test_id",
            Self::Scoped => "scoped",
            Self::Structural => "structural",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete selector usable against a live page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selector {
    /// Role with accessible name (e.g. `role=button[name="Save"]`)
    Role {
        /// ARIA role
        role: String,
        /// Accessible name
        name: String,
    },
    /// Label association
    Label {
        /// Label text
        text: String,
    },
    /// Placeholder attribute
    Placeholder {
        /// Placeholder text
        text: String,
    },
    /// Test ID selector (data-testid attribute)
    TestId {
        /// Attribute value
        id: String,
    },
    /// Raw scoped expression supplied by the author
    Scoped {
        /// CSS expression
        expr: String,
    },
    /// Role and/or literal text match
    Structural {
        /// Optional ARIA role
        role: Option<String>,
        /// Optional literal text
        text: Option<String>,
    },
}

impl Selector {
    /// Create a role selector
    #[must_use]
    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    /// Create a label selector
    #[must_use]
    pub fn label(text: impl Into<String>) -> Self {
        Self::Label { text: text.into() }
    }

    /// Create a placeholder selector
    #[must_use]
    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::Placeholder { text: text.into() }
    }

    /// Create a test ID selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId { id: id.into() }
    }

    /// Create a scoped selector
    #[must_use]
    pub fn scoped(expr: impl Into<String>) -> Self {
        Self::Scoped { expr: expr.into() }
    }

    /// The strategy this selector belongs to
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        match self {
            Self::Role { .. } => Strategy::Role,
            Self::Label { .. } => Strategy::Label,
            Self::Placeholder { .. } => Strategy::Placeholder,
            Self::TestId { .. } => Strategy::TestId,
            Self::Scoped { .. } => Strategy::Scoped,
            Self::Structural { .. } => Strategy::Structural,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Role { role, name } => write!(f, "role={role}[name={name:?}]"),
            Self::Label { text } => write!(f, "label={text:?}"),
            Self::Placeholder { text } => write!(f, "placeholder={text:?}"),
            Self::TestId { id } => write!(f, "[data-testid={id:?}]"),
            Self::Scoped { expr } => f.write_str(expr),
            Self::Structural { role, text } => match (role, text) {
                (Some(r), Some(t)) => write!(f, "role={r} >> text={t:?}"),
                (Some(r), None) => write!(f, "role={r}"),
                (None, Some(t)) => write!(f, "text={t:?}"),
                (None, None) => f.write_str("*"),
            },
        }
    }
}

/// One scoreable strategy derived from a target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorCandidate {
    /// Strategy (method)
    pub strategy: Strategy,
    /// Typed selector
    pub selector: Selector,
    /// Expression string for the live page
    pub expression: String,
    /// Confidence in [0, 1]; zero until scored
    pub score: f64,
}

impl SelectorCandidate {
    /// Create an unscored candidate
    #[must_use]
    pub fn new(selector: Selector) -> Self {
        Self {
            strategy: selector.strategy(),
            expression: selector.to_string(),
            selector,
            score: 0.0,
        }
    }

    /// Set the score, clamped to [0, 1]
    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0)
        };
        self
    }
}

/// Generate candidates for a target in priority order.
///
/// Returns an empty vector for a target without hints.
#[must_use]
pub fn generate_candidates(target: &Target) -> Vec<SelectorCandidate> {
    let role = non_blank(&target.role);
    let name = non_blank(&target.name);

    let mut selectors = Vec::new();
    if let (Some(role), Some(name)) = (role, name) {
        selectors.push(Selector::role(role, name));
    }
    if let Some(label) = non_blank(&target.label) {
        selectors.push(Selector::label(label));
    }
    if let Some(placeholder) = non_blank(&target.placeholder) {
        selectors.push(Selector::placeholder(placeholder));
    }
    if let Some(id) = non_blank(&target.test_id) {
        selectors.push(Selector::test_id(id));
    }
    if let Some(expr) = non_blank(&target.fallback) {
        selectors.push(Selector::scoped(expr));
    }

    if selectors.is_empty() && (role.is_some() || name.is_some()) {
        selectors.push(Selector::Structural {
            role: role.map(str::to_string),
            text: name.map(str::to_string),
        });
    }

    selectors.into_iter().map(SelectorCandidate::new).collect()
}
