//! Plan schema: the author-supplied description of what a test touches.
//!
//! A [`Plan`] is an ordered list of [`Step`]s, each naming the [`Target`]s it
//! interacts with. Targets describe elements semantically (role, accessible
//! name, label, ...) instead of hard-coding a selector, so grounding can pick
//! the most robust strategy against the live page.
//!
//! # Example
//!
//! ```yaml
//! name: "checkout"
//! steps:
//!   - id: "login"
//!     intent: "Sign in with a test account"
//!     targets:
//!       - key: "email"
//!         label: "Email address"
//!         placeholder: "you@example.com"
//!       - key: "submit"
//!         role: "button"
//!         name: "Sign in"
//! ```

use crate::result::{ResoluteError, ResoluteResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Semantic description of one page element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Stable key used in logs and telemetry
    pub key: String,
    /// ARIA role (e.g. "button", "textbox")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Accessible name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Associated label text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Placeholder text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Value of the `data-testid` attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    /// Author-supplied scoped expression used when semantic hints drift
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl Target {
    /// Create a target with no hints
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Set the ARIA role
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the accessible name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the label text
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the placeholder text
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Set the test identifier
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id = Some(id.into());
        self
    }

    /// Set the scoped fallback expression
    #[must_use]
    pub fn with_fallback(mut self, expr: impl Into<String>) -> Self {
        self.fallback = Some(expr.into());
        self
    }

    /// Whether at least one non-blank hint is present
    #[must_use]
    pub fn has_hints(&self) -> bool {
        [
            &self.role,
            &self.name,
            &self.label,
            &self.placeholder,
            &self.test_id,
            &self.fallback,
        ]
        .iter()
        .any(|hint| non_blank(hint).is_some())
    }

    /// Validate the target
    ///
    /// # Errors
    ///
    /// Returns `InvalidTarget` if the key is blank or no hint is present
    pub fn validate(&self) -> ResoluteResult<()> {
        if self.key.trim().is_empty() {
            return Err(ResoluteError::InvalidTarget {
                key: self.key.clone(),
                message: "key must not be empty".to_string(),
            });
        }
        if !self.has_hints() {
            return Err(ResoluteError::InvalidTarget {
                key: self.key.clone(),
                message: "at least one hint is required".to_string(),
            });
        }
        Ok(())
    }
}

/// Trimmed hint value, `None` when absent or blank
pub(crate) fn non_blank(hint: &Option<String>) -> Option<&str> {
    hint.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// One intent of a plan and the targets it needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Step identifier (unique within a plan)
    pub id: String,
    /// Human-readable intent
    #[serde(default)]
    pub intent: String,
    /// Targets in the order the step touches them
    #[serde(default)]
    pub targets: Vec<Target>,
}

impl Step {
    /// Create a step without targets
    #[must_use]
    pub fn new(id: impl Into<String>, intent: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            intent: intent.into(),
            targets: Vec::new(),
        }
    }

    /// Append a target
    #[must_use]
    pub fn with_target(mut self, target: Target) -> Self {
        self.targets.push(target);
        self
    }

    /// Look up a target by key
    #[must_use]
    pub fn target(&self, key: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.key == key)
    }
}

/// Top-level, read-only test plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Plan name
    #[serde(default)]
    pub name: String,
    /// Ordered steps
    pub steps: Vec<Step>,
}

impl Plan {
    /// Create an empty plan
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step
    #[must_use]
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Parse and validate a plan from YAML
    ///
    /// # Errors
    ///
    /// Returns a YAML error on malformed input or `InvalidPlan`/`InvalidTarget`
    /// if the structure is inconsistent
    pub fn from_yaml(yaml: &str) -> ResoluteResult<Self> {
        let plan: Self = serde_yaml_ng::from_str(yaml)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Parse and validate a plan from JSON
    ///
    /// # Errors
    ///
    /// Returns a JSON error on malformed input or a validation error
    pub fn from_json(json: &str) -> ResoluteResult<Self> {
        let plan: Self = serde_json::from_str(json)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Load a plan file; `.json` files are read as JSON, anything else as YAML
    ///
    /// # Errors
    ///
    /// Returns an I/O, parse or validation error
    pub fn load(path: &Path) -> ResoluteResult<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// Validate the plan structure
    ///
    /// # Errors
    ///
    /// Returns the first structural problem found
    pub fn validate(&self) -> ResoluteResult<()> {
        if self.steps.is_empty() {
            return Err(ResoluteError::invalid_plan("plan has no steps"));
        }

        let mut step_ids = HashSet::new();
        for step in &self.steps {
            if step.id.trim().is_empty() {
                return Err(ResoluteError::invalid_plan("step id must not be empty"));
            }
            if !step_ids.insert(step.id.as_str()) {
                return Err(ResoluteError::invalid_plan(format!(
                    "duplicate step id '{}'",
                    step.id
                )));
            }

            let mut keys = HashSet::new();
            for target in &step.targets {
                target.validate()?;
                if !keys.insert(target.key.as_str()) {
                    return Err(ResoluteError::invalid_plan(format!(
                        "duplicate target key '{}' in step '{}'",
                        target.key, step.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Look up a step by id
    #[must_use]
    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// All targets in plan order
    pub fn targets(&self) -> impl Iterator<Item = (&Step, &Target)> {
        self.steps
            .iter()
            .flat_map(|step| step.targets.iter().map(move |t| (step, t)))
    }
}
