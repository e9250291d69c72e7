//! Result and error types for Resolute.

use thiserror::Error;

/// Result type for Resolute operations
pub type ResoluteResult<T> = Result<T, ResoluteError>;

/// Errors that can occur while grounding, validating or acting on elements
#[derive(Debug, Error)]
pub enum ResoluteError {
    /// Selector matched no element on the live page
    #[error("Element not found: {selector}")]
    ElementNotFound {
        /// Selector expression
        selector: String,
    },

    /// Selector matched more than one element
    #[error("Ambiguous selector {selector}: matched {count} elements")]
    AmbiguousSelector {
        /// Selector expression
        selector: String,
        /// Number of matches observed
        count: usize,
    },

    /// No candidate reached the configured score threshold
    #[error("No candidate for target '{key}' reached threshold {threshold:.2} (best {best_score:.3})")]
    ThresholdNotMet {
        /// Target key
        key: String,
        /// Best score observed across all candidates
        best_score: f64,
        /// Threshold that was required
        threshold: f64,
    },

    /// Element is unique but not visible
    #[error("Element not visible: {selector}")]
    NotVisible {
        /// Selector expression
        selector: String,
    },

    /// Element is unique and visible but disabled
    #[error("Element not enabled: {selector}")]
    NotEnabled {
        /// Selector expression
        selector: String,
    },

    /// The single recovery attempt failed as well
    #[error("{action} on '{target}' failed after recovery: {original}")]
    HealFailed {
        /// Action name (click, fill)
        action: String,
        /// Target key
        target: String,
        /// Error from the first attempt, unmodified
        #[source]
        original: Box<ResoluteError>,
    },

    /// Target has no usable hint
    #[error("Invalid target '{key}': {message}")]
    InvalidTarget {
        /// Target key
        key: String,
        /// Error message
        message: String,
    },

    /// Plan failed structural validation
    #[error("Invalid plan: {message}")]
    InvalidPlan {
        /// Error message
        message: String,
    },

    /// The page reported a failed interaction
    #[error("{action} failed on {selector}: {message}")]
    ActionFailed {
        /// Action name
        action: String,
        /// Selector expression
        selector: String,
        /// Error message
        message: String,
    },

    /// Operation timed out
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ResoluteError {
    /// Create an invalid plan error
    #[must_use]
    pub fn invalid_plan(message: impl Into<String>) -> Self {
        Self::InvalidPlan {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the Action Guard may attempt its single recovery.
    ///
    /// Match-count errors are recoverable by moving to the next candidate,
    /// visibility and enablement errors by waiting. Everything else is fatal.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. }
                | Self::AmbiguousSelector { .. }
                | Self::NotVisible { .. }
                | Self::NotEnabled { .. }
                | Self::ActionFailed { .. }
                | Self::Timeout { .. }
        )
    }

    /// Whether another candidate might succeed where this selector failed
    #[must_use]
    pub const fn is_match_error(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. } | Self::AmbiguousSelector { .. }
        )
    }

    /// The first-attempt error, looking through `HealFailed`
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::HealFailed { original, .. } => original.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_threshold_display_reports_best_score() {
        let err = ResoluteError::ThresholdNotMet {
            key: "submit".to_string(),
            best_score: 0.42,
            threshold: 0.8,
        };
        let msg = err.to_string();
        assert!(msg.contains("submit"));
        assert!(msg.contains("0.420"));
        assert!(msg.contains("0.80"));
    }

    #[test]
    fn test_ambiguous_display() {
        let err = ResoluteError::AmbiguousSelector {
            selector: "label=Email".to_string(),
            count: 3,
        };
        assert!(err.to_string().contains("3 elements"));
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(ResoluteError::NotVisible {
            selector: "x".into()
        }
        .is_recoverable());
        assert!(ResoluteError::ElementNotFound {
            selector: "x".into()
        }
        .is_recoverable());
        assert!(!ResoluteError::ThresholdNotMet {
            key: "k".into(),
            best_score: 0.1,
            threshold: 0.8
        }
        .is_recoverable());
        assert!(!ResoluteError::invalid_plan("bad").is_recoverable());
    }

    #[test]
    fn test_match_error() {
        assert!(ResoluteError::AmbiguousSelector {
            selector: "x".into(),
            count: 2
        }
        .is_match_error());
        assert!(!ResoluteError::NotEnabled {
            selector: "x".into()
        }
        .is_match_error());
    }

    #[test]
    fn test_heal_failed_preserves_original() {
        let original = ResoluteError::NotVisible {
            selector: "role=button[name=\"Save\"]".to_string(),
        };
        let err = ResoluteError::HealFailed {
            action: "click".to_string(),
            target: "save".to_string(),
            original: Box::new(original),
        };
        assert!(matches!(
            err.root_cause(),
            ResoluteError::NotVisible { .. }
        ));
        let source = err.source().unwrap();
        assert!(source.to_string().contains("not visible"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_io_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ResoluteError = io.into();
        assert!(err.to_string().contains("I/O error"));
    }
}
