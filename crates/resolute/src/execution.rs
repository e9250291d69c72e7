//! Execution records emitted by the automation engine.
//!
//! One record per test × environment × attempt. Statuses arrive as whatever
//! string the engine reports and are normalized here, once, so the reducer
//! only ever sees [`ExecutionStatus`].

use crate::result::ResoluteResult;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use tracing::warn;

/// Normalized attempt status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExecutionStatus {
    /// Attempt passed
    Passed,
    /// Attempt failed or timed out
    Failed,
    /// Engine recognized a pass-after-fail pattern
    FlakyMarker,
    /// Anything else (skipped, interrupted, unrecognized)
    #[default]
    Unknown,
}

impl ExecutionStatus {
    /// Normalize an engine status string.
    ///
    /// | engine value                               | status        |
    /// |--------------------------------------------|---------------|
    /// | `passed`, `expected`, `pass`               | `Passed`      |
    /// | `failed`, `unexpected`, `timedOut`, `fail` | `Failed`      |
    /// | `flaky`, `flaky-marker`                    | `FlakyMarker` |
    /// | anything else                              | `Unknown`     |
    #[must_use]
    pub fn from_engine(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "passed" | "expected" | "pass" | "ok" => Self::Passed,
            "failed" | "unexpected" | "timedout" | "fail" | "timeout" => Self::Failed,
            "flaky" | "flakymarker" => Self::FlakyMarker,
            _ => Self::Unknown,
        }
    }

    /// Canonical name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::FlakyMarker => "flaky-marker",
            Self::Unknown => "unknown",
        }
    }

    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if status is failing
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl From<String> for ExecutionStatus {
    fn from(raw: String) -> Self {
        Self::from_engine(&raw)
    }
}

impl From<ExecutionStatus> for String {
    fn from(status: ExecutionStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Accept any JSON value as a status; non-strings become `Unknown`
fn lenient_status<'de, D>(deserializer: D) -> Result<ExecutionStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .map_or(ExecutionStatus::Unknown, ExecutionStatus::from_engine))
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media produced by an attempt
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attachment {
    /// Attachment name (screenshot, video, trace)
    pub name: String,
    /// Path on disk
    pub path: String,
    /// MIME type
    pub content_type: String,
}

/// One attempt of one test in one environment.
///
/// Field order defines the canonical sort order: test, environment, attempt,
/// then the remaining fields as tie-breakers.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecutionRecord {
    /// Logical test name
    pub test_name: String,
    /// Browser or device environment
    pub environment: String,
    /// Zero-based attempt index
    pub attempt_index: u32,
    /// Normalized status
    #[serde(deserialize_with = "lenient_status")]
    pub status: ExecutionStatus,
    /// Attempt duration
    pub duration_ms: u64,
    /// Error reported by the engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Media references
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    /// Selector strings the attempt used
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub selectors: Vec<String>,
}

impl ExecutionRecord {
    /// Create a record
    #[must_use]
    pub fn new(
        test_name: impl Into<String>,
        environment: impl Into<String>,
        attempt_index: u32,
        status: ExecutionStatus,
    ) -> Self {
        Self {
            test_name: test_name.into(),
            environment: environment.into(),
            attempt_index,
            status,
            ..Self::default()
        }
    }

    /// Set duration
    #[must_use]
    pub const fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set error message
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Add a selector string
    #[must_use]
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selectors.push(selector.into());
        self
    }

    /// Add an attachment
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Parse records from a JSON array.
///
/// Elements that are not valid records are skipped with a warning so one
/// malformed attempt does not hide the rest of the run.
///
/// # Errors
///
/// Returns a JSON error if the document is not an array
pub fn parse_records(json: &str) -> ResoluteResult<Vec<ExecutionRecord>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let total = values.len();
    let records: Vec<ExecutionRecord> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index, error = %e, "skipping malformed execution record");
                None
            }
        })
        .collect();
    if records.len() < total {
        warn!(
            skipped = total - records.len(),
            total, "some execution records were skipped"
        );
    }
    Ok(records)
}

/// Load records from a JSON file
///
/// # Errors
///
/// Returns an I/O or JSON error
pub fn load_records(path: &Path) -> ResoluteResult<Vec<ExecutionRecord>> {
    parse_records(&std::fs::read_to_string(path)?)
}
