//! Output formatting

use crate::error::CliResult;
use console::style;
use resolute::{Classification, RunReport, ScoreSource};
use serde::{Deserialize, Serialize};

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Grounding result for one plan target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundingRow {
    /// Step id
    pub step: String,
    /// Target key
    pub target: String,
    /// Chosen strategy, when grounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    /// Chosen expression, when grounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    /// Chosen score, or the best observed score on failure
    pub score: f64,
    /// Qualifying alternates
    pub alternates: usize,
    /// Error message on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GroundingRow {
    /// Whether the target was grounded
    #[must_use]
    pub const fn is_grounded(&self) -> bool {
        self.error.is_none()
    }
}

fn mark(classification: Classification, use_color: bool) -> String {
    let (symbol, plain) = match classification {
        Classification::Passed => ("✓", "PASS"),
        Classification::Failed => ("✗", "FAIL"),
        Classification::Flaky => ("~", "FLKY"),
        Classification::Unknown => ("?", "UNKN"),
    };
    if !use_color {
        return plain.to_string();
    }
    let styled = style(symbol).bold();
    match classification {
        Classification::Passed => styled.green(),
        Classification::Failed => styled.red(),
        Classification::Flaky => styled.yellow(),
        Classification::Unknown => styled.dim(),
    }
    .to_string()
}

/// Render a run report as text
#[must_use]
pub fn render_report_text(report: &RunReport, use_color: bool) -> String {
    let mut out = String::new();
    let width = report
        .iter()
        .map(|r| r.test_name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    for result in report.iter() {
        let source = match result.score_source {
            ScoreSource::Telemetry => "telemetry",
            ScoreSource::Heuristic => "heuristic",
        };
        out.push_str(&format!(
            "{} {:<width$}  {:<7}  retries={:<2}  quality={:>4.1}/10 ({source})\n",
            mark(result.classification, use_color),
            result.test_name,
            result.classification.as_str(),
            result.retry_count,
            result.reporting_score(),
        ));
        for env in &result.environments {
            out.push_str(&format!(
                "    {:<12} {:<7} attempts={} {}ms\n",
                env.environment,
                env.classification.as_str(),
                env.attempts,
                env.duration_ms
            ));
        }
    }

    let s = &report.summary;
    out.push_str(&format!(
        "\n{} tests: {} passed, {} failed, {} flaky, {} unknown (pass rate {:.1}%)\n",
        s.total,
        s.passed,
        s.failed,
        s.flaky,
        s.unknown,
        s.pass_rate() * 100.0
    ));
    out.push_str(&format!("fingerprint {}\n", report.fingerprint));
    out
}

/// Render a run report as JSON
pub fn render_report_json(report: &RunReport) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render grounding rows as text
#[must_use]
pub fn render_grounding_text(rows: &[GroundingRow], use_color: bool) -> String {
    let mut out = String::new();
    for row in rows {
        let line = match (&row.strategy, &row.expression, &row.error) {
            (Some(strategy), Some(expression), None) => format!(
                "{}/{}: {strategy} {expression} score={:.2} alternates={}",
                row.step, row.target, row.score, row.alternates
            ),
            (_, _, Some(error)) => format!("{}/{}: {error}", row.step, row.target),
            _ => format!("{}/{}: no result", row.step, row.target),
        };
        let prefix = match (row.is_grounded(), use_color) {
            (true, true) => style("✓").green().bold().to_string(),
            (false, true) => style("✗").red().bold().to_string(),
            (true, false) => "OK  ".to_string(),
            (false, false) => "FAIL".to_string(),
        };
        out.push_str(&format!("{prefix} {line}\n"));
    }
    let grounded = rows.iter().filter(|r| r.is_grounded()).count();
    out.push_str(&format!("\n{grounded}/{} targets grounded\n", rows.len()));
    out
}

/// Render grounding rows as JSON
pub fn render_grounding_json(rows: &[GroundingRow]) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use resolute::{ExecutionRecord, ExecutionReducer, ExecutionStatus, TelemetryStore};

    fn report() -> RunReport {
        let records = vec![
            ExecutionRecord::new("checkout", "chromium", 0, ExecutionStatus::Failed),
            ExecutionRecord::new("checkout", "chromium", 1, ExecutionStatus::Passed),
            ExecutionRecord::new("login", "chromium", 0, ExecutionStatus::Passed),
        ];
        ExecutionReducer::default().reduce(&records, &TelemetryStore::new())
    }

    mod report_tests {
        use super::*;

        #[test]
        fn test_text_plain() {
            let text = render_report_text(&report(), false);
            assert!(text.contains("FLKY checkout"));
            assert!(text.contains("PASS login"));
            assert!(text.contains("2 tests: 1 passed, 0 failed, 1 flaky"));
            assert!(text.contains("fingerprint "));
        }

        #[test]
        fn test_json_parses() {
            let json = render_report_json(&report()).unwrap();
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(value["results"]["checkout"]["classification"], "flaky");
            assert_eq!(value["summary"]["total"], 2);
        }
    }

    mod grounding_tests {
        use super::*;

        fn rows() -> Vec<GroundingRow> {
            vec![
                GroundingRow {
                    step: "login".into(),
                    target: "email".into(),
                    strategy: Some("label".into()),
                    expression: Some("label=\"Email\"".into()),
                    score: 0.9,
                    alternates: 0,
                    error: None,
                },
                GroundingRow {
                    step: "login".into(),
                    target: "submit".into(),
                    strategy: None,
                    expression: None,
                    score: 0.5,
                    alternates: 0,
                    error: Some("below threshold".into()),
                },
            ]
        }

        #[test]
        fn test_text_plain() {
            let text = render_grounding_text(&rows(), false);
            assert!(text.contains("OK   login/email: label"));
            assert!(text.contains("FAIL login/submit: below threshold"));
            assert!(text.contains("1/2 targets grounded"));
        }

        #[test]
        fn test_json_omits_missing_fields() {
            let json = render_grounding_json(&rows()).unwrap();
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert!(value[1].get("strategy").is_none());
            assert_eq!(value[1]["error"], "below threshold");
        }
    }
}
