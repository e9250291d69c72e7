//! Classify command handler

use crate::commands::ClassifyArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{render_report_json, render_report_text, OutputFormat};
use resolute::{load_records, RunReport, TelemetryStore};
use std::path::Path;
use tracing::info;

/// Reduce a records file, with optional telemetry, into a run report
pub fn classify(
    config: &CliConfig,
    records: &Path,
    telemetry: Option<&Path>,
) -> CliResult<RunReport> {
    let records = load_records(records)?;
    let telemetry = match telemetry {
        Some(path) => TelemetryStore::load(path)?,
        None => TelemetryStore::new(),
    };
    info!(
        records = records.len(),
        telemetry_tests = telemetry.len(),
        "classifying execution records"
    );
    Ok(config.engine.reducer().reduce(&records, &telemetry))
}

/// Execute the classify command
pub fn execute_classify(config: &CliConfig, args: &ClassifyArgs) -> CliResult<()> {
    let report = classify(config, &args.records, args.telemetry.as_deref())?;
    let rendered = match OutputFormat::from(args.format) {
        OutputFormat::Text => render_report_text(&report, config.use_color()),
        OutputFormat::Json => render_report_json(&report)?,
    };
    print!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use resolute::{Classification, ScoreSource};

    const RECORDS: &str = r#"[
        {"testName": "search", "environment": "firefox", "attemptIndex": 0, "status": "failed"},
        {"testName": "search", "environment": "firefox", "attemptIndex": 1, "status": "passed"},
        {"testName": "search", "environment": "webkit", "attemptIndex": 0, "status": "expected"},
        {"testName": "profile", "environment": "webkit", "attemptIndex": 0, "status": "skipped"}
    ]"#;

    #[test]
    fn test_classify_without_telemetry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, RECORDS).unwrap();

        let report = classify(&CliConfig::new(), &path, None).unwrap();
        let search = report.get("search").unwrap();
        assert_eq!(search.classification, Classification::Flaky);
        assert_eq!(search.score_source, ScoreSource::Heuristic);
        assert_eq!(
            report.get("profile").unwrap().classification,
            Classification::Unknown
        );
    }

    #[test]
    fn test_classify_with_telemetry() {
        let dir = tempfile::tempdir().unwrap();
        let records = dir.path().join("records.json");
        let telemetry = dir.path().join("telemetry.json");
        std::fs::write(&records, RECORDS).unwrap();
        std::fs::write(&telemetry, r#"{"search": [0.95, 0.85]}"#).unwrap();

        let report = classify(&CliConfig::new(), &records, Some(&telemetry)).unwrap();
        let search = report.get("search").unwrap();
        assert_eq!(search.score_source, ScoreSource::Telemetry);
        assert!((search.reporting_score() - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(classify(&CliConfig::new(), &dir.path().join("nope.json"), None).is_err());
    }
}
