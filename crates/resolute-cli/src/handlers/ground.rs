//! Ground command handler

use crate::commands::GroundArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{render_grounding_json, render_grounding_text, GroundingRow, OutputFormat};
use resolute::{Grounder, GroundingConfig, MockPage, Plan, ResoluteError};

/// Ground every target of a plan against a page snapshot.
///
/// Failures are reported per row; grounding continues past them.
#[must_use]
pub fn ground_plan(grounder: &Grounder, plan: &Plan, page: &MockPage) -> Vec<GroundingRow> {
    plan.targets()
        .map(|(step, target)| match grounder.ground(page, target) {
            Ok(reference) => GroundingRow {
                step: step.id.clone(),
                target: target.key.clone(),
                strategy: Some(reference.strategy().to_string()),
                expression: Some(reference.chosen.expression.clone()),
                score: reference.score(),
                alternates: reference.alternates.len(),
                error: None,
            },
            Err(err) => GroundingRow {
                step: step.id.clone(),
                target: target.key.clone(),
                strategy: None,
                expression: None,
                score: match err {
                    ResoluteError::ThresholdNotMet { best_score, .. } => best_score,
                    _ => 0.0,
                },
                alternates: 0,
                error: Some(err.to_string()),
            },
        })
        .collect()
}

/// Build the grounder for a command, applying a threshold override
pub fn grounder_for(config: &CliConfig, threshold: Option<f64>) -> CliResult<Grounder> {
    let Some(threshold) = threshold else {
        return Ok(config.engine.grounder());
    };
    let grounding = GroundingConfig::default().with_threshold(threshold);
    grounding
        .validate()
        .map_err(|e| CliError::invalid_argument(e.to_string()))?;
    Ok(Grounder::new(grounding, config.engine.scoring))
}

/// Execute the ground command
pub fn execute_ground(config: &CliConfig, args: &GroundArgs) -> CliResult<()> {
    let grounder = grounder_for(config, args.threshold)?;
    let plan = Plan::load(&args.plan)?;
    let page = MockPage::load(&args.page)?;

    let rows = ground_plan(&grounder, &plan, &page);
    let rendered = match OutputFormat::from(args.format) {
        OutputFormat::Text => render_grounding_text(&rows, config.use_color()),
        OutputFormat::Json => render_grounding_json(&rows)?,
    };
    print!("{rendered}");

    let failed = rows.iter().filter(|r| !r.is_grounded()).count();
    if failed > 0 {
        return Err(CliError::Unresolved {
            failed,
            total: rows.len(),
        });
    }
    Ok(())
}
