//! Check-plan command handler

use crate::commands::CheckPlanArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use resolute::Plan;

/// One-line description of a valid plan
#[must_use]
pub fn plan_summary(plan: &Plan) -> String {
    format!(
        "plan '{}' is valid: {} steps, {} targets",
        plan.name,
        plan.steps.len(),
        plan.targets().count()
    )
}

/// Execute the check-plan command
pub fn execute_check_plan(config: &CliConfig, args: &CheckPlanArgs) -> CliResult<()> {
    let plan = Plan::load(&args.plan)?;
    if !config.verbosity.is_quiet() {
        println!("{}", plan_summary(&plan));
    }
    if config.verbosity.is_verbose() {
        for step in &plan.steps {
            println!("  {} - {}", step.id, step.intent);
            for target in &step.targets {
                println!("    {}", target.key);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use resolute::{Step, Target};

    #[test]
    fn test_summary() {
        let plan = Plan::new("signup")
            .with_step(
                Step::new("form", "Fill the form")
                    .with_target(Target::new("email").with_label("Email"))
                    .with_target(Target::new("name").with_placeholder("Full name")),
            )
            .with_step(
                Step::new("submit", "Submit")
                    .with_target(Target::new("go").with_test_id("signup-submit")),
            );
        assert_eq!(
            plan_summary(&plan),
            "plan 'signup' is valid: 2 steps, 3 targets"
        );
    }
}
