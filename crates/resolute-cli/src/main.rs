//! Resolute CLI
//!
//! ## Usage
//!
//! ```bash
//! resolute classify --records results.json --telemetry telemetry.json
//! resolute ground --plan login.yaml --page snapshot.yaml --threshold 0.75
//! resolute check-plan --plan login.yaml
//! resolute config --show --config resolute.yaml
//! ```

use clap::Parser;
use resolute_cli::{handlers, logging, Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;
    logging::init_logging(config.verbosity, cli.log_json);

    match cli.command {
        Commands::Classify(args) => handlers::execute_classify(&config, &args),
        Commands::Ground(args) => handlers::execute_ground(&config, &args),
        Commands::CheckPlan(args) => handlers::execute_check_plan(&config, &args),
        Commands::Config(args) => handlers::execute_config(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliResult<CliConfig> {
    let color: ColorChoice = cli.color.into();
    let config = CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(color);
    match &cli.config {
        Some(path) => config.with_engine_file(path),
        None => Ok(config),
    }
}
