//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Resolute: selector grounding and flaky-aware classification for E2E runs
#[derive(Parser, Debug)]
#[command(name = "resolute")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Engine configuration file (YAML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify execution records into passed, failed and flaky tests
    Classify(ClassifyArgs),

    /// Ground every target of a plan against a page snapshot
    Ground(GroundArgs),

    /// Validate a plan file
    CheckPlan(CheckPlanArgs),

    /// Show configuration
    Config(ConfigArgs),
}

/// Arguments for the classify command
#[derive(Parser, Debug)]
pub struct ClassifyArgs {
    /// Execution records (JSON array)
    #[arg(short, long)]
    pub records: PathBuf,

    /// Selector telemetry (JSON map of test name to scores)
    #[arg(short, long)]
    pub telemetry: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the ground command
#[derive(Parser, Debug)]
pub struct GroundArgs {
    /// Plan file (YAML or JSON)
    #[arg(short, long)]
    pub plan: PathBuf,

    /// Page snapshot (YAML or JSON)
    #[arg(long)]
    pub page: PathBuf,

    /// Override the score threshold
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the check-plan command
#[derive(Parser, Debug)]
pub struct CheckPlanArgs {
    /// Plan file (YAML or JSON)
    #[arg(short, long)]
    pub plan: PathBuf,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Print the effective configuration as YAML
    #[arg(long)]
    pub show: bool,
}

/// Output format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
