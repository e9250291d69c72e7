//! Resolute CLI Library
//!
//! Command-line interface for the Resolute grounding and classification
//! engines. Everything the `resolute` binary does is reachable from here so it
//! can be tested without spawning a process.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
mod output;

pub use commands::{
    CheckPlanArgs, ClassifyArgs, Cli, ColorArg, Commands, ConfigArgs, FormatArg, GroundArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{
    render_grounding_json, render_grounding_text, render_report_json, render_report_text,
    GroundingRow, OutputFormat,
};
