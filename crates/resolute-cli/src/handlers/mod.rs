//! Command handlers - extracted from main.rs for testability
//!
//! Each handler module holds the pure logic for one command plus an
//! `execute_*` entry point that prints its result.

pub mod check_plan;
pub mod classify;
pub mod config;
pub mod ground;

pub use check_plan::{execute_check_plan, plan_summary};
pub use classify::{classify, execute_classify};
pub use config::{execute_config, render_config};
pub use ground::{execute_ground, ground_plan};
