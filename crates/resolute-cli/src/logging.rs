//! Log subscriber setup
//!
//! The library only emits `tracing` events; the binary decides where they go.
//! Logs always go to stderr so `--format json` output on stdout stays parseable.
//! `RUST_LOG` overrides the level derived from `-v`/`-q`.

use crate::config::Verbosity;
use tracing_subscriber::EnvFilter;

/// Build the filter for a verbosity level, preferring `RUST_LOG` when set
#[must_use]
pub fn filter_for(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(verbosity: Verbosity, json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
