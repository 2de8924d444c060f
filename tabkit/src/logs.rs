//! Progress logging for the command-line tools.
//!
//! Thin helpers over `tracing` so pipeline steps read the same way
//! everywhere. Output goes to stderr; stdout stays free.

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Log level for a verbosity setting.
///
/// `quiet` wins over any number of `-v`.
pub fn level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: u8, quiet: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level_for(verbose, quiet)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

pub fn log_info(msg: impl Into<String>) {
    info!("{}", msg.into());
}

pub fn log_success(msg: impl Into<String>) {
    info!("✓ {}", msg.into());
}

pub fn log_warning(msg: impl Into<String>) {
    warn!("{}", msg.into());
}
