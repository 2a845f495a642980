//! Logging setup
//!
//! Logs go to `config.log_file` when set, otherwise to stderr. `RUST_LOG`
//! overrides the default filter.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tally_core::Config;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber (ignored if one is already set)
pub fn init(config: &Config, verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    match config.log_file {
        Some(ref log_path) => {
            let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
                    return;
                }
            };

            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(log_file))
                .try_init();

            debug!("Logging to {:?}", log_path);
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}

fn default_directives(level: &str) -> String {
    format!("tally_core={},tally_cli={}", level, level)
}
