//! Diagnostic logging setup.
//!
//! Logs go to standard error so standard output carries nothing but trace lines.

use crate::error::{Result, ViewTraceError};
use tracing_subscriber::filter::EnvFilter;

/// Build the filter: `RUST_LOG` wins, otherwise `default_filter`.
pub fn env_filter(default_filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|err| {
            ViewTraceError::ConfigError(format!("invalid log filter '{}': {}", default_filter, err))
        })
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(default_filter: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter)?)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|err| ViewTraceError::ConfigError(format!("failed to initialize logging: {}", err)))
}
