//! Server configuration read from the environment.

use crate::error::{Result, ViewTraceError};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const BIND_VAR: &str = "VIEWTRACE_BIND";
pub const SEED_VAR: &str = "VIEWTRACE_SEED";
pub const TRACE_STDOUT_VAR: &str = "VIEWTRACE_TRACE_STDOUT";
pub const RECORD_EVENTS_VAR: &str = "VIEWTRACE_RECORD_EVENTS";
pub const LOG_VAR: &str = "VIEWTRACE_LOG";
pub const EVENT_CAPACITY_VAR: &str = "VIEWTRACE_EVENT_CAPACITY";

/// Structured events retained by default; older ones are dropped.
pub const DEFAULT_EVENT_CAPACITY: usize = 10_000;

const DEFAULT_BIND: &str = "127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind: SocketAddr,
    /// JSON file with an array of users loaded at startup.
    pub seed_path: Option<PathBuf>,
    /// Print start/end trace lines to standard output.
    pub trace_stdout: bool,
    /// Record structured entry/exit events for every traced hook.
    pub record_events: bool,
    /// Most structured events kept in memory at once.
    pub event_capacity: usize,
    /// Filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            seed_path: None,
            trace_stdout: true,
            record_events: true,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment, after reading a `.env` file if present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup; unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_text = lookup(BIND_VAR).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_text.trim().parse().map_err(|err| {
            ViewTraceError::ConfigError(format!("invalid {} '{}': {}", BIND_VAR, bind_text, err))
        })?;

        let seed_path = lookup(SEED_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let trace_stdout = match lookup(TRACE_STDOUT_VAR) {
            Some(value) => parse_flag(TRACE_STDOUT_VAR, &value)?,
            None => defaults.trace_stdout,
        };
        let record_events = match lookup(RECORD_EVENTS_VAR) {
            Some(value) => parse_flag(RECORD_EVENTS_VAR, &value)?,
            None => defaults.record_events,
        };

        let event_capacity = match lookup(EVENT_CAPACITY_VAR) {
            Some(value) => parse_capacity(&value)?,
            None => defaults.event_capacity,
        };

        let log_filter = lookup(LOG_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.log_filter);

        Ok(Self {
            bind,
            seed_path,
            trace_stdout,
            record_events,
            event_capacity,
            log_filter,
        })
    }
}

fn parse_capacity(value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(capacity) if capacity > 0 => Ok(capacity),
        _ => Err(ViewTraceError::ConfigError(format!(
            "invalid {} '{}'; expected a positive integer",
            EVENT_CAPACITY_VAR, value
        ))),
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ViewTraceError::ConfigError(format!(
            "invalid {} '{}'; expected true or false",
            name, value
        ))),
    }
}
