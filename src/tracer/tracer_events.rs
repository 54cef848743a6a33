//! Tracer event types for traced method calls
//!
//! This module defines the structured events recorded when a traced hook is
//! entered and when it returns. All events implement the `TracerEvent` trait
//! which provides timestamps, correlation IDs, and printable summaries.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Trait for filtering tracer events
///
/// Implement this trait to create custom event filters. This trait is used
/// instead of raw closure types to avoid type complexity warnings.
pub trait EventFilterFn: Send + Sync {
    /// Test whether an event passes the filter
    fn matches(&self, event: &dyn TracerEvent) -> bool;
}

/// Implement EventFilterFn for any function that matches the signature
impl<F> EventFilterFn for F
where
    F: Fn(&dyn TracerEvent) -> bool + Send + Sync,
{
    fn matches(&self, event: &dyn TracerEvent) -> bool {
        self(event)
    }
}

/// Base trait for all tracer events
pub trait TracerEvent: Send + Sync {
    /// Get the timestamp when the event occurred
    fn timestamp(&self) -> f64;

    /// Get the correlation ID for tracing related events
    fn correlation_id(&self) -> &str;

    /// Get the source of the event
    fn source(&self) -> &str;

    /// Name of the traced method
    fn method(&self) -> &str;

    /// Get a formatted string summary of the event
    fn printable_summary(&self) -> String;
}

fn format_time(timestamp: f64) -> String {
    let dt = DateTime::from_timestamp_millis((timestamp * 1000.0).round() as i64)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .with_timezone(&Local);
    dt.format("%H:%M:%S%.3f").to_string()
}

/// Records entry into a traced method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodEntryTracerEvent {
    /// Timestamp when the event occurred (Unix timestamp)
    pub timestamp: f64,
    /// Request-scoped id shared by every call of one request
    pub correlation_id: String,
    /// Source of the event
    pub source: String,
    /// Name of the traced method
    pub method: String,
    /// Trace level the method was annotated with
    pub level: usize,
    /// Message tag the method was annotated with
    pub tag: String,
    /// Rendered positional arguments
    pub positional: Vec<String>,
    /// Rendered keyword arguments, in call order
    pub keyword: Vec<(String, String)>,
}

impl TracerEvent for MethodEntryTracerEvent {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }

    fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn printable_summary(&self) -> String {
        let mut summary = format!(
            "[{}] MethodEntryTracerEvent (correlation_id: {})\n   Method: {} (level {})",
            format_time(self.timestamp),
            self.correlation_id,
            self.method,
            self.level
        );

        if !self.tag.is_empty() {
            summary.push_str(&format!("\n   Tag: {}", self.tag));
        }

        if !self.positional.is_empty() {
            summary.push_str(&format!("\n   Arguments: {}", self.positional.join(", ")));
        }

        if !self.keyword.is_empty() {
            let pairs: Vec<String> =
                self.keyword.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            summary.push_str(&format!("\n   Keyword Arguments: {}", pairs.join(", ")));
        }

        summary
    }
}

/// Records a traced method returning successfully
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodExitTracerEvent {
    /// Timestamp when the event occurred (Unix timestamp)
    pub timestamp: f64,
    /// Request-scoped id shared by every call of one request
    pub correlation_id: String,
    /// Source of the event
    pub source: String,
    /// Name of the traced method
    pub method: String,
    /// Trace level the method was annotated with
    pub level: usize,
    /// Message tag the method was annotated with
    pub tag: String,
    /// Rendered return value
    pub result: String,
}

impl TracerEvent for MethodExitTracerEvent {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }

    fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn printable_summary(&self) -> String {
        let result_preview = if self.result.chars().count() > 100 {
            format!("{}...", self.result.chars().take(100).collect::<String>())
        } else {
            self.result.clone()
        };

        format!(
            "[{}] MethodExitTracerEvent (correlation_id: {})\n   Method: {} (level {})\n   Result: {}",
            format_time(self.timestamp),
            self.correlation_id,
            self.method,
            self.level,
            result_preview
        )
    }
}
