//! Destinations for printed trace lines

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Receives each formatted trace line; the sink appends the line terminator
pub trait TraceSink: Send + Sync {
    fn emit(&self, text: &str);
}

/// Writes trace lines to standard output
///
/// Stdout is locked per line, so lines from concurrent requests may
/// interleave but never tear.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl TraceSink for StdoutSink {
    fn emit(&self, text: &str) {
        let mut out = io::stdout().lock();
        // A closed stdout must not take the request down with it.
        let _ = writeln!(out, "{}", text);
        let _ = out.flush();
    }
}

/// Collects trace lines in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every emitted line, in order
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// The text standard output would have received
    pub fn contents(&self) -> String {
        self.lines().iter().map(|line| format!("{}\n", line)).collect()
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl TraceSink for MemorySink {
    fn emit(&self, text: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
    }
}
