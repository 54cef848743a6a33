//! Trace metadata and the annotators that attach it to callables
//!
//! Metadata is decided once, where the callable is defined, and read by the
//! tracer on every invocation. Annotators only record it; they never wrap or
//! alter the callable itself.

/// Indentation depth and free-text tag attached to a traced callable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceMeta {
    /// Nesting depth; each level indents trace lines by two spaces
    pub level: usize,
    /// Free-text tag. Recorded in structured events, never printed
    pub message: String,
}

impl TraceMeta {
    pub fn new(level: usize, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn with_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Leading whitespace for this level's trace lines
    pub fn indent(&self) -> String {
        "  ".repeat(self.level)
    }
}

/// A named callable together with the trace metadata attached to it
///
/// Built with [`Annotated::new`] and decorated with [`level_log`] / [`message_log`]
/// (or the equivalent builder methods) before being handed to the tracer.
#[derive(Clone)]
pub struct Annotated<F> {
    name: &'static str,
    meta: TraceMeta,
    func: F,
}

impl<F> Annotated<F> {
    /// Wrap `func` under `name` with default metadata (level 0, empty tag)
    pub fn new(name: &'static str, func: F) -> Self {
        Self {
            name,
            meta: TraceMeta::default(),
            func,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn meta(&self) -> &TraceMeta {
        &self.meta
    }

    /// The underlying callable, untouched by annotation
    pub fn func(&self) -> &F {
        &self.func
    }

    pub fn with_level(mut self, level: usize) -> Self {
        self.meta.level = level;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.meta.message = message.into();
        self
    }
}

/// Decorator recording `level` as the callable's trace level
pub fn level_log<F>(level: usize) -> impl FnOnce(Annotated<F>) -> Annotated<F> {
    move |annotated| annotated.with_level(level)
}

/// Decorator recording `message` as the callable's trace tag
pub fn message_log<F>(message: impl Into<String>) -> impl FnOnce(Annotated<F>) -> Annotated<F> {
    let message = message.into();
    move |annotated| annotated.with_message(message)
}
