//! Rendered call arguments and per-call information handed to interceptors

use super::annotate::TraceMeta;
use std::fmt;

/// Render a traced value: its `Debug` text, except that a top-level quoted
/// string is single-quoted (`'v'`, or `"it's"` when it holds a `'` and no `"`).
///
/// Only the outermost quotes change; strings nested inside other values keep
/// their `Debug` quoting.
pub fn repr(value: &dyn fmt::Debug) -> String {
    let rendered = format!("{:?}", value);
    let quoted = rendered.len() >= 2 && rendered.starts_with('"') && rendered.ends_with('"');
    if !quoted {
        return rendered;
    }

    let mut inner = String::with_capacity(rendered.len());
    let mut chars = rendered[1..rendered.len() - 1].chars();
    while let Some(c) = chars.next() {
        match (c, chars.clone().next()) {
            ('\\', Some('"')) => {
                inner.push('"');
                chars.next();
            }
            ('\\', Some(next)) => {
                inner.push('\\');
                inner.push(next);
                chars.next();
            }
            _ => inner.push(c),
        }
    }

    if inner.contains('\'') && !inner.contains('"') {
        format!("\"{}\"", inner)
    } else {
        format!("'{}'", inner.replace('\'', "\\'"))
    }
}

/// Positional and keyword arguments of one traced call, rendered with [`repr`]
///
/// Positional arguments print as a tuple (`()`, `(a,)`, `(a, b)`) and keyword
/// arguments as a mapping (`{}`, `{'key': 1}`, `{'k': 'v'}`), keeping insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallArgs {
    positional: Vec<String>,
    keyword: Vec<(String, String)>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl fmt::Debug) -> Self {
        self.positional.push(repr(&value));
        self
    }

    /// Append a keyword argument
    pub fn kwarg(mut self, name: impl Into<String>, value: impl fmt::Debug) -> Self {
        self.keyword.push((name.into(), repr(&value)));
        self
    }

    /// Append every keyword argument from an iterator of pairs
    pub fn kwargs<K, V, I>(mut self, pairs: I) -> Self
    where
        K: Into<String>,
        V: fmt::Debug,
        I: IntoIterator<Item = (K, V)>,
    {
        for (name, value) in pairs {
            self = self.kwarg(name, value);
        }
        self
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    pub fn keyword(&self) -> &[(String, String)] {
        &self.keyword
    }

    pub fn render_positional(&self) -> String {
        match self.positional.as_slice() {
            [] => "()".to_string(),
            [only] => format!("({},)", only),
            many => format!("({})", many.join(", ")),
        }
    }

    pub fn render_keyword(&self) -> String {
        let pairs: Vec<String> = self
            .keyword
            .iter()
            .map(|(name, value)| format!("'{}': {}", name, value))
            .collect();
        format!("{{{}}}", pairs.join(", "))
    }
}

/// Everything an interceptor learns about a call in progress
#[derive(Debug, Clone, Copy)]
pub struct CallInfo<'a> {
    pub name: &'a str,
    pub meta: &'a TraceMeta,
    pub args: &'a CallArgs,
    pub correlation_id: Option<&'a str>,
}
