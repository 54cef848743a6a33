//! Static table of traced hooks.
//!
//! Instead of annotating each overridden method by hand, a view declares its
//! hooks once as a table of [`HookSpec`]s; the overrides look their
//! [`TraceMeta`] up by name.

use crate::tracer::TraceMeta;
use std::collections::HashMap;

/// Trace level and tag of one named hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookSpec {
    pub name: &'static str,
    pub level: usize,
    pub message: &'static str,
}

impl HookSpec {
    pub const fn new(name: &'static str, level: usize) -> Self {
        Self {
            name,
            level,
            message: "",
        }
    }

    pub const fn message(mut self, message: &'static str) -> Self {
        self.message = message;
        self
    }

    pub fn meta(&self) -> TraceMeta {
        TraceMeta::default()
            .with_level(self.level)
            .with_message(self.message)
    }
}

/// Trace metadata by hook name.
///
/// Hooks missing from the table trace with the default metadata.
#[derive(Debug, Clone, Default)]
pub struct HookTable {
    hooks: HashMap<&'static str, TraceMeta>,
    fallback: TraceMeta,
}

impl HookTable {
    pub fn from_specs(specs: &[HookSpec]) -> Self {
        Self {
            hooks: specs.iter().map(|spec| (spec.name, spec.meta())).collect(),
            fallback: TraceMeta::default(),
        }
    }

    pub fn meta(&self, hook: &str) -> &TraceMeta {
        self.hooks.get(hook).unwrap_or(&self.fallback)
    }

    pub fn contains(&self, hook: &str) -> bool {
        self.hooks.contains_key(hook)
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
