//! Call interceptors and the ordered chain that runs them
//!
//! An interceptor observes the boundary of a traced call: `before` runs
//! ahead of the wrapped callable and `after` runs only when it returns
//! successfully. The chain calls `before` hooks in registration order and
//! `after` hooks in reverse, so the first interceptor encloses the rest.

use super::call_args::CallInfo;
use std::fmt;
use std::sync::Arc;

/// Observer of traced call boundaries
pub trait CallInterceptor: Send + Sync {
    /// Called before the wrapped callable runs
    fn before(&self, call: &CallInfo<'_>);

    /// Called after the wrapped callable returned `result`
    fn after(&self, call: &CallInfo<'_>, result: &dyn fmt::Debug);
}

/// Ordered list of interceptors applied to every traced call
#[derive(Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn CallInterceptor>>,
}

impl InterceptorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interceptor, returning the chain for chaining
    pub fn with(mut self, interceptor: Arc<dyn CallInterceptor>) -> Self {
        self.push(interceptor);
        self
    }

    pub fn push(&mut self, interceptor: Arc<dyn CallInterceptor>) {
        self.interceptors.push(interceptor);
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    pub fn before(&self, call: &CallInfo<'_>) {
        for interceptor in &self.interceptors {
            interceptor.before(call);
        }
    }

    pub fn after(&self, call: &CallInfo<'_>, result: &dyn fmt::Debug) {
        for interceptor in self.interceptors.iter().rev() {
            interceptor.after(call, result);
        }
    }
}
