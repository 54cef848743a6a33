//! The call-boundary tracer
//!
//! [`Tracer`] runs a callable between the `before` and `after` hooks of its
//! [`InterceptorChain`]. It never touches the callable's arguments, its
//! return value, or its error: a successful result is moved straight back
//! to the caller, and an error returns before any `after` hook fires.

use super::annotate::{Annotated, TraceMeta};
use super::call_args::{CallArgs, CallInfo};
use super::interceptor::{CallInterceptor, InterceptorChain};
use super::sink::TraceSink;
use super::start_end_log::StartEndLog;
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

/// Wraps calls with the interceptors of a chain
#[derive(Clone, Default)]
pub struct Tracer {
    chain: InterceptorChain,
    correlation_id: Option<String>,
}

impl Tracer {
    pub fn new(chain: InterceptorChain) -> Self {
        Self {
            chain,
            correlation_id: None,
        }
    }

    /// Tracer printing start/end lines to standard output
    pub fn stdout() -> Self {
        Self::new(InterceptorChain::new().with(Arc::new(StartEndLog::stdout())))
    }

    /// Tracer printing start/end lines to `sink`
    pub fn with_sink(sink: Arc<dyn TraceSink>) -> Self {
        Self::new(InterceptorChain::new().with(Arc::new(StartEndLog::new(sink))))
    }

    /// Append an interceptor after the existing ones
    pub fn with_interceptor(mut self, interceptor: Arc<dyn CallInterceptor>) -> Self {
        self.chain.push(interceptor);
        self
    }

    /// A copy of this tracer that tags every call with `correlation_id`
    pub fn with_correlation_id(&self, correlation_id: impl Into<String>) -> Self {
        Self {
            chain: self.chain.clone(),
            correlation_id: Some(correlation_id.into()),
        }
    }

    pub fn chain(&self) -> &InterceptorChain {
        &self.chain
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    /// Run `f` as the call `name`, announcing it to every interceptor
    pub fn trace<R, E, F>(&self, name: &str, meta: &TraceMeta, args: &CallArgs, f: F) -> Result<R, E>
    where
        R: fmt::Debug,
        F: FnOnce() -> Result<R, E>,
    {
        let call = CallInfo {
            name,
            meta,
            args,
            correlation_id: self.correlation_id(),
        };
        self.chain.before(&call);
        let result = f()?;
        self.chain.after(&call, &result);
        Ok(result)
    }

    /// [`Tracer::trace`] for callables that cannot fail
    pub fn trace_value<R, F>(&self, name: &str, meta: &TraceMeta, args: &CallArgs, f: F) -> R
    where
        R: fmt::Debug,
        F: FnOnce() -> R,
    {
        match self.trace(name, meta, args, || Ok::<R, Infallible>(f())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Wrap an annotated callable so each invocation is traced
    pub fn start_end_log<F>(&self, annotated: Annotated<F>) -> Traced<F> {
        Traced {
            tracer: self.clone(),
            inner: annotated,
        }
    }
}

/// Wrap `annotated` with `tracer`; see [`Tracer::start_end_log`]
pub fn start_end_log<F>(tracer: &Tracer, annotated: Annotated<F>) -> Traced<F> {
    tracer.start_end_log(annotated)
}

/// An annotated callable whose every call passes through a [`Tracer`]
///
/// The callable takes a receiver and the call's arguments, mirroring a
/// method invoked on an object. Annotators cannot be applied to a `Traced`,
/// so metadata is always fixed before tracing starts.
#[derive(Clone)]
pub struct Traced<F> {
    tracer: Tracer,
    inner: Annotated<F>,
}

impl<F> Traced<F> {
    pub fn name(&self) -> &'static str {
        self.inner.name()
    }

    pub fn meta(&self) -> &TraceMeta {
        self.inner.meta()
    }

    pub fn call<S, R, E>(&self, receiver: &S, args: &CallArgs) -> Result<R, E>
    where
        S: ?Sized,
        R: fmt::Debug,
        F: Fn(&S, &CallArgs) -> Result<R, E>,
    {
        let func = self.inner.func();
        self.tracer
            .trace(self.inner.name(), self.inner.meta(), args, || func(receiver, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracer::{level_log, message_log, MemorySink};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, PartialEq)]
    struct Boom(String);

    fn memory_tracer() -> (Tracer, MemorySink) {
        let sink = MemorySink::new();
        (Tracer::with_sink(Arc::new(sink.clone())), sink)
    }

    struct Counter {
        calls: AtomicUsize,
    }

    fn add(counter: &Counter, args: &CallArgs) -> Result<usize, Boom> {
        counter.calls.fetch_add(1, Ordering::SeqCst);
        Ok(args.positional().len())
    }

    fn fail(_: &Counter, _: &CallArgs) -> Result<usize, Boom> {
        Err(Boom("no such record".to_string()))
    }

    #[test]
    fn test_unannotated_call_prints_at_level_zero() {
        let (tracer, sink) = memory_tracer();
        let traced = tracer.start_end_log(Annotated::new("add", add));
        let counter = Counter {
            calls: AtomicUsize::new(0),
        };

        let args = CallArgs::new().arg(1).arg(2).kwarg("k", "v");
        let result = traced.call(&counter, &args);

        assert_eq!(result, Ok(2));
        assert_eq!(counter.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            sink.lines(),
            vec!["\n+++[add <- (1, 2) - {'k': 'v'}]", "---[add -> 2]\n"]
        );
    }

    #[test]
    fn test_level_sets_indentation_on_both_lines() {
        let (tracer, sink) = memory_tracer();
        let traced = tracer.start_end_log(level_log(3)(Annotated::new("add", add)));
        let counter = Counter {
            calls: AtomicUsize::new(0),
        };

        traced.call(&counter, &CallArgs::new()).unwrap();

        let lines = sink.lines();
        assert!(lines[0].starts_with("\n      +++[add"));
        assert!(lines[1].starts_with("      ---[add"));
    }

    #[test]
    fn test_error_propagates_without_end_line() {
        let (tracer, sink) = memory_tracer();
        let traced = tracer.start_end_log(level_log(1)(Annotated::new("get_object", fail)));
        let counter = Counter {
            calls: AtomicUsize::new(0),
        };

        for _ in 0..2 {
            let result = traced.call(&counter, &CallArgs::new());
            assert_eq!(result, Err(Boom("no such record".to_string())));
        }

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line.contains("+++[get_object")));
        assert!(!sink.contents().contains("---["));
    }

    #[test]
    fn test_return_value_identity_is_preserved() {
        let (tracer, _sink) = memory_tracer();
        let shared = Arc::new(String::from("payload"));
        let expected = Arc::clone(&shared);

        let returned = tracer
            .trace("get", &TraceMeta::default(), &CallArgs::new(), || {
                Ok::<_, Boom>(Arc::clone(&shared))
            })
            .unwrap();

        assert!(Arc::ptr_eq(&returned, &expected));
    }

    #[test]
    fn test_annotator_order_gives_identical_output() {
        let counter = Counter {
            calls: AtomicUsize::new(0),
        };
        let args = CallArgs::new().arg("request");

        let (tracer_a, sink_a) = memory_tracer();
        tracer_a
            .start_end_log(message_log("LMM")(level_log(2)(Annotated::new("list", add))))
            .call(&counter, &args)
            .unwrap();

        let (tracer_b, sink_b) = memory_tracer();
        tracer_b
            .start_end_log(level_log(2)(message_log("LMM")(Annotated::new("list", add))))
            .call(&counter, &args)
            .unwrap();

        assert_eq!(sink_a.lines(), sink_b.lines());
    }

    #[test]
    fn test_trace_value_for_infallible_calls() {
        let (tracer, sink) = memory_tracer();
        let value = tracer.trace_value("get_throttles", &TraceMeta::new(3, ""), &CallArgs::new(), || {
            Vec::<u8>::new()
        });

        assert!(value.is_empty());
        assert_eq!(sink.lines()[1], "      ---[get_throttles -> []]\n");
    }

    #[test]
    fn test_nested_calls_enclose_each_other() {
        let (tracer, sink) = memory_tracer();
        let outer_meta = TraceMeta::default();
        let inner_meta = TraceMeta::new(2, "");

        tracer.trace_value("dispatch", &outer_meta, &CallArgs::new(), || {
            tracer.trace_value("list", &inner_meta, &CallArgs::new(), || 1)
        });

        assert_eq!(
            sink.lines(),
            vec![
                "\n+++[dispatch <- () - {}]",
                "\n    +++[list <- () - {}]",
                "    ---[list -> 1]\n",
                "---[dispatch -> 1]\n",
            ]
        );
    }

    #[test]
    fn test_correlation_id_reaches_interceptors() {
        struct Capture(std::sync::Mutex<Vec<Option<String>>>);

        impl CallInterceptor for Capture {
            fn before(&self, call: &CallInfo<'_>) {
                self.0.lock().unwrap().push(call.correlation_id.map(str::to_string));
            }

            fn after(&self, _call: &CallInfo<'_>, _result: &dyn fmt::Debug) {}
        }

        let capture = Arc::new(Capture(std::sync::Mutex::new(Vec::new())));
        let tracer = Tracer::default()
            .with_interceptor(capture.clone())
            .with_correlation_id("req-1");

        tracer.trace_value("f", &TraceMeta::default(), &CallArgs::new(), || ());

        assert_eq!(tracer.correlation_id(), Some("req-1"));
        assert_eq!(*capture.0.lock().unwrap(), vec![Some("req-1".to_string())]);
    }
}
