//! Call-boundary tracing for view hooks
//!
//! A traced call prints a start line before the wrapped callable runs and an
//! end line once it returns successfully, each indented by the callable's
//! trace level. Failed calls print only the start line and their error
//! reaches the caller untouched.
//!
//! # Architecture
//!
//! - **TraceMeta / Annotated**: level and message metadata fixed where a callable is defined
//! - **level_log / message_log**: annotators attaching that metadata
//! - **Tracer / Traced**: run a callable between interceptor hooks
//! - **CallInterceptor / InterceptorChain**: ordered `before`/`after` observers
//! - **StartEndLog**: the interceptor printing `+++[...]` / `---[...]` lines to a `TraceSink`
//! - **TracerSystem / EventStore**: the interceptor recording structured method events
//!
//! # Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//! use viewtrace::tracer::{level_log, Annotated, CallArgs, MemorySink, Tracer};
//!
//! let sink = MemorySink::new();
//! let tracer = Tracer::with_sink(Arc::new(sink.clone()));
//!
//! fn total(base: &i32, args: &CallArgs) -> Result<i32, String> {
//!     Ok(*base + args.positional().len() as i32)
//! }
//!
//! let traced = tracer.start_end_log(level_log(1)(Annotated::new("total", total)));
//! let result = traced.call(&40, &CallArgs::new().arg(1).arg(2));
//!
//! assert_eq!(result, Ok(42));
//! assert_eq!(sink.lines(), vec!["\n  +++[total <- (1, 2) - {}]", "  ---[total -> 42]\n"]);
//! ```

pub mod annotate;
pub mod call_args;
pub mod call_tracer;
pub mod event_store;
pub mod interceptor;
pub mod sink;
pub mod start_end_log;
pub mod tracer_events;
pub mod tracer_system;

pub use annotate::{level_log, message_log, Annotated, TraceMeta};
pub use call_args::{repr, CallArgs, CallInfo};
pub use call_tracer::{start_end_log, Traced, Tracer};
pub use event_store::{EventCallback, EventStore};
pub use interceptor::{CallInterceptor, InterceptorChain};
pub use sink::{MemorySink, StdoutSink, TraceSink};
pub use start_end_log::StartEndLog;
pub use tracer_events::{EventFilterFn, MethodEntryTracerEvent, MethodExitTracerEvent, TracerEvent};
pub use tracer_system::TracerSystem;
