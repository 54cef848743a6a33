//! The printed start/end trace lines
//!
//! For each successful call two lines are written:
//!
//! ```text
//! \n<indent>+++[<name> <- <positional> - <keyword>]
//! <indent>---[<name> -> <result>]\n
//! ```
//!
//! A call that fails only ever produces the first line.

use super::call_args::{repr, CallInfo};
use super::interceptor::CallInterceptor;
use super::sink::{StdoutSink, TraceSink};
use std::fmt;
use std::sync::Arc;

pub fn format_start(call: &CallInfo<'_>) -> String {
    format!(
        "\n{}+++[{} <- {} - {}]",
        call.meta.indent(),
        call.name,
        call.args.render_positional(),
        call.args.render_keyword()
    )
}

pub fn format_end(call: &CallInfo<'_>, result: &dyn fmt::Debug) -> String {
    format!("{}---[{} -> {}]\n", call.meta.indent(), call.name, repr(result))
}

/// Interceptor printing start and end lines to a [`TraceSink`]
#[derive(Clone)]
pub struct StartEndLog {
    sink: Arc<dyn TraceSink>,
}

impl StartEndLog {
    pub fn new(sink: Arc<dyn TraceSink>) -> Self {
        Self { sink }
    }

    pub fn stdout() -> Self {
        Self::new(Arc::new(StdoutSink))
    }
}

impl CallInterceptor for StartEndLog {
    fn before(&self, call: &CallInfo<'_>) {
        self.sink.emit(&format_start(call));
    }

    fn after(&self, call: &CallInfo<'_>, result: &dyn fmt::Debug) {
        self.sink.emit(&format_end(call, result));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracer::{CallArgs, MemorySink, TraceMeta};

    #[test]
    fn test_start_line_format() {
        let meta = TraceMeta::new(1, "ignored");
        let args = CallArgs::new().arg(1).arg(2).kwarg("k", "v");
        let call = CallInfo {
            name: "get",
            meta: &meta,
            args: &args,
            correlation_id: None,
        };

        assert_eq!(format_start(&call), "\n  +++[get <- (1, 2) - {'k': 'v'}]");
    }

    #[test]
    fn test_end_line_format() {
        let meta = TraceMeta::new(2, "");
        let args = CallArgs::new();
        let call = CallInfo {
            name: "list",
            meta: &meta,
            args: &args,
            correlation_id: None,
        };

        assert_eq!(format_end(&call, &vec![1, 2]), "    ---[list -> [1, 2]]\n");
    }

    #[test]
    fn test_message_tag_is_not_printed() {
        let meta = TraceMeta::new(0, "LMM");
        let args = CallArgs::new();
        let call = CallInfo {
            name: "retrieve",
            meta: &meta,
            args: &args,
            correlation_id: None,
        };

        assert!(!format_start(&call).contains("LMM"));
        assert!(!format_end(&call, &()).contains("LMM"));
    }

    #[test]
    fn test_interceptor_writes_to_sink() {
        let sink = MemorySink::new();
        let log = StartEndLog::new(Arc::new(sink.clone()));
        let meta = TraceMeta::default();
        let args = CallArgs::new();
        let call = CallInfo {
            name: "f",
            meta: &meta,
            args: &args,
            correlation_id: Some("abc"),
        };

        log.before(&call);
        log.after(&call, &"done");

        assert_eq!(sink.lines(), vec!["\n+++[f <- () - {}]", "---[f -> 'done']\n"]);
    }
}
