//! # viewtrace
//!
//! Call-boundary tracing for the lifecycle hooks of a generic HTTP resource view.
//!
//! Every hook of [`account::UserView`] runs inside a [`tracer::Tracer`], which
//! prints an indented start line before the hook and an end line with its
//! result after it returns. The indentation follows a per-hook nesting level,
//! so the output reads as a call tree of one request.

pub mod account;
pub mod config;
pub mod error;
pub mod logging;
pub mod serializers;
pub mod server;
pub mod store;
pub mod tracer;
pub mod views;

pub use error::{Result, ViewTraceError};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::account::{User, UserView, UserViewContext};
    pub use crate::config::AppConfig;
    pub use crate::error::{Result, ViewTraceError};
    pub use crate::store::{Model, ModelStore, QuerySet};
    pub use crate::tracer::{level_log, message_log, Annotated, CallArgs, Tracer, TracerSystem};
    pub use crate::views::{GenericApiView, ListModelMixin, RetrieveModelMixin};
}
