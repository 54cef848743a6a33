//! Generic resource views.
//!
//! A small request pipeline in the shape of a classic class-based API view:
//! one view instance per request, a fixed sequence of overridable hooks, and
//! list/retrieve behaviour supplied by mixins.

pub mod base;
pub mod generic;
pub mod hooks;
pub mod permissions;
pub mod request;

pub use generic::{GenericApiView, ListModelMixin, RetrieveModelMixin};
pub use hooks::{HookSpec, HookTable};
pub use permissions::{AllowAny, Permission, Throttle};
pub use request::{ApiRequest, ApiResponse, HttpRequest, ParserContext, RequestUser, RouteKwargs};
