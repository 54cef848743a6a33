//! The traced user view.
//!
//! Every hook of the generic pipeline is overridden only to run the base
//! behaviour inside the tracer, at the level given by [`USER_VIEW_HOOKS`].

use super::models::User;
use super::serializers::USER_SERIALIZER;
use crate::error::Result;
use crate::serializers::SerializerClass;
use crate::store::{ModelStore, QuerySet};
use crate::tracer::{CallArgs, Tracer};
use crate::views::{
    base, ApiRequest, ApiResponse, GenericApiView, HookSpec, HookTable, HttpRequest,
    ListModelMixin, ParserContext, Permission, RetrieveModelMixin, RouteKwargs, Throttle,
};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

pub const USER_VIEW_HOOKS: &[HookSpec] = &[
    HookSpec::new("as_view", 0),
    HookSpec::new("dispatch", 0),
    HookSpec::new("initialize_request", 1),
    HookSpec::new("get_parser_context", 2),
    HookSpec::new("initial", 1),
    HookSpec::new("perform_authentication", 2),
    HookSpec::new("check_permissions", 2),
    HookSpec::new("get_permissions", 3),
    HookSpec::new("check_throttles", 2),
    HookSpec::new("get_throttles", 3),
    HookSpec::new("finalize_response", 1),
    HookSpec::new("get", 1),
    HookSpec::new("get_queryset", 1),
    HookSpec::new("get_serializer_class", 1),
    HookSpec::new("get_object", 1),
    HookSpec::new("list", 2).message("LMM"),
    HookSpec::new("retrieve", 2).message("LMM"),
];

/// State shared by every [`UserView`] instance.
pub struct UserViewContext {
    store: ModelStore<User>,
    hooks: HookTable,
    tracer: Tracer,
}

impl UserViewContext {
    pub fn new(store: ModelStore<User>, tracer: Tracer) -> Self {
        Self {
            store,
            hooks: HookTable::from_specs(USER_VIEW_HOOKS),
            tracer,
        }
    }

    pub fn store(&self) -> &ModelStore<User> {
        &self.store
    }

    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }
}

/// Entry point produced by [`UserView::as_view`]; builds one view per request.
#[derive(Clone)]
pub struct ViewHandler {
    ctx: Arc<UserViewContext>,
}

impl ViewHandler {
    pub fn handle(&self, request: HttpRequest, kwargs: RouteKwargs) -> ApiResponse {
        UserView::new(Arc::clone(&self.ctx), kwargs).dispatch(request)
    }
}

impl fmt::Debug for ViewHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function UserView.as_view.<locals>.view>")
    }
}

/// List and detail view over [`User`] records, looked up by the `key` URL keyword.
pub struct UserView {
    ctx: Arc<UserViewContext>,
    kwargs: RouteKwargs,
    correlation_id: String,
    tracer: Tracer,
}

impl UserView {
    pub fn new(ctx: Arc<UserViewContext>, kwargs: RouteKwargs) -> Self {
        let correlation_id = Uuid::new_v4().to_string();
        let tracer = ctx.tracer.with_correlation_id(correlation_id.as_str());
        Self {
            ctx,
            kwargs,
            correlation_id,
            tracer,
        }
    }

    pub fn as_view(ctx: Arc<UserViewContext>) -> ViewHandler {
        let meta = ctx.hooks.meta("as_view");
        ctx.tracer.trace_value("as_view", meta, &CallArgs::new(), || ViewHandler {
            ctx: Arc::clone(&ctx),
        })
    }

    fn traced<R, F>(&self, hook: &'static str, args: CallArgs, f: F) -> Result<R>
    where
        R: fmt::Debug,
        F: FnOnce() -> Result<R>,
    {
        self.tracer.trace(hook, self.ctx.hooks.meta(hook), &args, f)
    }

    fn traced_value<R, F>(&self, hook: &'static str, args: CallArgs, f: F) -> R
    where
        R: fmt::Debug,
        F: FnOnce() -> R,
    {
        self.tracer.trace_value(hook, self.ctx.hooks.meta(hook), &args, f)
    }

    /// `request` followed by the route keywords, the shape most hooks take.
    fn request_args(&self, request: impl fmt::Debug) -> CallArgs {
        CallArgs::new().arg(request).kwargs(self.kwargs.iter())
    }
}

impl GenericApiView for UserView {
    type Model = User;

    fn view_name(&self) -> &'static str {
        "UserView"
    }

    fn kwargs(&self) -> &RouteKwargs {
        &self.kwargs
    }

    fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    fn store(&self) -> &ModelStore<User> {
        &self.ctx.store
    }

    fn serializer_class(&self) -> SerializerClass<User> {
        USER_SERIALIZER
    }

    fn lookup_url_kwarg(&self) -> &'static str {
        "key"
    }

    fn dispatch(&self, request: HttpRequest) -> ApiResponse {
        let args = self.request_args(&request);
        self.traced_value("dispatch", args, || base::dispatch(self, request))
    }

    fn initialize_request(&self, request: HttpRequest) -> ApiRequest {
        let args = self.request_args(&request);
        self.traced_value("initialize_request", args, || {
            base::initialize_request(self, request)
        })
    }

    fn get_parser_context(&self, request: &HttpRequest) -> ParserContext {
        self.traced_value("get_parser_context", CallArgs::new().arg(request), || {
            base::get_parser_context(self, request)
        })
    }

    fn initial(&self, request: &ApiRequest) -> Result<()> {
        self.traced("initial", self.request_args(request), || base::initial(self, request))
    }

    fn perform_authentication(&self, request: &ApiRequest) -> Result<()> {
        self.traced("perform_authentication", CallArgs::new().arg(request), || {
            base::perform_authentication(self, request)
        })
    }

    fn check_permissions(&self, request: &ApiRequest) -> Result<()> {
        self.traced("check_permissions", CallArgs::new().arg(request), || {
            base::check_permissions(self, request)
        })
    }

    fn get_permissions(&self) -> Vec<Arc<dyn Permission>> {
        self.traced_value("get_permissions", CallArgs::new(), || self.permission_classes())
    }

    fn check_throttles(&self, request: &ApiRequest) -> Result<()> {
        self.traced("check_throttles", CallArgs::new().arg(request), || {
            base::check_throttles(self, request)
        })
    }

    fn get_throttles(&self) -> Vec<Arc<dyn Throttle>> {
        self.traced_value("get_throttles", CallArgs::new(), || self.throttle_classes())
    }

    fn get(&self, request: &ApiRequest, kwargs: &RouteKwargs) -> Result<ApiResponse> {
        let args = CallArgs::new().arg(request).kwargs(kwargs.iter());
        self.traced("get", args, || {
            // A zero key is falsy and lists like a bare collection URL.
            if kwargs.get(self.lookup_url_kwarg()).is_some_and(|key| key != 0) {
                self.retrieve(request)
            } else {
                self.list(request)
            }
        })
    }

    fn finalize_response(&self, request: &ApiRequest, response: ApiResponse) -> ApiResponse {
        let args = CallArgs::new()
            .arg(request)
            .arg(&response)
            .kwargs(self.kwargs.iter());
        self.traced_value("finalize_response", args, || {
            base::finalize_response(self, request, response)
        })
    }

    fn get_queryset(&self) -> QuerySet<User> {
        self.traced_value("get_queryset", CallArgs::new(), || self.ctx.store.all())
    }

    fn get_serializer_class(&self) -> SerializerClass<User> {
        self.traced_value("get_serializer_class", CallArgs::new(), || self.serializer_class())
    }

    fn get_object(&self) -> Result<User> {
        self.traced("get_object", CallArgs::new(), || base::get_object(self))
    }
}

impl ListModelMixin for UserView {
    fn list(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.traced("list", CallArgs::new().arg(request), || base::list(self, request))
    }
}

impl RetrieveModelMixin for UserView {
    fn retrieve(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.traced("retrieve", CallArgs::new().arg(request), || base::retrieve(self, request))
    }
}
