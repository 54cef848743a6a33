//! The generic resource view and its list/retrieve mixins.
//!
//! A view instance lives for exactly one request. The framework calls
//! [`GenericApiView::dispatch`], which walks the hooks in a fixed order:
//!
//! ```text
//! dispatch
//! ├── initialize_request
//! │   └── get_parser_context
//! ├── initial
//! │   ├── perform_content_negotiation
//! │   ├── perform_authentication
//! │   ├── check_permissions ── get_permissions
//! │   └── check_throttles ──── get_throttles
//! ├── handle_method ── get ── list / retrieve
//! ├── handle_exception          (only on error)
//! └── finalize_response
//! ```
//!
//! Every hook has a default implementation in [`base`](super::base); an
//! implementor overrides whichever hooks it needs and calls the `base`
//! function to keep the default behaviour.

use super::base;
use super::permissions::{AllowAny, Permission, Throttle};
use super::request::{ApiRequest, ApiResponse, HttpRequest, ParserContext, RouteKwargs};
use crate::error::{Result, ViewTraceError};
use crate::serializers::SerializerClass;
use crate::store::{Model, ModelStore, QuerySet};
use axum::http::Method;
use std::sync::Arc;

pub trait GenericApiView: Send + Sync {
    type Model: Model;

    /// Name shown wherever the view itself is rendered.
    fn view_name(&self) -> &'static str;

    /// Keyword arguments captured from the URL for this request.
    fn kwargs(&self) -> &RouteKwargs;

    /// Id shared by everything recorded for this request.
    fn correlation_id(&self) -> &str;

    fn store(&self) -> &ModelStore<Self::Model>;

    fn serializer_class(&self) -> SerializerClass<Self::Model>;

    /// URL keyword holding the primary key for detail lookups.
    fn lookup_url_kwarg(&self) -> &'static str {
        "pk"
    }

    fn allowed_methods(&self) -> Vec<Method> {
        vec![Method::GET, Method::HEAD]
    }

    fn permission_classes(&self) -> Vec<Arc<dyn Permission>> {
        vec![Arc::new(AllowAny)]
    }

    fn throttle_classes(&self) -> Vec<Arc<dyn Throttle>> {
        Vec::new()
    }

    fn dispatch(&self, request: HttpRequest) -> ApiResponse {
        base::dispatch(self, request)
    }

    fn initialize_request(&self, request: HttpRequest) -> ApiRequest {
        base::initialize_request(self, request)
    }

    fn get_parser_context(&self, request: &HttpRequest) -> ParserContext {
        base::get_parser_context(self, request)
    }

    fn initial(&self, request: &ApiRequest) -> Result<()> {
        base::initial(self, request)
    }

    fn perform_content_negotiation(&self, request: &ApiRequest) -> Result<()> {
        base::perform_content_negotiation(self, request)
    }

    fn perform_authentication(&self, request: &ApiRequest) -> Result<()> {
        base::perform_authentication(self, request)
    }

    fn check_permissions(&self, request: &ApiRequest) -> Result<()> {
        base::check_permissions(self, request)
    }

    fn get_permissions(&self) -> Vec<Arc<dyn Permission>> {
        self.permission_classes()
    }

    fn check_throttles(&self, request: &ApiRequest) -> Result<()> {
        base::check_throttles(self, request)
    }

    fn get_throttles(&self) -> Vec<Arc<dyn Throttle>> {
        self.throttle_classes()
    }

    fn handle_method(&self, request: &ApiRequest) -> Result<ApiResponse> {
        base::handle_method(self, request)
    }

    /// Handler for GET (and HEAD). Views without one answer 405.
    fn get(&self, request: &ApiRequest, _kwargs: &RouteKwargs) -> Result<ApiResponse> {
        Err(ViewTraceError::MethodNotAllowed(request.method().to_string()))
    }

    fn handle_exception(&self, err: ViewTraceError) -> ApiResponse {
        base::handle_exception(self, err)
    }

    fn finalize_response(&self, request: &ApiRequest, response: ApiResponse) -> ApiResponse {
        base::finalize_response(self, request, response)
    }

    fn get_queryset(&self) -> QuerySet<Self::Model> {
        self.store().all()
    }

    fn filter_queryset(&self, queryset: QuerySet<Self::Model>) -> QuerySet<Self::Model> {
        queryset
    }

    fn get_serializer_class(&self) -> SerializerClass<Self::Model> {
        self.serializer_class()
    }

    fn get_object(&self) -> Result<Self::Model> {
        base::get_object(self)
    }
}

/// Adds `list`: serialize the whole filtered queryset.
pub trait ListModelMixin: GenericApiView {
    fn list(&self, request: &ApiRequest) -> Result<ApiResponse> {
        base::list(self, request)
    }
}

/// Adds `retrieve`: serialize the object named by the URL.
pub trait RetrieveModelMixin: GenericApiView {
    fn retrieve(&self, request: &ApiRequest) -> Result<ApiResponse> {
        base::retrieve(self, request)
    }
}
