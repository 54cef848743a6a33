//! Default behaviour of the generic view hooks.
//!
//! These are the implementations behind the trait's default methods. A view
//! that overrides a hook calls the matching function here to fall back to the
//! base behaviour; every nested hook call still goes through `view`, so
//! overrides further down the pipeline are honoured.

use super::generic::GenericApiView;
use super::request::{ApiRequest, ApiResponse, HttpRequest, ParserContext};
use crate::error::{Result, ViewTraceError};
use axum::http::{header, Method};
use serde_json::json;
use tracing::{debug, error};

/// Run the whole pipeline for one request.
///
/// Any error after the request is initialised becomes an error response, and
/// the response is finalised either way.
pub fn dispatch<V: GenericApiView + ?Sized>(view: &V, request: HttpRequest) -> ApiResponse {
    let request = view.initialize_request(request);
    let response = view
        .initial(&request)
        .and_then(|()| view.handle_method(&request))
        .unwrap_or_else(|err| view.handle_exception(err));
    view.finalize_response(&request, response)
}

pub fn initialize_request<V: GenericApiView + ?Sized>(view: &V, request: HttpRequest) -> ApiRequest {
    let parser_context = view.get_parser_context(&request);
    ApiRequest::new(request, parser_context, view.correlation_id())
}

pub fn get_parser_context<V: GenericApiView + ?Sized>(view: &V, _request: &HttpRequest) -> ParserContext {
    ParserContext {
        view: view.view_name(),
        kwargs: view.kwargs().clone(),
    }
}

pub fn initial<V: GenericApiView + ?Sized>(view: &V, request: &ApiRequest) -> Result<()> {
    view.perform_content_negotiation(request)?;
    view.perform_authentication(request)?;
    view.check_permissions(request)?;
    view.check_throttles(request)
}

/// Media type every response is rendered as.
pub const RENDERED_MEDIA_TYPE: &str = "application/json";

/// Refuse requests whose `Accept` header rules out JSON. A missing header accepts anything.
pub fn perform_content_negotiation<V: GenericApiView + ?Sized>(view: &V, request: &ApiRequest) -> Result<()> {
    let Some(accept) = request.http().header(&header::ACCEPT) else {
        return Ok(());
    };

    if accepts_json(accept) {
        Ok(())
    } else {
        debug!(view = view.view_name(), accept, "no acceptable renderer");
        Err(ViewTraceError::NotAcceptable)
    }
}

fn accepts_json(accept: &str) -> bool {
    if accept.trim().is_empty() {
        return true;
    }
    accept
        .split(',')
        .filter_map(|range| range.split(';').next())
        .map(|range| range.trim().to_ascii_lowercase())
        .any(|range| matches!(range.as_str(), "*/*" | "application/*" | RENDERED_MEDIA_TYPE))
}

pub fn perform_authentication<V: GenericApiView + ?Sized>(view: &V, request: &ApiRequest) -> Result<()> {
    debug!(view = view.view_name(), user = %request.user(), "request authenticated");
    Ok(())
}

pub fn check_permissions<V: GenericApiView + ?Sized>(view: &V, request: &ApiRequest) -> Result<()> {
    match view.get_permissions().iter().find(|p| !p.has_permission(request)) {
        Some(denied) => {
            debug!(view = view.view_name(), permission = ?denied, "permission denied");
            Err(ViewTraceError::PermissionDenied)
        }
        None => Ok(()),
    }
}

pub fn check_throttles<V: GenericApiView + ?Sized>(view: &V, request: &ApiRequest) -> Result<()> {
    let refused: Vec<Option<u64>> = view
        .get_throttles()
        .iter()
        .filter(|throttle| !throttle.allow_request(request))
        .map(|throttle| throttle.wait())
        .collect();

    if refused.is_empty() {
        Ok(())
    } else {
        Err(ViewTraceError::Throttled(refused.into_iter().flatten().max()))
    }
}

/// Route the request to the handler for its HTTP method.
pub fn handle_method<V: GenericApiView + ?Sized>(view: &V, request: &ApiRequest) -> Result<ApiResponse> {
    match *request.method() {
        Method::GET | Method::HEAD => view.get(request, view.kwargs()),
        ref other => Err(ViewTraceError::MethodNotAllowed(other.to_string())),
    }
}

pub fn handle_exception<V: GenericApiView + ?Sized>(view: &V, err: ViewTraceError) -> ApiResponse {
    if !err.is_api_error() {
        error!(view = view.view_name(), correlation_id = view.correlation_id(), "view failed: {}", err);
    }

    let mut response = ApiResponse::new(err.status_code(), json!({ "detail": err.detail() }));
    if let ViewTraceError::Throttled(Some(wait)) = err {
        response.set_header(header::RETRY_AFTER, &wait.to_string());
    }
    response
}

pub fn finalize_response<V: GenericApiView + ?Sized>(
    view: &V,
    _request: &ApiRequest,
    mut response: ApiResponse,
) -> ApiResponse {
    let allow: Vec<String> = view.allowed_methods().iter().map(Method::to_string).collect();
    response.set_header(header::ALLOW, &allow.join(", "));
    response.set_header(header::VARY, "Accept");
    response
}

pub fn get_object<V: GenericApiView + ?Sized>(view: &V) -> Result<V::Model> {
    let queryset = view.filter_queryset(view.get_queryset());
    let lookup = view.lookup_url_kwarg();
    let pk = view.kwargs().get(lookup).ok_or_else(|| {
        ViewTraceError::ServerError(format!(
            "Expected view {} to be called with a URL keyword argument named \"{}\".",
            view.view_name(),
            lookup
        ))
    })?;

    queryset.get_by_pk(pk).cloned().ok_or(ViewTraceError::NotFound)
}

pub fn list<V: GenericApiView + ?Sized>(view: &V, _request: &ApiRequest) -> Result<ApiResponse> {
    let queryset = view.filter_queryset(view.get_queryset());
    let serializer = view.get_serializer_class();
    Ok(ApiResponse::ok(serializer.serialize_many(&queryset)?))
}

pub fn retrieve<V: GenericApiView + ?Sized>(view: &V, _request: &ApiRequest) -> Result<ApiResponse> {
    let instance = view.get_object()?;
    let serializer = view.get_serializer_class();
    Ok(ApiResponse::ok(serializer.serialize(&instance)?))
}
