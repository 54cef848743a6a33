//! Request and response types flowing through the view pipeline.

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use serde_json::Value;
use std::fmt;

/// Keyword arguments captured from the URL route, in route order.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RouteKwargs {
    entries: Vec<(String, i64)>,
}

impl RouteKwargs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: i64) -> Self {
        let name = name.into();
        self.entries.retain(|(existing, _)| *existing != name);
        self.entries.push((name, value));
        self
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for RouteKwargs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self
            .entries
            .iter()
            .map(|(name, value)| format!("'{}': {}", name, value))
            .collect();
        write!(f, "{{{}}}", pairs.join(", "))
    }
}

/// The raw request as received from the HTTP server.
#[derive(Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

impl HttpRequest {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        Self {
            method,
            uri,
            headers,
        }
    }

    /// Shorthand for a header-less request.
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path.parse().unwrap_or_default(), HeaderMap::new())
    }

    /// Value of header `name`, if present and valid text.
    pub fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Path plus query string.
    pub fn full_path(&self) -> &str {
        self.uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| self.uri.path())
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<HttpRequest: {} '{}'>", self.method, self.full_path())
    }
}

/// Context handed to request parsers.
#[derive(Clone, PartialEq, Eq)]
pub struct ParserContext {
    pub view: &'static str,
    pub kwargs: RouteKwargs,
}

impl fmt::Debug for ParserContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{'view': <{}>, 'args': (), 'kwargs': {:?}}}",
            self.view, self.kwargs
        )
    }
}

/// Identity the request was authenticated as.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestUser {
    #[default]
    Anonymous,
    Authenticated(String),
}

impl fmt::Display for RequestUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "AnonymousUser"),
            Self::Authenticated(name) => write!(f, "{}", name),
        }
    }
}

/// A request wrapped for the API layer.
#[derive(Clone)]
pub struct ApiRequest {
    http: HttpRequest,
    parser_context: ParserContext,
    user: RequestUser,
    correlation_id: String,
}

impl ApiRequest {
    pub fn new(http: HttpRequest, parser_context: ParserContext, correlation_id: impl Into<String>) -> Self {
        Self {
            http,
            parser_context,
            user: RequestUser::Anonymous,
            correlation_id: correlation_id.into(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.http.method
    }

    pub fn http(&self) -> &HttpRequest {
        &self.http
    }

    pub fn parser_context(&self) -> &ParserContext {
        &self.parser_context
    }

    pub fn user(&self) -> &RequestUser {
        &self.user
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Request: {} '{}'>", self.http.method, self.http.full_path())
    }
}

/// A JSON response produced by a view.
#[derive(Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub data: Value,
    pub headers: HeaderMap,
}

impl ApiResponse {
    pub fn new(status: StatusCode, data: Value) -> Self {
        Self {
            status,
            data,
            headers: HeaderMap::new(),
        }
    }

    pub fn ok(data: Value) -> Self {
        Self::new(StatusCode::OK, data)
    }

    /// Set a header, ignoring values that are not valid header text.
    pub fn set_header(&mut self, name: HeaderName, value: &str) {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
    }

    pub fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

impl fmt::Debug for ApiResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Response status_code={}, \"application/json\">", self.status.as_u16())
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.data)).into_response();
        for (name, value) in self.headers.iter() {
            if *name != header::CONTENT_TYPE {
                response.headers_mut().insert(name.clone(), value.clone());
            }
        }
        response
    }
}
