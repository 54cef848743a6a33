//! Permission and throttle policies consulted by [`initial`](super::GenericApiView::initial).

use super::request::ApiRequest;
use std::fmt;

/// Decides whether a request may reach the handler.
pub trait Permission: fmt::Debug + Send + Sync {
    fn has_permission(&self, request: &ApiRequest) -> bool;
}

/// Lets every request through.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAny;

impl Permission for AllowAny {
    fn has_permission(&self, _request: &ApiRequest) -> bool {
        true
    }
}

/// Rate policy; a refused request is answered with 429.
pub trait Throttle: fmt::Debug + Send + Sync {
    fn allow_request(&self, request: &ApiRequest) -> bool;

    /// Seconds until the next request would be allowed, when known.
    fn wait(&self) -> Option<u64> {
        None
    }
}
