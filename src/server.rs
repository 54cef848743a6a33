//! HTTP wiring for the user view.
//!
//! Two routes reach the same view: the collection URL lists every user and
//! the keyed URL retrieves one. Each route gets its own handler from
//! [`UserView::as_view`], built once when the router is assembled.

use crate::account::{User, UserView, UserViewContext, ViewHandler};
use crate::config::AppConfig;
use crate::error::{Result, ViewTraceError};
use crate::store::ModelStore;
use crate::tracer::{Tracer, TracerSystem};
use crate::views::{HttpRequest, RouteKwargs};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{debug, error, info};

pub const LIST_ROUTE: &str = "/APIView/";
pub const DETAIL_ROUTE: &str = "/APIView/{key}/";

/// URL keyword the detail route captures.
pub const LOOKUP_KWARG: &str = "key";

#[derive(Clone)]
struct RouteViews {
    list: ViewHandler,
    detail: ViewHandler,
}

/// Event recorder sized by the configured capacity.
pub fn event_system(config: &AppConfig) -> Arc<TracerSystem> {
    Arc::new(TracerSystem::bounded(config.event_capacity))
}

/// Tracer for the configured outputs: stdout lines and, optionally, `events`.
pub fn build_tracer(config: &AppConfig, events: &Arc<TracerSystem>) -> Tracer {
    let tracer = if config.trace_stdout {
        Tracer::stdout()
    } else {
        Tracer::default()
    };
    if config.record_events {
        tracer.with_interceptor(events.clone())
    } else {
        tracer
    }
}

/// The user store, seeded from the configured JSON file if any.
pub fn load_store(config: &AppConfig) -> Result<ModelStore<User>> {
    match &config.seed_path {
        Some(path) => {
            let store = ModelStore::load_json(path)?;
            info!("loaded {} users from {}", store.len(), path.display());
            Ok(store)
        }
        None => Ok(ModelStore::new()),
    }
}

pub fn router(ctx: Arc<UserViewContext>) -> Router {
    let views = RouteViews {
        list: UserView::as_view(Arc::clone(&ctx)),
        detail: UserView::as_view(ctx),
    };

    Router::new()
        .route(LIST_ROUTE, any(list_endpoint))
        .route(DETAIL_ROUTE, any(detail_endpoint))
        .with_state(views)
}

async fn list_endpoint(
    State(views): State<RouteViews>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    debug!(%method, %uri, "dispatching to user list");
    views
        .list
        .handle(HttpRequest::new(method, uri, headers), RouteKwargs::new())
        .into_response()
}

async fn detail_endpoint(
    State(views): State<RouteViews>,
    Path(key): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let Some(key) = parse_key(&key) else {
        debug!(%uri, "rejecting non-numeric key");
        return StatusCode::NOT_FOUND.into_response();
    };

    debug!(%method, %uri, key, "dispatching to user detail");
    views
        .detail
        .handle(
            HttpRequest::new(method, uri, headers),
            RouteKwargs::new().with(LOOKUP_KWARG, key),
        )
        .into_response()
}

/// Keys are one or more ASCII digits.
fn parse_key(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, ctx: Arc<UserViewContext>) -> Result<()> {
    serve_internal(addr, ctx, None).await
}

/// Serve until Ctrl-C, reporting the bound address once listening.
pub async fn serve_with_ready_notifier(
    addr: SocketAddr,
    ctx: Arc<UserViewContext>,
    ready_notifier: oneshot::Sender<SocketAddr>,
) -> Result<()> {
    serve_internal(addr, ctx, Some(ready_notifier)).await
}

async fn serve_internal(
    addr: SocketAddr,
    ctx: Arc<UserViewContext>,
    ready_notifier: Option<oneshot::Sender<SocketAddr>>,
) -> Result<()> {
    let app = router(ctx);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|err| ViewTraceError::ServerError(format!("failed to bind {}: {}", addr, err)))?;
    let local_addr = listener.local_addr()?;
    if let Some(tx) = ready_notifier {
        let _ = tx.send(local_addr);
    }

    info!("user view server listening on {}", local_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| ViewTraceError::ServerError(format!("server terminated: {}", err)))?;
    info!("user view server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(err) => {
            error!("cannot listen for Ctrl-C, serving until killed: {}", err);
            std::future::pending::<()>().await;
        }
    }
}
