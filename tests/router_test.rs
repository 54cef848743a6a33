use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use regex::Regex;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tower::ServiceExt;
use viewtrace::account::UserViewContext;
use viewtrace::config::AppConfig;
use viewtrace::server::{load_store, router};
use viewtrace::tracer::{MemorySink, Tracer, TracerEvent, TracerSystem};

const SEED: &str = r#"[
    {"id": 1, "username": "alice", "email": "alice@example.com"},
    {"id": 2, "username": "bob", "email": "bob@example.com", "is_active": false}
]"#;

struct App {
    router: axum::Router,
    sink: MemorySink,
    events: Arc<TracerSystem>,
    _seed: NamedTempFile,
}

fn app() -> App {
    let mut seed = NamedTempFile::new().unwrap();
    write!(seed, "{}", SEED).unwrap();
    let config = AppConfig {
        seed_path: Some(seed.path().to_path_buf()),
        ..AppConfig::default()
    };

    let sink = MemorySink::new();
    let events = Arc::new(TracerSystem::default());
    let tracer = Tracer::with_sink(Arc::new(sink.clone())).with_interceptor(events.clone());
    let ctx = Arc::new(UserViewContext::new(load_store(&config).unwrap(), tracer));

    let router = router(ctx);
    sink.clear();
    events.clear();

    App {
        router,
        sink,
        events,
        _seed: seed,
    }
}

async fn send(app: &App, method: Method, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

#[tokio::test]
async fn list_returns_every_user() {
    let app = app();
    let (status, headers, body) = send(&app, Method::GET, "/APIView/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/json");
    assert_eq!(headers.get(header::VARY).unwrap(), "Accept");

    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|user| user["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["alice", "bob"]);
    assert_eq!(body[1]["is_active"], false);
}

#[tokio::test]
async fn retrieve_returns_one_user() {
    let app = app();
    let (status, _, body) = send(&app, Method::GET, "/APIView/2/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 2);
    assert_eq!(body["email"], "bob@example.com");

    let lines = app.sink.contents();
    assert!(lines.contains("\n+++[dispatch <- (<HttpRequest: GET '/APIView/2/'>,) - {'key': 2}]"));
    assert!(lines.contains("  ---[get_object -> <User: bob>]"));
}

#[tokio::test]
async fn missing_user_is_404_without_get_object_end_line() {
    let app = app();
    let (status, _, body) = send(&app, Method::GET, "/APIView/999/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Not found."}));

    let contents = app.sink.contents();
    assert!(contents.contains("  +++[get_object <- () - {}]"));
    assert!(!contents.contains("---[get_object"));
    assert!(contents.ends_with("---[dispatch -> <Response status_code=404, \"application/json\">]\n\n"));
}

#[tokio::test]
async fn non_numeric_key_never_reaches_the_view() {
    let app = app();
    let (status, _, _) = send(&app, Method::GET, "/APIView/alice/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.sink.lines().is_empty());
    assert!(app.events.is_empty());
}

#[tokio::test]
async fn post_is_rejected_by_the_view() {
    let app = app();
    let (status, headers, body) = send(&app, Method::POST, "/APIView/").await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(headers.get(header::ALLOW).unwrap(), "GET, HEAD");
    assert_eq!(body["detail"], "Method \"POST\" not allowed.");
    assert!(app.sink.contents().contains("+++[dispatch"));
}

#[tokio::test]
async fn html_only_accept_header_is_406() {
    let app = app();
    let request = Request::builder()
        .uri("/APIView/1/")
        .header(header::ACCEPT, "text/html")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let contents = app.sink.contents();
    assert!(contents.contains("+++[initial <- "));
    assert!(!contents.contains("---[initial -> "));
    assert!(!contents.contains("+++[get_object"));
    assert!(contents.ends_with("---[dispatch -> <Response status_code=406, \"application/json\">]\n\n"));
}

#[tokio::test]
async fn every_line_has_the_trace_shape() {
    let app = app();
    send(&app, Method::GET, "/APIView/").await;
    send(&app, Method::GET, "/APIView/1/").await;

    let start = Regex::new(r"^\n(  )*\+\+\+\[[a-z_]+ <- \(.*\) - \{.*\}\]$").unwrap();
    let end = Regex::new(r"^(  )*---\[[a-z_]+ -> .*\]\n$").unwrap();

    let lines = app.sink.lines();
    assert!(!lines.is_empty());
    for line in &lines {
        assert!(
            start.is_match(line) || end.is_match(line),
            "unexpected trace line {:?}",
            line
        );
    }
    let starts = lines.iter().filter(|line| start.is_match(line)).count();
    assert_eq!(starts * 2, lines.len());
}

#[tokio::test]
async fn each_request_has_its_own_correlation_id() {
    let app = app();
    send(&app, Method::GET, "/APIView/").await;
    send(&app, Method::GET, "/APIView/1/").await;

    let dispatch_only = |event: &dyn TracerEvent| event.method() == "dispatch";
    let summaries = app.events.get_event_summaries(None, None, Some(&dispatch_only));
    assert_eq!(summaries.len(), 4);

    let ids: Vec<String> = summaries
        .iter()
        .filter_map(|summary| {
            summary
                .split("(correlation_id: ")
                .nth(1)
                .and_then(|rest| rest.split(')').next())
                .map(str::to_string)
        })
        .collect();
    assert_eq!(ids.len(), 4);
    assert_eq!(ids[0], ids[1]);
    assert_eq!(ids[2], ids[3]);
    assert_ne!(ids[0], ids[2]);
}
