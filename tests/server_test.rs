use reqwest::StatusCode;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use viewtrace::account::{User, UserViewContext};
use viewtrace::store::ModelStore;
use viewtrace::tracer::{MemorySink, Tracer};
use viewtrace::{server, Result};

async fn start_server() -> (SocketAddr, MemorySink, JoinHandle<Result<()>>) {
    let sink = MemorySink::new();
    let store = ModelStore::from_records(vec![
        User::new(1, "alice", "alice@example.com"),
        User::new(2, "bob", "bob@example.com"),
    ]);
    let ctx = Arc::new(UserViewContext::new(store, Tracer::with_sink(Arc::new(sink.clone()))));

    let (tx, rx) = oneshot::channel();
    let bind: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let handle = tokio::spawn(server::serve_with_ready_notifier(bind, ctx, tx));
    let addr = tokio::time::timeout(Duration::from_secs(5), rx)
        .await
        .expect("server did not start in time")
        .expect("server dropped the ready notifier");
    (addr, sink, handle)
}

#[tokio::test]
async fn serves_list_and_detail_over_http() {
    let (addr, sink, handle) = start_server().await;
    let client = reqwest::Client::new();

    let list = client
        .get(format!("http://{}/APIView/", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(list.status(), StatusCode::OK);
    let users: Value = list.json().await.unwrap();
    assert_eq!(users.as_array().map(Vec::len), Some(2));

    let detail = client
        .get(format!("http://{}/APIView/1/", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(detail.status(), StatusCode::OK);
    let user: Value = detail.json().await.unwrap();
    assert_eq!(user["username"], "alice");

    let missing = client
        .get(format!("http://{}/APIView/3/", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["detail"], "Not found.");

    let contents = sink.contents();
    assert_eq!(contents.matches("+++[as_view").count(), 2);
    assert_eq!(contents.matches("+++[dispatch").count(), 3);
    assert_eq!(contents.matches("---[dispatch").count(), 3);
    assert_eq!(contents.matches("+++[get_object").count(), 2);
    assert_eq!(contents.matches("---[get_object").count(), 1);

    handle.abort();
}

#[tokio::test]
async fn bind_failure_is_reported() {
    let (addr, _sink, handle) = start_server().await;

    let ctx = Arc::new(UserViewContext::new(ModelStore::new(), Tracer::default()));
    let err = server::serve(addr, ctx).await.unwrap_err();
    assert!(err.to_string().contains("failed to bind"));

    handle.abort();
}
