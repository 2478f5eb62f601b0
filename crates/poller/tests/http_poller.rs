//! HttpPoller against an in-process fake status API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use herald_common::error::TransportError;
use herald_common::types::TimeCursor;
use herald_poller::poller::{HttpPoller, StatusSource};

#[derive(Clone, Default)]
struct FakeStatusApi {
    requests: Arc<Mutex<Vec<(Option<String>, Option<String>)>>>,
}

async fn statuses(
    State(api): State<FakeStatusApi>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let from_date = params.get("from_date").cloned();
    api.requests.lock().unwrap().push((auth.clone(), from_date));

    if auth.as_deref() != Some("OAuth secret") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"code": "not_authenticated"})),
        )
            .into_response();
    }
    Json(json!({
        "homeworks": [{"homework_name": "hw", "status": "approved"}],
        "current_date": 1700000100
    }))
    .into_response()
}

async fn garbage() -> &'static str {
    "<html>maintenance</html>"
}

async fn spawn_fake_api(api: FakeStatusApi) -> String {
    let app = Router::new()
        .route("/homework_statuses/", get(statuses))
        .route("/broken/", get(garbage))
        .with_state(api);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_fetch_sends_cursor_and_oauth_header() {
    let api = FakeStatusApi::default();
    let base = spawn_fake_api(api.clone()).await;
    let poller = HttpPoller::new(client(), format!("{}/homework_statuses/", base), "secret");

    let body = poller.fetch(TimeCursor::new(1_700_000_000)).await.unwrap();

    assert_eq!(body["current_date"], 1700000100);
    assert_eq!(body["homeworks"][0]["homework_name"], "hw");
    let requests = api.requests.lock().unwrap();
    assert_eq!(
        requests[0],
        (
            Some("OAuth secret".to_string()),
            Some("1700000000".to_string())
        )
    );
}

#[tokio::test]
async fn test_non_success_status_is_transport_error() {
    let base = spawn_fake_api(FakeStatusApi::default()).await;
    let poller = HttpPoller::new(client(), format!("{}/homework_statuses/", base), "wrong");

    let err = poller.fetch(TimeCursor::new(0)).await.unwrap_err();

    assert!(matches!(err, TransportError::Status { status: 401 }));
}

#[tokio::test]
async fn test_missing_endpoint_is_transport_error() {
    let base = spawn_fake_api(FakeStatusApi::default()).await;
    let poller = HttpPoller::new(client(), format!("{}/nowhere/", base), "secret");

    let err = poller.fetch(TimeCursor::new(0)).await.unwrap_err();

    assert!(matches!(err, TransportError::Status { status: 404 }));
}

#[tokio::test]
async fn test_undecodable_body_is_not_masked() {
    let base = spawn_fake_api(FakeStatusApi::default()).await;
    let poller = HttpPoller::new(client(), format!("{}/broken/", base), "secret");

    let err = poller.fetch(TimeCursor::new(0)).await.unwrap_err();

    assert!(matches!(err, TransportError::Decode(_)));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let poller = HttpPoller::new(client(), format!("http://{}/homework_statuses/", addr), "secret");

    let err = poller.fetch(TimeCursor::new(0)).await.unwrap_err();

    assert!(matches!(err, TransportError::Request(_)));
}
