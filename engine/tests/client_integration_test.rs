//! Integration tests for the task API client
//!
//! Uses wiremock as the endpoint, plus one end-to-end run against a real
//! listener serving the offline generator.

use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use focus_engine::api::{serve_with_listener, AppState, GENERATE_PATH};
use focus_engine::client::TaskApiClient;
use focus_engine::config::GenerationConfig;
use focus_engine::generation::{TaskGenerator, TaskSource};
use focus_sdk::{BucketSet, EngineError};

fn client(server: &MockServer, timeout: Duration) -> TaskApiClient {
    TaskApiClient::new(
        format!("{}{}", server.uri(), GENERATE_PATH),
        timeout,
        BucketSet::current(),
    )
}

#[tokio::test]
async fn test_filters_and_renumbers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_json(json!({"goal": "Finish essay"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tasks": [
                {"id": "a", "text": " Write intro ", "correctBucket": "Current Goal"},
                {"id": "b", "text": "Bad label", "correctBucket": "Whenever"},
                {"id": "c", "text": 7, "correctBucket": "Next Task"},
                {"id": "d", "text": "Check TikTok", "correctBucket": "After Work"}
            ]
        })))
        .mount(&server)
        .await;

    let tasks = client(&server, Duration::from_secs(5))
        .fetch_tasks("Finish essay", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, "t1");
    assert_eq!(tasks[0].text, "Write intro");
    assert_eq!(tasks[1].id, "t2");
    assert_eq!(tasks[1].text, "Check TikTok");
}

#[tokio::test]
async fn test_http_error_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client(&server, Duration::from_secs(5))
        .fetch_tasks("Essay", &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "API HTTP 502: bad gateway");
}

#[tokio::test]
async fn test_empty_list_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tasks": []})))
        .mount(&server)
        .await;

    let err = client(&server, Duration::from_secs(5))
        .fetch_tasks("Essay", &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NoTasks));
}

#[tokio::test]
async fn test_timeout_falls_back_with_notice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"tasks": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = client(&server, Duration::from_millis(200));
    let err = client
        .fetch_tasks("Essay", &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Timeout(_)));

    let outcome = client
        .fetch_or_fallback("Essay", &CancellationToken::new())
        .await;
    assert_eq!(outcome.source, TaskSource::Fallback);
    assert_eq!(outcome.tasks.len(), 7);
    assert_eq!(
        outcome.notice.as_deref(),
        Some("Task service took too long, using a starter set instead")
    );
}

#[tokio::test]
async fn test_cancel_in_flight() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"tasks": []}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let err = client(&server, Duration::from_secs(12))
        .fetch_tasks("Essay", &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Cancelled));
}

#[tokio::test]
async fn test_end_to_end_against_served_endpoint() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let generator = TaskGenerator::offline(BucketSet::current(), GenerationConfig::default());

    let shutdown = CancellationToken::new();
    let stop = shutdown.clone();
    let server = tokio::spawn(serve_with_listener(
        listener,
        AppState::new(generator),
        async move { stop.cancelled().await },
    ));

    let client = TaskApiClient::new(
        format!("http://{}{}", addr, GENERATE_PATH),
        Duration::from_secs(5),
        BucketSet::current(),
    );
    let outcome = client
        .fetch_or_fallback("Clean garage", &CancellationToken::new())
        .await;

    assert_eq!(outcome.source, TaskSource::Live);
    assert!(outcome.notice.is_none());
    assert_eq!(outcome.tasks.len(), 7);
    assert_eq!(outcome.tasks[0].text, "List 3 micro steps for Clean garage");

    shutdown.cancel();
    server.await.unwrap().unwrap();
}
