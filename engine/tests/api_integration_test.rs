//! Integration tests for the task endpoint router
//!
//! Requests go through `tower::ServiceExt::oneshot`; no socket is bound.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use focus_engine::api::{router, AppState, GENERATE_PATH, HEALTH_PATH};
use focus_engine::config::GenerationConfig;
use focus_engine::generation::TaskGenerator;
use focus_sdk::BucketSet;

fn app() -> axum::Router {
    let generator = TaskGenerator::offline(BucketSet::current(), GenerationConfig::default());
    router(AppState::new(generator))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let res = app().oneshot(request).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn post_json(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(GENERATE_PATH)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_get_is_method_not_allowed() {
    let req = Request::builder()
        .method("GET")
        .uri(GENERATE_PATH)
        .body(Body::empty())
        .unwrap();

    let (status, json) = send(req).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json, json!({"error": "Method not allowed"}));
}

#[tokio::test]
async fn test_put_is_method_not_allowed() {
    let req = Request::builder()
        .method("PUT")
        .uri(GENERATE_PATH)
        .body(Body::from(r#"{"goal":"x"}"#))
        .unwrap();

    let (status, _) = send(req).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_missing_goal() {
    let (status, json) = send(post_json(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({"error": "Missing goal"}));

    let (status, _) = send(post_json(json!({"goal": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_no_key_returns_fallback() {
    let (status, json) = send(post_json(json!({"goal": "Finish microeconomics assignment"}))).await;
    assert_eq!(status, StatusCode::OK);

    let tasks = json["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 7);
    assert_eq!(tasks[0]["id"], "t1");
    assert_eq!(
        tasks[0]["text"],
        "List 3 micro steps for Finish microeconomics assignment"
    );
    assert_eq!(tasks[0]["correctBucket"], "Current Goal");
    assert_eq!(tasks[6]["correctBucket"], "After Work");
    assert!(tasks[0].get("sortedBucket").is_none());
}

#[tokio::test]
async fn test_goal_from_query() {
    let req = Request::builder()
        .method("POST")
        .uri(format!("{}?goal=Clean%20garage", GENERATE_PATH))
        .body(Body::empty())
        .unwrap();

    let (status, json) = send(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tasks"][0]["text"], "List 3 micro steps for Clean garage");
}

#[tokio::test]
async fn test_health() {
    let req = Request::builder()
        .method("GET")
        .uri(HEALTH_PATH)
        .body(Body::empty())
        .unwrap();

    let (status, json) = send(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"status": "ok", "live": false}));
}
