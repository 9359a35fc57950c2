//! Task generation HTTP endpoint
//!
//! # Endpoints
//!
//! - POST /api/generate-tasks - `{goal}` body (or `?goal=`) to `{tasks}`
//! - GET /api/health - liveness and whether live generation is configured
//!
//! Generation never fails from the caller's point of view: upstream errors are
//! logged and answered with the fallback list.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use focus_sdk::Task;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::generation::TaskGenerator;

/// Path of the generation endpoint
pub const GENERATE_PATH: &str = "/api/generate-tasks";

/// Path of the health endpoint
pub const HEALTH_PATH: &str = "/api/health";

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<TaskGenerator>,
}

impl AppState {
    pub fn new(generator: TaskGenerator) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoalQuery {
    goal: Option<String>,
}

/// Successful generation response
#[derive(Debug, Serialize, Deserialize)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
}

/// Build the router with tracing and CORS layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(GENERATE_PATH, any(generate_tasks_handler))
        .route(HEALTH_PATH, get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Goal from a JSON body, falling back to the query string.
///
/// The body is read leniently: a missing, non-JSON or non-string `goal`
/// counts as absent.
fn extract_goal(body: &[u8], query: Option<GoalQuery>) -> Option<String> {
    let from_body = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("goal").and_then(Value::as_str).map(str::to_string))
        .filter(|g| !g.trim().is_empty());

    from_body.or_else(|| query.and_then(|q| q.goal))
}

async fn generate_tasks_handler(
    State(state): State<AppState>,
    method: Method,
    query: Option<Query<GoalQuery>>,
    body: Bytes,
) -> Response {
    if method != Method::POST {
        return error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    }

    let goal = extract_goal(&body, query.map(|Query(q)| q)).unwrap_or_default();
    let goal = goal.trim();
    if goal.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Missing goal");
    }

    let (tasks, source) = state.generator.generate_with_source(goal).await;
    tracing::info!(count = tasks.len(), source = ?source, "Generated tasks");

    (StatusCode::OK, Json(TasksResponse { tasks })).into_response()
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "live": state.generator.is_live(),
    }))
}

/// Bind and serve until ctrl-c.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let generator = TaskGenerator::from_config(config);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    serve_with_listener(listener, AppState::new(generator), shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve_with_listener<F>(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = listener.local_addr()?;
    tracing::info!(live = state.generator.is_live(), "Task endpoint listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            shutdown.await;
            tracing::info!("Task endpoint shutting down gracefully");
        })
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(goal: &str) -> Option<GoalQuery> {
        Some(GoalQuery {
            goal: Some(goal.to_string()),
        })
    }

    #[test]
    fn test_goal_from_body() {
        let goal = extract_goal(br#"{"goal":"Finish essay"}"#, None);
        assert_eq!(goal.as_deref(), Some("Finish essay"));
    }

    #[test]
    fn test_body_wins_over_query() {
        let goal = extract_goal(br#"{"goal":"Body goal"}"#, query("Query goal"));
        assert_eq!(goal.as_deref(), Some("Body goal"));
    }

    #[test]
    fn test_query_used_when_body_unusable() {
        assert_eq!(extract_goal(b"", query("Q")).as_deref(), Some("Q"));
        assert_eq!(extract_goal(b"not json", query("Q")).as_deref(), Some("Q"));
        assert_eq!(extract_goal(br#"{"goal":42}"#, query("Q")).as_deref(), Some("Q"));
        assert_eq!(extract_goal(br#"{"goal":"  "}"#, query("Q")).as_deref(), Some("Q"));
    }

    #[test]
    fn test_missing_everywhere() {
        assert_eq!(extract_goal(b"{}", None), None);
    }
}
