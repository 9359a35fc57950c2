//! Task API client
//!
//! Front-end side of the generation endpoint. Requests are bounded by a
//! timeout and can be aborted through a `CancellationToken`. Returned items
//! are re-validated against the bucket set before they reach the game.

use std::time::Duration;

use focus_sdk::{BucketSet, EngineError, FocusErrorExt, Task};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::generation::{fallback_tasks, parse::filter_items, TaskSource};
use crate::llm::snippet;

/// Most tasks accepted from the endpoint
pub const MAX_TASKS: usize = 8;

/// Tasks for a goal plus an optional notice for the user.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub tasks: Vec<Task>,
    pub source: TaskSource,
    /// Transient message shown when the fallback list was used
    pub notice: Option<String>,
}

/// Client for `POST /api/generate-tasks`.
pub struct TaskApiClient {
    endpoint: String,
    timeout: Duration,
    buckets: BucketSet,
    client: reqwest::Client,
}

impl TaskApiClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration, buckets: BucketSet) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
            buckets,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.client.endpoint.clone(),
            Duration::from_secs(config.client.timeout_secs),
            config.buckets.bucket_set(),
        )
    }

    /// Request tasks for `goal`.
    ///
    /// # Errors
    ///
    /// * `EngineError::MissingGoal` - blank goal, nothing is sent
    /// * `EngineError::Http` - non-success status, with the response body
    /// * `EngineError::Network` / `EngineError::Parse` - transport or body failures
    /// * `EngineError::NoTasks` - nothing valid in the response
    /// * `EngineError::Timeout` / `EngineError::Cancelled`
    pub async fn fetch_tasks(
        &self,
        goal: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Task>, EngineError> {
        let goal = goal.trim();
        if goal.is_empty() {
            return Err(EngineError::MissingGoal);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Task request cancelled");
                Err(EngineError::Cancelled)
            }
            result = tokio::time::timeout(self.timeout, self.request(goal)) => {
                result.map_err(|_| EngineError::Timeout(self.timeout.as_secs()))?
            }
        }
    }

    async fn request(&self, goal: &str) -> Result<Vec<Task>, EngineError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "goal": goal }))
            .send()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(EngineError::Http {
                status: status.as_u16(),
                detail: snippet(&detail),
            });
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| EngineError::Parse(e.to_string()))?;

        let items = data
            .get("tasks")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let tasks = filter_items(items, &self.buckets, MAX_TASKS);
        if tasks.is_empty() {
            return Err(EngineError::NoTasks);
        }
        Ok(tasks)
    }

    /// Request tasks, substituting the fallback list on any failure.
    pub async fn fetch_or_fallback(&self, goal: &str, cancel: &CancellationToken) -> FetchOutcome {
        match self.fetch_tasks(goal, cancel).await {
            Ok(tasks) => FetchOutcome {
                tasks,
                source: TaskSource::Live,
                notice: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, endpoint = %self.endpoint, "Task request failed, using fallback");
                FetchOutcome {
                    tasks: fallback_tasks(goal.trim(), &self.buckets),
                    source: TaskSource::Fallback,
                    notice: Some(e.user_hint().to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TaskApiClient {
        TaskApiClient::new(
            "http://127.0.0.1:9/api/generate-tasks",
            Duration::from_secs(1),
            BucketSet::current(),
        )
    }

    #[tokio::test]
    async fn test_blank_goal_rejected_without_request() {
        let err = client()
            .fetch_tasks("   ", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingGoal));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = client().fetch_tasks("Essay", &cancel).await.unwrap_err();
        assert!(matches!(err, EngineError::Cancelled));
    }

    #[tokio::test]
    async fn test_fallback_carries_notice() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = client().fetch_or_fallback("Essay", &cancel).await;
        assert_eq!(outcome.source, TaskSource::Fallback);
        assert_eq!(outcome.tasks.len(), 7);
        assert_eq!(outcome.notice.as_deref(), Some("Request cancelled"));
    }
}
