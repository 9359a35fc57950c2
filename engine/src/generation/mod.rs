//! Task generation
//!
//! `TaskGenerator` turns a goal into a 6-8 item task list. With a provider
//! configured it asks the model, parses the reply and (optionally) rebalances
//! the buckets. Any failure, or no provider at all, yields the fallback list.

use std::sync::Arc;

use focus_sdk::{BucketSet, Task};

use crate::config::{Config, GenerationConfig};
use crate::llm::openai::OpenAIProvider;
use crate::llm::{CompletionOptions, LLMError, LLMProvider};

pub mod fallback;
pub mod heuristic;
pub mod parse;
pub mod prompt;
pub mod rebalance;
pub mod suggestions;

pub use fallback::fallback_tasks;
pub use parse::parse_tasks;
pub use prompt::{build_messages, build_system_prompt, build_user_prompt};
pub use rebalance::rebalance;

/// Where a task list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSource {
    /// Parsed from the model reply
    Live,
    /// The fixed starter list
    Fallback,
}

impl TaskSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskSource::Live => "live",
            TaskSource::Fallback => "fallback",
        }
    }
}

/// Generates task lists for goals.
pub struct TaskGenerator {
    provider: Option<Arc<dyn LLMProvider>>,
    buckets: BucketSet,
    options: CompletionOptions,
    generation: GenerationConfig,
}

impl TaskGenerator {
    pub fn new(
        provider: Option<Arc<dyn LLMProvider>>,
        buckets: BucketSet,
        options: CompletionOptions,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            provider,
            buckets,
            options,
            generation,
        }
    }

    /// Build a generator from config; live generation only with an API key.
    pub fn from_config(config: &Config) -> Self {
        let provider = OpenAIProvider::from_config(&config.llm)
            .map(|p| Arc::new(p) as Arc<dyn LLMProvider>);

        if provider.is_none() {
            tracing::info!("No API key configured, serving fallback tasks");
        }

        Self::new(
            provider,
            config.buckets.bucket_set(),
            CompletionOptions {
                temperature: config.llm.temperature,
                max_tokens: config.llm.max_tokens,
            },
            config.generation.clone(),
        )
    }

    /// Generator that never calls out.
    pub fn offline(buckets: BucketSet, generation: GenerationConfig) -> Self {
        Self::new(None, buckets, CompletionOptions::default(), generation)
    }

    /// Whether a provider is configured.
    pub fn is_live(&self) -> bool {
        self.provider.is_some()
    }

    /// Generate tasks; never fails.
    pub async fn generate(&self, goal: &str) -> Vec<Task> {
        self.generate_with_source(goal).await.0
    }

    /// Generate tasks and report whether the fallback was used.
    pub async fn generate_with_source(&self, goal: &str) -> (Vec<Task>, TaskSource) {
        let goal = goal.trim();
        if goal.is_empty() || self.provider.is_none() {
            return (fallback_tasks(goal, &self.buckets), TaskSource::Fallback);
        }

        match self.try_generate(goal).await {
            Ok(tasks) => (tasks, TaskSource::Live),
            Err(e) => {
                tracing::warn!(error = %e, "Task generation failed, using fallback");
                (fallback_tasks(goal, &self.buckets), TaskSource::Fallback)
            }
        }
    }

    /// Generate tasks from the model, surfacing errors.
    ///
    /// # Errors
    ///
    /// * `LLMError::MissingApiKey` - no provider configured
    /// * provider errors (HTTP status, network, timeout)
    /// * `LLMError::ParseError` / `LLMError::NoTasks` - unusable reply, or
    ///   fewer than `min_tasks` items survived post-processing
    pub async fn try_generate(&self, goal: &str) -> Result<Vec<Task>, LLMError> {
        let provider = self.provider.as_ref().ok_or(LLMError::MissingApiKey)?;
        let goal = goal.trim();

        let messages = build_messages(goal, &self.buckets);
        let reply = provider.complete(&messages, self.options).await?;
        tracing::debug!(provider = provider.name(), chars = reply.len(), "Received model reply");

        let mut tasks = parse_tasks(&reply, &self.buckets, self.generation.max_tasks)?;

        if self.generation.rebalance {
            tasks = rebalance(tasks, goal, &self.buckets, &self.generation);
        }

        if tasks.len() < self.generation.min_tasks {
            tracing::debug!(count = tasks.len(), "Too few tasks after post-processing");
            return Err(LLMError::NoTasks);
        }

        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Message;
    use async_trait::async_trait;

    /// Replies with the canned text, or fails with HTTP 503 when there is none.
    struct CannedProvider(Option<String>);

    #[async_trait]
    impl LLMProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        fn model(&self) -> &str {
            "canned-model"
        }

        async fn complete(
            &self,
            _messages: &[Message],
            _options: CompletionOptions,
        ) -> crate::llm::Result<String> {
            self.0
                .clone()
                .ok_or_else(|| LLMError::http(503, "unavailable"))
        }
    }

    fn generator(reply: Option<&str>, rebalance: bool) -> TaskGenerator {
        TaskGenerator::new(
            Some(Arc::new(CannedProvider(reply.map(str::to_string)))),
            BucketSet::current(),
            CompletionOptions::default(),
            GenerationConfig {
                rebalance,
                ..GenerationConfig::default()
            },
        )
    }

    const BALANCED: &str = r#"Here are your tasks:
```json
{"tasks":[
 {"text":"Write the opening sentence","correctBucket":"Current Goal"},
 {"text":"List 3 main points","correctBucket":"Current Goal"},
 {"text":"Schedule research time","correctBucket":"Next Task"},
 {"text":"Gather 3 articles","correctBucket":"Next Task"},
 {"text":"Check TikTok","correctBucket":"After Work"},
 {"text":"Sort old photos","correctBucket":"After Work"}
]}
```"#;

    #[tokio::test]
    async fn test_offline_uses_fallback() {
        let generator = TaskGenerator::offline(BucketSet::current(), GenerationConfig::default());
        let (tasks, source) = generator.generate_with_source("Finish essay").await;
        assert_eq!(source, TaskSource::Fallback);
        assert_eq!(tasks.len(), 7);
        assert!(!generator.is_live());
    }

    #[tokio::test]
    async fn test_live_reply_is_used() {
        let generator = generator(Some(BALANCED), true);
        let (tasks, source) = generator.generate_with_source("Finish essay").await;
        assert_eq!(source, TaskSource::Live);
        assert_eq!(tasks.len(), 7);
        assert_eq!(tasks[0].text, "Write the opening sentence");
        assert_eq!(tasks[1].text, "Schedule research time");
    }

    #[tokio::test]
    async fn test_malformed_reply_falls_back() {
        let generator = generator(Some("Sorry, no can do"), true);
        let tasks = generator.generate("Finish essay").await;
        assert_eq!(tasks, fallback_tasks("Finish essay", &BucketSet::current()));
    }

    #[tokio::test]
    async fn test_provider_error_falls_back() {
        let generator = generator(None, true);
        let (tasks, source) = generator.generate_with_source("Finish essay").await;
        assert_eq!(source, TaskSource::Fallback);
        assert_eq!(tasks.len(), 7);
    }

    #[tokio::test]
    async fn test_short_list_without_rebalance_is_rejected() {
        let reply = r#"{"tasks":[{"text":"Write title","correctBucket":"Current Goal"}]}"#;
        let generator = generator(Some(reply), false);
        let err = generator.try_generate("Finish essay").await.unwrap_err();
        assert!(matches!(err, LLMError::NoTasks));
    }

    #[tokio::test]
    async fn test_short_list_with_rebalance_is_topped_up() {
        let reply = r#"{"tasks":[{"text":"Write title","correctBucket":"Current Goal"}]}"#;
        let generator = generator(Some(reply), true);
        let tasks = generator.try_generate("Finish essay").await.unwrap();
        assert!((6..=8).contains(&tasks.len()));
    }
}
