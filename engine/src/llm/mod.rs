//! LLM Provider Abstraction Layer
//!
//! This module provides a common interface for chat-completion providers.
//! The task generator only needs a single text completion per request, so the
//! `LLMProvider` trait is kept to that: messages in, reply text out.
//!
//! It also hosts the helpers that pull a JSON object out of free-form model
//! output (fenced or embedded in prose).

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

pub mod openai;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Maximum number of characters of an upstream body kept in an error
pub const BODY_SNIPPET_CHARS: usize = 200;

/// Errors that can occur during LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("No tasks returned")]
    NoTasks,
}

impl LLMError {
    /// Build an HTTP error, keeping only a short snippet of the body.
    pub fn http(status: u16, body: &str) -> Self {
        LLMError::Http {
            status,
            body: snippet(body),
        }
    }
}

/// First [`BODY_SNIPPET_CHARS`] characters of `body`, trimmed.
pub fn snippet(body: &str) -> String {
    body.trim().chars().take(BODY_SNIPPET_CHARS).collect()
}

/// Message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,

    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::System => write!(f, "system"),
        }
    }
}

/// Sampling parameters for a completion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    /// Sampling temperature
    pub temperature: f64,

    /// Maximum output tokens
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            max_tokens: 700,
        }
    }
}

/// LLM Provider trait that all providers must implement
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Returns the name of the provider (e.g., "groq")
    fn name(&self) -> &str;

    /// Returns the model the provider sends requests to
    fn model(&self) -> &str;

    /// Send the conversation and return the first choice's text.
    ///
    /// # Returns
    /// * `Ok(String)` - Reply content; non-string content is re-serialized as JSON
    /// * `Err(LLMError)` - Transport failure, non-success status or malformed body
    async fn complete(&self, messages: &[Message], options: CompletionOptions) -> Result<String>;
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?is)```(?:json)?\s*(.*?)\s*```").expect("fence pattern is valid")
    })
}

/// Extract the JSON object from a model reply.
///
/// Handles:
/// 1. A markdown code fence (language tag optional) anywhere in the text
/// 2. JSON embedded in prose: the span from the first `{` to the last `}`
///
/// Falls back to the input unchanged so the JSON parser reports the error.
pub fn extract_json_object(text: &str) -> &str {
    if let Some(body) = fence_regex()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|body| !body.is_empty())
    {
        return body;
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text,
    }
}
