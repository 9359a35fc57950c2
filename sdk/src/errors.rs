//! Error types and handling
//!
//! This module provides the error type shared by the engine and its front ends.
//! All errors implement the `FocusErrorExt` trait which provides user-friendly
//! hints and indicates whether errors are recoverable.
//!
//! # Security
//!
//! Error messages never carry the API key. Upstream response bodies are cut
//! down to a short snippet before they land in an error.

use thiserror::Error;

/// Trait for error extensions
///
/// Provides a hint that is safe to show in the UI (for example as a toast)
/// and whether the operation can simply be retried.
pub trait FocusErrorExt {
    /// Returns a user-friendly hint for the error
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    fn is_recoverable(&self) -> bool;
}

/// Main engine error type
///
/// # Error Categories
///
/// - **Configuration**: Invalid or missing configuration
/// - **Generation**: Upstream model failures and malformed output
/// - **Client**: Endpoint failures seen by the task API client
/// - **Storage**: Persisted settings and score history
///
/// # Examples
///
/// ```
/// use focus_sdk::errors::{EngineError, FocusErrorExt};
///
/// let error = EngineError::MissingGoal;
/// println!("Hint: {}", error.user_hint());
/// assert!(error.is_recoverable());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Input errors
    #[error("Missing goal")]
    MissingGoal,

    // Generation errors
    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("No tasks returned")]
    NoTasks,

    // Client errors
    #[error("API HTTP {status}: {detail}")]
    Http { status: u16, detail: String },

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Request cancelled")]
    Cancelled,

    // Network errors
    #[error("Network error: {0}")]
    Network(String),

    // Serialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FocusErrorExt for EngineError {
    fn user_hint(&self) -> &str {
        match self {
            Self::Config(_) => "Check your config.toml file for errors",
            Self::MissingGoal => "Type a goal before starting",
            Self::Generation(_) | Self::NoTasks | Self::Parse(_) => {
                "Couldn't generate tasks, using a starter set instead"
            }
            Self::Http { .. } | Self::Network(_) => {
                "Task service unavailable, using a starter set instead"
            }
            Self::Timeout(_) => "Task service took too long, using a starter set instead",
            Self::Cancelled => "Request cancelled",
            Self::Storage(_) => "Couldn't save your settings or scores",
            Self::Io(_) => "File system operation failed",
        }
    }

    fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}
