//! Focus Sort Engine Library
//!
//! This library provides task generation, the sorting game and its
//! persisted state. It is used by both the main binary and integration tests.

/// Configuration management module
pub mod config;

/// Telemetry and Observability
pub mod telemetry;

/// Chat-completion provider abstraction layer
pub mod llm;

/// Goal to task list generation
pub mod generation;

/// Sorting game state and scoring
pub mod game;

/// Persisted scores and settings
pub mod store;

/// HTTP endpoint
pub mod api;

/// Client for the HTTP endpoint
pub mod client;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
