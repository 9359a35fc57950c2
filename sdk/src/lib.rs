//! Focus Sort SDK
//!
//! Shared library providing the task data model and error types.
//! This crate is used by the engine and by anything that talks to its endpoint.

/// Error types and handling
pub mod errors;

/// Task and bucket types
pub mod types;

// Re-export commonly used types
pub use errors::{EngineError, FocusErrorExt};
pub use types::{renumber, task_id, Bucket, BucketSet, Slot, Task};
