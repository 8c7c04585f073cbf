//! Cringe Guard Core
//!
//! Core types and the leaf pieces of the classification pipeline.
//!
//! This crate provides:
//! - Error types and result handling
//! - Shared types for chat messages, verdicts and usage stats
//! - Text sanitization applied before caching and classification
//! - A time-expiring response cache
//! - A rate-limit-only retry policy with exponential backoff
//! - A batch scheduler bounding concurrent classification calls

pub mod batch;
pub mod cache;
pub mod error;
pub mod retry;
pub mod sanitize;
pub mod types;

pub use batch::BatchScheduler;
pub use cache::ResponseCache;
pub use error::{Error, Result};
pub use retry::RetryPolicy;
pub use sanitize::sanitize;
pub use types::{ChatMessage, ClassificationResult, Stats};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::batch::BatchScheduler;
    pub use crate::cache::ResponseCache;
    pub use crate::error::{Error, Result};
    pub use crate::retry::RetryPolicy;
    pub use crate::sanitize::sanitize;
    pub use crate::types::{ChatMessage, ClassificationResult, Stats};
}
