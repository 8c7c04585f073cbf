//! Cringe Guard Classifiers
//!
//! Classification of feed posts by a remote language model.
//!
//! The [`CringeClassifier`] sanitizes post text, serves repeated posts from
//! an expiring cache, retries rate-limited requests with exponential backoff
//! and parses the model's `"true: reason, reason"` answer into a
//! [`ClassificationResult`](cringeguard_core::ClassificationResult).

pub mod classifier;
pub mod config;
pub mod prompt;
pub mod remote;
pub mod verdict;

pub use classifier::Classifier;
pub use config::{ClassifierConfig, DEFAULT_CRITERIA};
pub use prompt::system_prompt;
pub use remote::CringeClassifier;
pub use verdict::parse_verdict;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::Classifier;
    pub use crate::config::ClassifierConfig;
    pub use crate::remote::CringeClassifier;
}
