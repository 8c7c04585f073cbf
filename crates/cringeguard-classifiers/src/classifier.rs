//! Classifier trait

use async_trait::async_trait;
use cringeguard_core::{ClassificationResult, Result};

/// Trait for anything that can judge a post
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the given raw post text
    async fn classify(&self, text: &str) -> Result<ClassificationResult>;

    /// Get the classifier name
    fn name(&self) -> &str;

    /// Drop expired cached verdicts, returning how many were removed
    fn purge_expired(&self) -> usize {
        0
    }
}
