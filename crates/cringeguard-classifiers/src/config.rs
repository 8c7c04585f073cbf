//! Configuration for the remote classifier

use cringeguard_core::{Error, Result, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Criteria the model is asked to check a post against
pub const DEFAULT_CRITERIA: &[&str] = &[
    "Selling a course with emotional unrelated story",
    "Overly emotional or clickbait stories with no tech-related content",
    "Using \"life lessons\" or motivational quotes without tech context",
    "Non-tech political or social commentary",
    "Purely personal posts without professional context",
    "Engagement bait (\"Comment interested\", \"Tag 3 people\")",
    "Generic advice without specific actionable items",
    "Brand promotional content / Ads",
    "Content likely written by AI/LLM",
    "Excessive self-promotion or bragging",
    "Inappropriate workplace behavior",
    "Forced or artificial inspiration",
    "Obvious humble bragging",
    "Inappropriate emotional display",
    "Misleading or out-of-context information",
];

/// Remote classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Chat completions endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier sent in the request body
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature, kept low for stable verdicts
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Total attempts per request when rate limited
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry (milliseconds)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// How long a verdict stays cached (seconds)
    #[serde(default = "default_cache_duration_secs")]
    pub cache_duration_secs: u64,

    /// Transport timeout for a single request (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Criteria listed in the system prompt
    #[serde(default = "default_criteria")]
    pub criteria: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            cache_duration_secs: default_cache_duration_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            criteria: default_criteria(),
        }
    }
}

impl ClassifierConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::config(e.to_string()))
    }

    /// Retry policy derived from `max_retries` and `retry_delay_ms`
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_delay_ms))
    }

    pub fn cache_duration(&self) -> Duration {
        Duration::from_secs(self.cache_duration_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_endpoint() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gemma2-9b-it".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_cache_duration_secs() -> u64 {
    60 * 60
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_criteria() -> Vec<String> {
    DEFAULT_CRITERIA.iter().map(|c| c.to_string()).collect()
}
