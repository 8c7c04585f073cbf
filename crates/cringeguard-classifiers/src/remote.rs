//! Remote LLM classifier
//!
//! Sends sanitized post text to an OpenAI-compatible chat completions
//! endpoint and turns the answer into a verdict. Verdicts are cached by
//! sanitized text; only HTTP 429 answers are retried.

use crate::classifier::Classifier;
use crate::config::ClassifierConfig;
use crate::prompt::system_prompt;
use crate::verdict::parse_verdict;
use async_trait::async_trait;
use cringeguard_core::{
    sanitize, ChatMessage, ClassificationResult, Error, ResponseCache, Result, RetryPolicy,
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Prefix of every cache key
const CACHE_KEY_PREFIX: &str = "analysis_";

/// Classifies posts through a remote chat completions API
pub struct CringeClassifier {
    config: ClassifierConfig,
    api_key: Option<String>,
    system_prompt: String,
    http_client: reqwest::Client,
    retry: RetryPolicy,
    cache: ResponseCache<ClassificationResult>,
}

impl CringeClassifier {
    /// Create a classifier without a credential
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            system_prompt: system_prompt(&config.criteria),
            retry: config.retry_policy(),
            cache: ResponseCache::new(config.cache_duration()),
            api_key: None,
            http_client,
            config,
        })
    }

    /// Set the bearer credential
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Whether a non-empty credential is configured
    pub fn is_initialized(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Verdict cache, shared by every call on this instance
    pub fn cache(&self) -> &ResponseCache<ClassificationResult> {
        &self.cache
    }

    /// Classify raw post text, consulting the cache first
    pub async fn analyze(&self, content: &str) -> Result<ClassificationResult> {
        let api_key = match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => return Err(Error::NotInitialized),
        };

        let sanitized = sanitize(content);
        let cache_key = format!("{CACHE_KEY_PREFIX}{sanitized}");

        if let Some(cached) = self.cache.get(&cache_key) {
            debug!(chars = sanitized.len(), "verdict served from cache");
            metrics::counter!("cringeguard_cache_hits_total").increment(1);
            return Ok(cached);
        }
        debug!(chars = sanitized.len(), "cache miss, requesting verdict");

        let verdict = self
            .retry
            .run(|| self.request_verdict(api_key, &sanitized))
            .await
            .map_err(|e| {
                error!(error = %e, "error analyzing post content");
                metrics::counter!("cringeguard_errors_total", "kind" => e.kind()).increment(1);
                e
            })?;

        let analysis = parse_verdict(&verdict);
        debug!(
            is_cringe = analysis.is_cringe,
            reasons = analysis.reasons.len(),
            "post classified"
        );
        metrics::counter!(
            "cringeguard_classifications_total",
            "verdict" => if analysis.is_cringe { "cringe" } else { "clean" }
        )
        .increment(1);

        self.cache.set(cache_key, analysis.clone());
        Ok(analysis)
    }

    /// One POST to the endpoint, returning the first choice's message text
    async fn request_verdict(&self, api_key: &str, content: &str) -> Result<String> {
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage::system(self.system_prompt.as_str()),
                ChatMessage::user(content),
            ],
            temperature: self.config.temperature,
        };

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            metrics::counter!("cringeguard_rate_limited_total").increment(1);
            return Err(Error::RateLimited);
        }
        if !status.is_success() {
            return Err(Error::Remote {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::network(e.to_string()))?;
        let completion: ChatCompletionResponse =
            serde_json::from_slice(&bytes).map_err(|e| Error::malformed(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::malformed("response has no choices"))
    }
}

#[async_trait]
impl Classifier for CringeClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        self.analyze(text).await
    }

    fn name(&self) -> &str {
        "cringe"
    }

    fn purge_expired(&self) -> usize {
        self.cache.purge_expired()
    }
}

// =============================================================================
// Chat Completions Wire Structures
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}
