//! Error types for Cringe Guard

/// Result type alias using Cringe Guard's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Cringe Guard operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No API credential has been configured
    #[error("API key not found, set one in the extension settings")]
    NotInitialized,

    /// The classification endpoint answered with HTTP 429
    #[error("rate limit exceeded, try again later")]
    RateLimited,

    /// Any other non-2xx answer from the classification endpoint
    #[error("error analyzing post content: HTTP {status}")]
    Remote {
        /// HTTP status code returned by the endpoint
        status: u16,
    },

    /// Transport failure (DNS, connect, timeout, body read)
    #[error("network error: {0}")]
    Network(String),

    /// 2xx response whose body does not carry a verdict
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Persisted key-value store access failure
    #[error("error accessing storage: {0}")]
    Storage(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new malformed response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create a new storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this failure is the explicit rate-limit signal.
    ///
    /// This is the only condition the retry policy retries on.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }

    /// Short label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotInitialized => "not_initialized",
            Self::RateLimited => "rate_limited",
            Self::Remote { .. } => "remote",
            Self::Network(_) => "network",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
        }
    }
}
