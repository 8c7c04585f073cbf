//! Core types for Cringe Guard

use serde::{Deserialize, Serialize};

/// A chat message sent to the classification model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system or user)
    pub role: String,

    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }
}

/// Verdict for a single post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    /// Whether the post was flagged as cringe
    pub is_cringe: bool,

    /// Reasons given by the model, in the order it listed them
    pub reasons: Vec<String>,
}

impl ClassificationResult {
    /// A flagged verdict with the given reasons
    pub fn cringe<I, S>(reasons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            is_cringe: true,
            reasons: reasons.into_iter().map(Into::into).collect(),
        }
    }

    /// A clean verdict without reasons
    pub fn clean() -> Self {
        Self::default()
    }
}

/// Usage counters shown in the popup
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Number of posts hidden so far
    pub cringe_count: u64,

    /// Estimated reading time saved, in minutes
    pub time_saved_in_minutes: f64,
}

impl Stats {
    /// Popup rendering of the time saved, rounded up to whole minutes
    pub fn time_saved_label(&self) -> String {
        format!("{}m", self.time_saved_in_minutes.ceil() as u64)
    }
}
