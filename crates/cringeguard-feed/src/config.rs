//! Feed scanning and presentation configuration

use cringeguard_core::batch::DEFAULT_BATCH_SIZE;
use serde::{Deserialize, Serialize};

/// How the feed is scanned and flagged posts are shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// CSS selector matching post text elements
    #[serde(default = "default_post_selector")]
    pub post_selector: String,

    /// Posts classified concurrently per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Blur overlay styling
    #[serde(default)]
    pub blur: BlurStyle,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            post_selector: default_post_selector(),
            batch_size: default_batch_size(),
            blur: BlurStyle::default(),
        }
    }
}

/// Styling applied to a hidden post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlurStyle {
    /// CSS length passed to `filter: blur(..)`
    #[serde(default = "default_blur_amount")]
    pub blur_amount: String,

    /// CSS time for the reveal transition
    #[serde(default = "default_animation_duration")]
    pub animation_duration: String,
}

impl Default for BlurStyle {
    fn default() -> Self {
        Self {
            blur_amount: default_blur_amount(),
            animation_duration: default_animation_duration(),
        }
    }
}

fn default_post_selector() -> String {
    ".update-components-update-v2__commentary".to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_blur_amount() -> String {
    "10px".to_string()
}

fn default_animation_duration() -> String {
    "0.3s".to_string()
}
