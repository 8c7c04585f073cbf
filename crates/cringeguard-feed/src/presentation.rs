//! Presentation of flagged posts
//!
//! A flagged post is covered by a blur overlay with a "Click to View" control
//! and a tooltip listing the reasons. Each post is handled at most once.

use crate::config::BlurStyle;
use crate::observer::FeedPost;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

/// Label of the control that reveals a hidden post
pub const VIEW_BUTTON_LABEL: &str = "Click to View";

/// Heading of the reasons tooltip
pub const TOOLTIP_TITLE: &str = "Why was this hidden?";

/// Receives verdicts for flagged posts
pub trait Presenter: Send + Sync {
    /// Obscure `post`. Returns `false` when the post was already handled.
    fn blur(&self, post: &FeedPost, reasons: &[String]) -> bool;
}

/// Overlay state for one hidden post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlurOverlay {
    pub post_key: String,
    pub reasons: Vec<String>,
    pub revealed: bool,
    pub style: BlurStyle,
}

impl BlurOverlay {
    /// Inline style of the wrapper around the post content
    pub fn wrapper_css(&self) -> String {
        let (filter, opacity) = if self.revealed {
            (String::new(), "1")
        } else {
            (format!("blur({})", self.style.blur_amount), "0.95")
        };
        format!(
            "filter: {filter}; transition: all {} ease; width: 100%; height: 100%; position: relative; opacity: {opacity};",
            self.style.animation_duration
        )
    }

    /// Tooltip text: the title followed by one bullet per reason
    pub fn tooltip(&self) -> String {
        render_tooltip(&self.reasons)
    }
}

pub fn render_tooltip(reasons: &[String]) -> String {
    let mut out = String::from(TOOLTIP_TITLE);
    for reason in reasons {
        out.push_str("\n  • ");
        out.push_str(reason);
    }
    out
}

/// Keeps an overlay per hidden post, in the order posts were hidden
#[derive(Debug, Default)]
pub struct OverlayPresenter {
    style: BlurStyle,
    inner: Mutex<OverlayState>,
}

#[derive(Debug, Default)]
struct OverlayState {
    order: Vec<String>,
    overlays: HashMap<String, BlurOverlay>,
}

impl OverlayPresenter {
    pub fn new(style: BlurStyle) -> Self {
        Self {
            style,
            inner: Mutex::new(OverlayState::default()),
        }
    }

    /// Whether `post_key` already has an overlay
    pub fn is_processed(&self, post_key: &str) -> bool {
        self.inner.lock().overlays.contains_key(post_key)
    }

    pub fn overlay(&self, post_key: &str) -> Option<BlurOverlay> {
        self.inner.lock().overlays.get(post_key).cloned()
    }

    /// Every overlay, oldest first
    pub fn overlays(&self) -> Vec<BlurOverlay> {
        let inner = self.inner.lock();
        inner
            .order
            .iter()
            .filter_map(|key| inner.overlays.get(key).cloned())
            .collect()
    }

    /// The "Click to View" action: lift the blur and hide the controls
    pub fn reveal(&self, post_key: &str) -> bool {
        match self.inner.lock().overlays.get_mut(post_key) {
            Some(overlay) if !overlay.revealed => {
                overlay.revealed = true;
                debug!(post = post_key, "post revealed");
                true
            }
            _ => false,
        }
    }
}

impl Presenter for OverlayPresenter {
    fn blur(&self, post: &FeedPost, reasons: &[String]) -> bool {
        let mut inner = self.inner.lock();
        if inner.overlays.contains_key(&post.key) {
            return false;
        }

        inner.order.push(post.key.clone());
        inner.overlays.insert(
            post.key.clone(),
            BlurOverlay {
                post_key: post.key.clone(),
                reasons: reasons.to_vec(),
                revealed: false,
                style: self.style.clone(),
            },
        );
        debug!(post = %post.key, reasons = reasons.len(), "post blurred");
        true
    }
}
