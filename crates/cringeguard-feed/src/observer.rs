//! Feed observation
//!
//! Finds post elements in a feed document, then keeps consuming a stream of
//! inserted nodes and scans each one with the same selector. Every discovered
//! post goes through the batch scheduler with classification, presentation
//! and stats as the per-item processor.

use crate::config::FeedConfig;
use crate::presentation::Presenter;
use crate::settings::Settings;
use crate::stats::StatsTracker;
use cringeguard_classifiers::Classifier;
use cringeguard_core::{sanitize, BatchScheduler, Error, Result};
use futures::{Stream, StreamExt};
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Attributes that identify a post, checked on the element and its ancestors
const KEY_ATTRIBUTES: &[&str] = &["data-urn", "id"];

/// Prefix of keys derived from post content
const CONTENT_KEY_PREFIX: &str = "post:";

/// A post found in the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPost {
    /// Stable identity of the post element
    pub key: String,

    /// Trimmed text content
    pub text: String,
}

/// An element subtree added to the feed after the initial scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertedNode {
    pub html: String,
}

impl From<String> for InsertedNode {
    fn from(html: String) -> Self {
        Self { html }
    }
}

impl From<&str> for InsertedNode {
    fn from(html: &str) -> Self {
        Self {
            html: html.to_string(),
        }
    }
}

/// What happened to one post
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    /// No text to classify
    Skipped,
    /// Classified as fine; left untouched
    Clean,
    /// Hidden, with the model's reasons
    Flagged(Vec<String>),
    /// Classification failed; left untouched
    Failed(String),
}

/// Totals for one or more scan passes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub discovered: usize,
    pub flagged: usize,
    pub clean: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ScanReport {
    fn record(&mut self, outcome: &PostOutcome) {
        self.discovered += 1;
        match outcome {
            PostOutcome::Skipped => self.skipped += 1,
            PostOutcome::Clean => self.clean += 1,
            PostOutcome::Flagged(_) => self.flagged += 1,
            PostOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Add another report's totals to this one
    pub fn merge(&mut self, other: &ScanReport) {
        self.discovered += other.discovered;
        self.flagged += other.flagged;
        self.clean += other.clean;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Whether the observer should run, decided from stored settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Startup {
    /// The user switched scanning off
    Disabled,
    /// No credential has been saved
    MissingApiKey,
    /// Scanning can start with this credential
    Ready { api_key: String },
}

impl Startup {
    pub fn check(settings: &Settings) -> Self {
        if !settings.enabled {
            info!("Cringe Guard is disabled");
            return Self::Disabled;
        }
        match &settings.api_key {
            Some(api_key) => Self::Ready {
                api_key: api_key.clone(),
            },
            None => {
                warn!("{}", Error::NotInitialized);
                Self::MissingApiKey
            }
        }
    }
}

/// Drives discovered posts through classification and presentation
pub struct FeedObserver {
    classifier: Arc<dyn Classifier>,
    presenter: Arc<dyn Presenter>,
    stats: Arc<StatsTracker>,
    scheduler: BatchScheduler,
    selector: Selector,
}

impl FeedObserver {
    pub fn new(
        config: &FeedConfig,
        classifier: Arc<dyn Classifier>,
        presenter: Arc<dyn Presenter>,
        stats: Arc<StatsTracker>,
    ) -> Result<Self> {
        let selector = Selector::parse(&config.post_selector).map_err(|e| {
            Error::config(format!("invalid post selector {:?}: {e:?}", config.post_selector))
        })?;

        Ok(Self {
            classifier,
            presenter,
            stats,
            scheduler: BatchScheduler::new(config.batch_size),
            selector,
        })
    }

    /// Posts matching the selector in a full document
    pub fn discover_document(&self, html: &str) -> Vec<FeedPost> {
        self.collect_posts(&Html::parse_document(html))
    }

    /// Posts matching the selector in an inserted subtree
    pub fn discover_fragment(&self, html: &str) -> Vec<FeedPost> {
        self.collect_posts(&Html::parse_fragment(html))
    }

    fn collect_posts(&self, html: &Html) -> Vec<FeedPost> {
        html.select(&self.selector)
            .map(|element| {
                let text = element.text().collect::<String>().trim().to_string();
                FeedPost {
                    key: post_key(element, &text),
                    text,
                }
            })
            .collect()
    }

    /// Scan a whole feed document
    pub async fn process_existing(&self, document: &str) -> ScanReport {
        let posts = self.discover_document(document);
        info!(posts = posts.len(), "scanning existing posts");
        self.scan(posts).await
    }

    /// Consume inserted nodes until the stream ends, scanning each one
    pub async fn observe<S>(&self, nodes: S) -> ScanReport
    where
        S: Stream<Item = InsertedNode>,
    {
        let mut total = ScanReport::default();
        let mut nodes = std::pin::pin!(nodes);

        while let Some(node) = nodes.next().await {
            let posts = self.discover_fragment(&node.html);
            if posts.is_empty() {
                continue;
            }
            debug!(posts = posts.len(), "new posts inserted");
            total.merge(&self.scan(posts).await);
        }

        total
    }

    /// Classify and present `posts`, batch by batch
    pub async fn scan(&self, posts: Vec<FeedPost>) -> ScanReport {
        let outcomes = self
            .scheduler
            .process(posts, |post| self.process_post(post))
            .await;

        let mut report = ScanReport::default();
        for outcome in &outcomes {
            report.record(outcome);
        }

        let purged = self.classifier.purge_expired();
        if purged > 0 {
            debug!(purged, "expired verdicts purged");
        }

        info!(
            discovered = report.discovered,
            flagged = report.flagged,
            failed = report.failed,
            "scan complete"
        );
        report
    }

    /// Per-item processor. Failures are logged here and never propagate to
    /// sibling posts; a failed post is left as it was.
    pub async fn process_post(&self, post: FeedPost) -> PostOutcome {
        if post.text.is_empty() {
            return PostOutcome::Skipped;
        }

        let analysis = match self.classifier.classify(&post.text).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(post = %post.key, error = %e, "error processing post");
                return PostOutcome::Failed(e.to_string());
            }
        };

        if !analysis.is_cringe {
            return PostOutcome::Clean;
        }

        if self.presenter.blur(&post, &analysis.reasons) {
            if let Err(e) = self.stats.record(&post.text).await {
                warn!(post = %post.key, error = %e, "error updating stats");
            }
        }

        PostOutcome::Flagged(analysis.reasons)
    }
}

/// Identity of a post: the nearest `data-urn` or `id` attribute, else a
/// fingerprint of its sanitized text, so rediscovering a post yields the same key
fn post_key(element: ElementRef<'_>, text: &str) -> String {
    std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .find_map(|el| {
            KEY_ATTRIBUTES
                .iter()
                .find_map(|attr| el.value().attr(attr))
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("{CONTENT_KEY_PREFIX}{}", sanitize(text)))
}
