//! Cringe Guard feed integration
//!
//! Everything between a rendered feed and the classifier:
//! - Post discovery over the initial document and inserted nodes
//! - Blur overlays with reveal control and reasons tooltip
//! - Persisted settings and usage counters behind a key-value store

pub mod config;
pub mod observer;
pub mod presentation;
pub mod settings;
pub mod stats;
pub mod storage;

pub use config::{BlurStyle, FeedConfig};
pub use observer::{FeedObserver, FeedPost, InsertedNode, PostOutcome, ScanReport, Startup};
pub use presentation::{BlurOverlay, OverlayPresenter, Presenter};
pub use settings::Settings;
pub use stats::{estimate_time_saved, StatsTracker};
pub use storage::{storage_keys, JsonFileStore, KeyValueStore, MemoryStore};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::observer::{FeedObserver, FeedPost, InsertedNode, PostOutcome, ScanReport};
    pub use crate::presentation::{OverlayPresenter, Presenter};
    pub use crate::settings::Settings;
    pub use crate::stats::StatsTracker;
    pub use crate::storage::{JsonFileStore, KeyValueStore, MemoryStore};
}
