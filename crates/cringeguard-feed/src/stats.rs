//! Usage counters: posts hidden and reading time saved

use crate::settings::stats_from_map;
use crate::storage::{storage_keys, KeyValueStore};
use cringeguard_core::{Result, Stats};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Estimated seconds of reading saved by hiding a post
pub fn estimate_time_saved(post_text: &str) -> u32 {
    match post_text.split_whitespace().count() {
        0..=20 => 5,
        21..=50 => 10,
        _ => 20,
    }
}

/// Reads and bumps the persisted counters
pub struct StatsTracker {
    store: Arc<dyn KeyValueStore>,
    update_lock: Mutex<()>,
}

impl StatsTracker {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            update_lock: Mutex::new(()),
        }
    }

    /// Current counters
    pub async fn load(&self) -> Result<Stats> {
        let data = self
            .store
            .get(&[storage_keys::CRINGE_COUNT, storage_keys::TIME_SAVED])
            .await?;
        Ok(stats_from_map(&data))
    }

    /// Count one hidden post and add its estimated reading time.
    ///
    /// The read-modify-write is serialised per tracker, so concurrent posts
    /// in one batch cannot lose increments.
    pub async fn record(&self, post_text: &str) -> Result<Stats> {
        let _guard = self.update_lock.lock().await;

        let current = self.load().await?;
        let updated = Stats {
            cringe_count: current.cringe_count + 1,
            time_saved_in_minutes: current.time_saved_in_minutes
                + f64::from(estimate_time_saved(post_text)) / 60.0,
        };

        let mut items = Map::new();
        items.insert(
            storage_keys::CRINGE_COUNT.to_string(),
            Value::from(updated.cringe_count),
        );
        items.insert(
            storage_keys::TIME_SAVED.to_string(),
            Value::from(updated.time_saved_in_minutes),
        );
        self.store.set(items).await?;

        debug!(
            cringe_count = updated.cringe_count,
            minutes = updated.time_saved_in_minutes,
            "stats updated"
        );
        Ok(updated)
    }
}
