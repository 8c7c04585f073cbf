//! In-memory response cache with time-based expiry
//!
//! Entries are only evicted lazily when a lookup finds them stale, or when the
//! owner calls [`ResponseCache::purge_expired`]. There is no capacity bound.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Default time-to-live for cached verdicts
pub const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    timestamp: Instant,
}

/// Maps a content fingerprint to a previously computed value
#[derive(Debug)]
pub struct ResponseCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
}

impl<V: Clone> ResponseCache<V> {
    /// Create a cache whose entries live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the live value for `key`, deleting it if it has expired
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock();
        let expired = entries.get(key)?.timestamp.elapsed() > self.ttl;
        if expired {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Insert or overwrite `key` with a fresh timestamp
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.entries.lock().insert(
            key.into(),
            CacheEntry {
                value,
                timestamp: Instant::now(),
            },
        );
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.timestamp.elapsed() <= self.ttl);
        before - entries.len()
    }

    /// Number of stored entries, live or not yet evicted
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<V: Clone> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test(start_paused = true)]
    async fn test_round_trip_within_window() {
        let cache = ResponseCache::new(TTL);
        cache.set("analysis_hello", vec!["ad".to_string()]);

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get("analysis_hello"), Some(vec!["ad".to_string()]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_at_exact_ttl_is_still_live() {
        let cache = ResponseCache::new(TTL);
        cache.set("k", 1u32);

        tokio::time::advance(TTL).await;
        assert_eq!(cache.get("k"), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_evicted_on_lookup() {
        let cache = ResponseCache::new(TTL);
        cache.set("k", 1u32);

        tokio::time::advance(TTL + Duration::from_millis(1)).await;
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
        assert_eq!(cache.get("k"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_overwrites_with_fresh_timestamp() {
        let cache = ResponseCache::new(TTL);
        cache.set("k", 1u32);

        tokio::time::advance(Duration::from_secs(50)).await;
        cache.set("k", 2u32);

        tokio::time::advance(Duration::from_secs(50)).await;
        assert_eq!(cache.get("k"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired_keeps_live_entries() {
        let cache = ResponseCache::new(TTL);
        cache.set("old", 1u32);

        tokio::time::advance(Duration::from_secs(45)).await;
        cache.set("new", 2u32);

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("new"), Some(2));
    }

    #[test]
    fn test_default_ttl_is_one_hour() {
        let cache: ResponseCache<u32> = ResponseCache::default();
        assert_eq!(cache.ttl(), Duration::from_secs(3600));
    }
}
