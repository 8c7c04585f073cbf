//! User settings read from the persisted store
//!
//! Covers what the popup toggles and the settings page edits: the API
//! credential, the enabled switch and an optional custom criteria list.

use crate::storage::{storage_keys, KeyValueStore};
use cringeguard_core::{Result, Stats};
use serde_json::{Map, Value};
use tracing::info;

/// Snapshot of every stored setting, with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// API credential, if one was saved
    pub api_key: Option<String>,

    /// Whether feed scanning is switched on
    pub enabled: bool,

    /// Usage counters
    pub stats: Stats,

    /// Criteria saved by the user. Stored only; the classifier uses its own
    /// configured list.
    pub custom_criteria: Option<Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            enabled: true,
            stats: Stats::default(),
            custom_criteria: None,
        }
    }
}

impl Settings {
    /// Read every key in one bulk call
    pub async fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let data = store.get(storage_keys::ALL).await?;
        Ok(Self::from_map(&data))
    }

    /// Apply defaults for missing or mistyped values
    pub fn from_map(data: &Map<String, Value>) -> Self {
        let api_key = data
            .get(storage_keys::API_KEY)
            .and_then(Value::as_str)
            .filter(|key| !key.is_empty())
            .map(str::to_string);

        let custom_criteria = data
            .get(storage_keys::CUSTOM_CRITERIA)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            });

        Self {
            api_key,
            enabled: data
                .get(storage_keys::IS_ENABLED)
                .and_then(Value::as_bool)
                .unwrap_or(true),
            stats: stats_from_map(data),
            custom_criteria,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

pub(crate) fn stats_from_map(data: &Map<String, Value>) -> Stats {
    Stats {
        cringe_count: data
            .get(storage_keys::CRINGE_COUNT)
            .and_then(Value::as_u64)
            .unwrap_or(0),
        time_saved_in_minutes: data
            .get(storage_keys::TIME_SAVED)
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
    }
}

/// Save a trimmed API key. Blank input is ignored and returns `false`.
pub async fn save_api_key(store: &dyn KeyValueStore, api_key: &str) -> Result<bool> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Ok(false);
    }

    let mut items = Map::new();
    items.insert(storage_keys::API_KEY.to_string(), Value::from(api_key));
    store.set(items).await?;
    info!("API key saved");
    Ok(true)
}

/// Delete the stored API key
pub async fn clear_api_key(store: &dyn KeyValueStore) -> Result<()> {
    store.remove(&[storage_keys::API_KEY]).await?;
    info!("API key deleted");
    Ok(())
}

/// Flip the enabled switch
pub async fn set_enabled(store: &dyn KeyValueStore, enabled: bool) -> Result<()> {
    let mut items = Map::new();
    items.insert(storage_keys::IS_ENABLED.to_string(), Value::from(enabled));
    store.set(items).await?;
    info!(enabled, "extension state saved");
    Ok(())
}
