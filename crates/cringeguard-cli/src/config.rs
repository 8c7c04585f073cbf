//! Binary configuration

use crate::cli::Cli;
use cringeguard_classifiers::ClassifierConfig;
use cringeguard_feed::FeedConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything the `cringeguard` binary reads from its YAML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote classifier settings
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Feed scanning and blur styling
    #[serde(default)]
    pub feed: FeedConfig,

    /// JSON file holding settings and stats
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
}

impl AppConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = Self::from_path(&cli.config)?;

        if let Some(storage) = &cli.storage {
            config.storage_path = storage.clone();
        }

        if let Some(endpoint) = &cli.endpoint {
            config.classifier.endpoint = endpoint.clone();
        }

        if let Some(model) = &cli.model {
            config.classifier.model = model.clone();
        }

        Ok(config)
    }

    /// Read `path` if it exists, defaults otherwise
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_yaml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            feed: FeedConfig::default(),
            storage_path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./cringeguard-storage.json")
}
