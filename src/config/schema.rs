use crate::scoring::ScoringConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,

    #[serde(default)]
    pub store: Option<StoreConfig>,

    /// tracing filter used when neither RUST_LOG nor --verbose is set
    #[serde(default)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// JSON data file (defaults to ~/.config/kol-scout/data.json)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("warn")
    }

    pub fn data_path(&self) -> Option<PathBuf> {
        self.store.as_ref().and_then(|s| s.path.clone())
    }
}
