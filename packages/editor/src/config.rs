use dashgrid_layout::Settings;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "dashgrid.config.json";

/// Layout engine configuration file format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Sizing flags and per-breakpoint column counts
    #[serde(default)]
    pub settings: Settings,

    /// Maximum undo depth (0 = unlimited)
    #[serde(default = "default_undo_levels")]
    pub undo_levels: usize,

    /// Commands that may wait in the engine queue
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Dashboard identifier temporary widget ids are derived from
    #[serde(default = "default_id_seed")]
    pub id_seed: String,
}

fn default_undo_levels() -> usize {
    100
}

fn default_queue_capacity() -> usize {
    64
}

fn default_id_seed() -> String {
    "dashboard".to_string()
}

impl EngineConfig {
    /// Load config from a directory
    pub fn load(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: EngineConfig = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(EngineConfig::default())
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            undo_levels: default_undo_levels(),
            queue_capacity: default_queue_capacity(),
            id_seed: default_id_seed(),
        }
    }
}
