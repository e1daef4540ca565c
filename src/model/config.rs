use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from .tick/config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub notice: NoticeConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key holding the JSON task array
    #[serde(default = "default_key")]
    pub key: String,
    /// File backing the key-value store, relative to .tick/
    #[serde(default = "default_store_file")]
    pub file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            key: default_key(),
            file: default_store_file(),
        }
    }
}

fn default_key() -> String {
    "todos".to_string()
}

fn default_store_file() -> String {
    "store.json".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeConfig {
    /// How long a transient notice stays on screen
    #[serde(default = "default_notice_secs")]
    pub duration_secs: u64,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        NoticeConfig {
            duration_secs: default_notice_secs(),
        }
    }
}

fn default_notice_secs() -> u64 {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}
