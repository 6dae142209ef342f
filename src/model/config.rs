use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml in the data directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Ask y/n before deleting a task
    #[serde(default = "default_true")]
    pub confirm_delete: bool,
    /// Theme overrides, keyed by theme slot name (e.g. "background" = "#000000")
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            confirm_delete: true,
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}
