//! Core `Config` struct and its `Default` impl.

use crate::types::{KeyBinding, LogLevel};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User configuration, stored as YAML at `~/.config/tabtree/config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Location of the JSON tab store. `None` uses `<config dir>/tabs.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,

    /// Verbosity of the debug log file
    #[serde(default = "crate::defaults::log_level")]
    pub log_level: LogLevel,

    /// Debounce window for store file change notifications, in milliseconds
    #[serde(default = "crate::defaults::watch_debounce_ms")]
    pub watch_debounce_ms: u64,

    /// Select a tab opened from this view once storage echoes it back
    #[serde(default = "crate::defaults::bool_false")]
    pub select_new_tabs: bool,

    /// Keyboard shortcuts
    #[serde(default = "crate::defaults::keybindings")]
    pub keybindings: Vec<KeyBinding>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: None,
            log_level: crate::defaults::log_level(),
            watch_debounce_ms: crate::defaults::watch_debounce_ms(),
            select_new_tabs: crate::defaults::bool_false(),
            keybindings: crate::defaults::keybindings(),
        }
    }
}
