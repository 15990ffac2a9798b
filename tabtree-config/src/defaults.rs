//! Default value functions for configuration.
//!
//! Used as `#[serde(default = "crate::defaults::...")]` attributes on `Config` fields.

use crate::types::{KeyBinding, LogLevel};

// ── Primitive helpers ──────────────────────────────────────────────────────

pub fn bool_false() -> bool {
    false
}

// ── Store ──────────────────────────────────────────────────────────────────

/// File name of the JSON tab store inside the config directory.
pub const STORE_FILE_NAME: &str = "tabs.json";

pub fn watch_debounce_ms() -> u64 {
    100
}

pub fn log_level() -> LogLevel {
    LogLevel::Off
}

// ── Keybindings ────────────────────────────────────────────────────────────

pub fn keybindings() -> Vec<KeyBinding> {
    vec![
        KeyBinding::new("Ctrl+T", "new_tab"),
        KeyBinding::new("Ctrl+Shift+T", "open_root_tab"),
        KeyBinding::new("Ctrl+W", "close_tab"),
        KeyBinding::new("Ctrl+Q", "clear_all"),
        KeyBinding::new("Ctrl+L", "focus_address_bar"),
        KeyBinding::new("Space", "toggle_expanded"),
        KeyBinding::new("Down", "select_next"),
        KeyBinding::new("Up", "select_prev"),
    ]
}
