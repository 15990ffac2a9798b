//! Keybinding system for tabtree.
//!
//! This crate provides runtime-configurable keybindings that allow users
//! to define keyboard shortcuts for tab operations in their config.yaml.
//!
//! Features:
//! - Configurable key combinations (Ctrl+Shift+T, CmdOrCtrl+W, etc.)
//! - A closed set of [`KeyAction`]s, so dispatch is an exhaustive match

mod action;
mod matcher;
pub mod parser;
mod platform;

pub use action::KeyAction;
pub use matcher::{KeyInput, KeybindingMatcher};
pub use parser::{Key, KeyCombo, Modifiers, NamedKey, ParseError, parse_key_combo};

use std::collections::HashMap;
use tabtree_config::KeyBinding;

/// Registry of keybindings mapping key combinations to actions.
#[derive(Debug, Default)]
pub struct KeybindingRegistry {
    /// Map of parsed key combos to actions
    bindings: HashMap<KeyCombo, KeyAction>,
}

impl KeybindingRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from config keybindings.
    ///
    /// Invalid key strings and unknown action names are logged and skipped.
    pub fn from_config(keybindings: &[KeyBinding]) -> Self {
        let mut registry = Self::new();

        log::info!(
            "Building keybinding registry from {} config keybindings",
            keybindings.len()
        );
        for binding in keybindings {
            let action = match binding.action.parse::<KeyAction>() {
                Ok(action) => action,
                Err(e) => {
                    log::warn!("Skipping keybinding '{}': {}", binding.key, e);
                    continue;
                }
            };
            match parse_key_combo(&binding.key) {
                Ok(combo) => {
                    log::debug!(
                        "Registered keybinding: {} -> {} (parsed as: {:?})",
                        binding.key,
                        action,
                        combo
                    );
                    if let Some(previous) = registry.bindings.insert(combo, action) {
                        log::warn!(
                            "Keybinding {} rebound from {} to {}",
                            combo,
                            previous,
                            action
                        );
                    }
                }
                Err(e) => {
                    log::warn!(
                        "Invalid keybinding '{}' for action '{}': {}",
                        binding.key,
                        binding.action,
                        e
                    );
                }
            }
        }

        log::info!(
            "Keybinding registry initialized with {} bindings",
            registry.bindings.len()
        );
        registry
    }

    /// Look up the action bound to a key press.
    pub fn lookup(&self, input: &KeyInput) -> Option<KeyAction> {
        let matcher = KeybindingMatcher::from_input(input);
        self.bindings
            .iter()
            .find(|(combo, _)| matcher.matches(combo))
            .map(|(_, action)| *action)
    }

    /// Check if the registry has any bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Get the number of registered bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry() {
        let registry = KeybindingRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_invalid_keybinding_skipped() {
        let bindings = vec![
            KeyBinding::new("InvalidKey", "new_tab"),
            KeyBinding::new("Ctrl+A", "close_tab"),
        ];

        let registry = KeybindingRegistry::from_config(&bindings);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_action_skipped() {
        let bindings = vec![
            KeyBinding::new("Ctrl+B", "toggle_background_shader"),
            KeyBinding::new("Ctrl+T", "new_tab"),
        ];

        let registry = KeybindingRegistry::from_config(&bindings);
        assert_eq!(registry.len(), 1);
    }
}
