//! Key event matching.
//!
//! Matches key presses from the host's input layer against parsed [`KeyCombo`]s.

use crate::parser::{Key, KeyCombo, Modifiers, NamedKey};
use crate::platform::resolve_cmd_or_ctrl;

/// A single key press as delivered by the host input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    /// Modifiers held during the press
    pub modifiers: Modifiers,
    /// The logical key pressed
    pub key: Key,
}

impl KeyInput {
    /// A character key press.
    pub fn character(modifiers: Modifiers, c: char) -> Self {
        Self {
            modifiers,
            key: Key::Character(c),
        }
    }

    /// A named key press.
    pub fn named(modifiers: Modifiers, key: NamedKey) -> Self {
        Self {
            modifiers,
            key: Key::Named(key),
        }
    }
}

/// Matcher for comparing a key press against keybindings.
#[derive(Debug)]
pub struct KeybindingMatcher {
    /// Active modifiers from the event
    modifiers: Modifiers,
    /// Normalized key from the event
    key: Key,
}

impl KeybindingMatcher {
    /// Create a matcher from a key press.
    pub fn from_input(input: &KeyInput) -> Self {
        let key = match input.key {
            // A literal space arrives as a character from most input layers
            Key::Character(' ') => Key::Named(NamedKey::Space),
            Key::Character(c) => Key::Character(c.to_ascii_uppercase()),
            named => named,
        };

        Self {
            modifiers: Modifiers {
                cmd_or_ctrl: false,
                ..input.modifiers
            },
            key,
        }
    }

    /// Check if this event matches the given key combo.
    pub fn matches(&self, combo: &KeyCombo) -> bool {
        let key_matches = match (&combo.key, &self.key) {
            (Key::Character(combo_char), Key::Character(event_char)) => {
                event_char.eq_ignore_ascii_case(combo_char)
            }
            (Key::Named(combo_named), Key::Named(event_named)) => combo_named == event_named,
            _ => false,
        };

        key_matches && self.modifiers_match(&combo.modifiers)
    }

    /// Check if modifiers match, handling CmdOrCtrl specially.
    fn modifiers_match(&self, combo_mods: &Modifiers) -> bool {
        let (expected_ctrl, expected_super) =
            resolve_cmd_or_ctrl(combo_mods.cmd_or_ctrl, combo_mods.ctrl, combo_mods.super_key);

        self.modifiers.ctrl == expected_ctrl
            && self.modifiers.alt == combo_mods.alt
            && self.modifiers.shift == combo_mods.shift
            && self.modifiers.super_key == expected_super
    }
}
