//! Integration tests for tabtree-keybindings.
//!
//! These tests exercise the full config → registry → lookup pipeline using the
//! default bindings shipped by tabtree-config.

use tabtree_config::{Config, KeyBinding};
use tabtree_keybindings::{KeyAction, KeyInput, KeybindingRegistry, Modifiers, NamedKey};

// ---------------------------------------------------------------------------
// Registry construction
// ---------------------------------------------------------------------------

#[test]
fn test_registry_from_empty_config() {
    let registry = KeybindingRegistry::from_config(&[]);
    assert!(registry.is_empty());
    assert_eq!(registry.len(), 0);
}

#[test]
fn test_registry_loads_all_default_bindings() {
    let config = Config::default();
    let registry = KeybindingRegistry::from_config(&config.keybindings);
    assert_eq!(registry.len(), config.keybindings.len());
}

#[test]
fn test_later_binding_for_same_combo_wins() {
    let bindings = vec![
        KeyBinding::new("Ctrl+T", "new_tab"),
        KeyBinding::new("ctrl+t", "open_root_tab"),
    ];
    let registry = KeybindingRegistry::from_config(&bindings);
    assert_eq!(registry.len(), 1);
    assert_eq!(
        registry.lookup(&KeyInput::character(Modifiers::ctrl(), 't')),
        Some(KeyAction::OpenRootTab)
    );
}

// ---------------------------------------------------------------------------
// Default binding lookup
// ---------------------------------------------------------------------------

fn default_registry() -> KeybindingRegistry {
    KeybindingRegistry::from_config(&Config::default().keybindings)
}

#[test]
fn test_ctrl_t_opens_new_tab() {
    let registry = default_registry();
    assert_eq!(
        registry.lookup(&KeyInput::character(Modifiers::ctrl(), 't')),
        Some(KeyAction::NewTab)
    );
}

#[test]
fn test_ctrl_shift_t_opens_root_tab() {
    let registry = default_registry();
    assert_eq!(
        registry.lookup(&KeyInput::character(Modifiers::ctrl_shift(), 'T')),
        Some(KeyAction::OpenRootTab)
    );
}

#[test]
fn test_ctrl_w_closes_and_ctrl_q_clears() {
    let registry = default_registry();
    assert_eq!(
        registry.lookup(&KeyInput::character(Modifiers::ctrl(), 'w')),
        Some(KeyAction::CloseTab)
    );
    assert_eq!(
        registry.lookup(&KeyInput::character(Modifiers::ctrl(), 'q')),
        Some(KeyAction::ClearAll)
    );
}

#[test]
fn test_ctrl_l_focuses_address_bar() {
    let registry = default_registry();
    assert_eq!(
        registry.lookup(&KeyInput::character(Modifiers::ctrl(), 'l')),
        Some(KeyAction::FocusAddressBar)
    );
}

#[test]
fn test_navigation_keys() {
    let registry = default_registry();
    assert_eq!(
        registry.lookup(&KeyInput::named(Modifiers::default(), NamedKey::ArrowDown)),
        Some(KeyAction::SelectNext)
    );
    assert_eq!(
        registry.lookup(&KeyInput::named(Modifiers::default(), NamedKey::ArrowUp)),
        Some(KeyAction::SelectPrev)
    );
    assert_eq!(
        registry.lookup(&KeyInput::character(Modifiers::default(), ' ')),
        Some(KeyAction::ToggleExpanded)
    );
}

#[test]
fn test_unbound_keys_return_none() {
    let registry = default_registry();
    assert_eq!(
        registry.lookup(&KeyInput::character(Modifiers::default(), 't')),
        None
    );
    assert_eq!(
        registry.lookup(&KeyInput::named(Modifiers::ctrl(), NamedKey::F(5))),
        None
    );
}
