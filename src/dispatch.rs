//! Keybinding action dispatch for [`TabTree`].
//!
//! Every [`KeyAction`] maps to exactly one lifecycle operation. The match is
//! exhaustive, so a new action cannot be added without deciding what it does.

use crate::tab::TabTree;
use tabtree_keybindings::{KeyAction, KeyInput, KeybindingRegistry};

impl TabTree {
    /// Execute a keybinding action against the current selection.
    pub fn execute_key_action(&mut self, action: KeyAction) {
        log::debug!("Executing key action {}", action);
        match action {
            KeyAction::NewTab => {
                self.open_new_tab();
            }
            KeyAction::OpenRootTab => {
                self.open_root_tab();
            }
            KeyAction::CloseTab => {
                self.close_current_tab();
            }
            KeyAction::ClearAll => self.clear_all(),
            KeyAction::FocusAddressBar => self.focus_address_bar(),
            KeyAction::ToggleExpanded => {
                if let Some(id) = self.current()
                    && let Err(e) = self.toggle_expanded(id)
                {
                    log::warn!("Toggle via keybinding failed: {}", e);
                }
            }
            KeyAction::SelectNext => {
                self.select_next();
            }
            KeyAction::SelectPrev => {
                self.select_prev();
            }
        }
    }

    /// Look up `input` in `bindings` and execute the bound action.
    ///
    /// Returns true if the input was bound to an action.
    pub fn handle_key(&mut self, bindings: &KeybindingRegistry, input: &KeyInput) -> bool {
        match bindings.lookup(input) {
            Some(action) => {
                self.execute_key_action(action);
                true
            }
            None => false,
        }
    }
}
