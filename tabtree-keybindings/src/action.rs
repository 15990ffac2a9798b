//! Actions that keybindings can trigger.

use std::fmt;
use std::str::FromStr;

/// A tab-tree operation reachable from the keyboard.
///
/// Config files name actions in snake_case (`new_tab`, `close_tab`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Open a tab under the current selection (root if nothing is selected)
    NewTab,
    /// Open a tab at the root level
    OpenRootTab,
    /// Close the selected tab
    CloseTab,
    /// Remove every stored tab
    ClearAll,
    /// Move focus to the address bar (handled by the host)
    FocusAddressBar,
    /// Expand or collapse the selected tab
    ToggleExpanded,
    /// Select the next visible tab
    SelectNext,
    /// Select the previous visible tab
    SelectPrev,
}

impl KeyAction {
    /// Every action, in config documentation order.
    pub const ALL: [KeyAction; 8] = [
        KeyAction::NewTab,
        KeyAction::OpenRootTab,
        KeyAction::CloseTab,
        KeyAction::ClearAll,
        KeyAction::FocusAddressBar,
        KeyAction::ToggleExpanded,
        KeyAction::SelectNext,
        KeyAction::SelectPrev,
    ];

    /// Config name of the action.
    pub fn as_str(self) -> &'static str {
        match self {
            KeyAction::NewTab => "new_tab",
            KeyAction::OpenRootTab => "open_root_tab",
            KeyAction::CloseTab => "close_tab",
            KeyAction::ClearAll => "clear_all",
            KeyAction::FocusAddressBar => "focus_address_bar",
            KeyAction::ToggleExpanded => "toggle_expanded",
            KeyAction::SelectNext => "select_next",
            KeyAction::SelectPrev => "select_prev",
        }
    }
}

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        KeyAction::ALL
            .into_iter()
            .find(|action| action.as_str() == name)
            .ok_or_else(|| format!("Unknown action: '{}'", name))
    }
}
