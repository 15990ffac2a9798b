//! Keybinding management methods for `Config`.

use super::config_struct::Config;
use std::collections::HashSet;

impl Config {
    /// Merge default keybindings into the user's config.
    ///
    /// Only adds keybindings for actions that don't already exist in the user's
    /// config, so actions introduced in a newer release get their default keys.
    pub(crate) fn merge_default_keybindings(&mut self) {
        let existing_actions: HashSet<String> = self
            .keybindings
            .iter()
            .map(|kb| kb.action.clone())
            .collect();

        let mut added_count = 0;
        for default_kb in crate::defaults::keybindings() {
            if !existing_actions.contains(&default_kb.action) {
                log::info!(
                    "Adding new default keybinding: {} -> {}",
                    default_kb.key,
                    default_kb.action
                );
                self.keybindings.push(default_kb);
                added_count += 1;
            }
        }

        if added_count > 0 {
            log::info!(
                "Merged {} new default keybinding(s) into user config",
                added_count
            );
        }
    }
}
