//! Single-selection tracking.

use super::registry::TabRegistry;
use tabtree_config::TabId;

/// Tracks at most one selected tab.
#[derive(Debug, Default)]
pub struct SelectionManager {
    current: Option<TabId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<TabId> {
        self.current
    }

    /// Select `id`, unselecting whatever was selected before.
    ///
    /// Returns false when `id` is already selected or is not in the registry.
    pub fn select(&mut self, registry: &TabRegistry, id: TabId) -> bool {
        if self.current == Some(id) {
            return false;
        }
        let Some(node) = registry.get(id) else {
            log::debug!("Ignoring selection of unknown tab {}", id);
            return false;
        };

        if let Some(previous) = self.current.and_then(|prev| registry.get(prev)) {
            previous.borrow_mut().set_selected(false);
        }
        node.borrow_mut().set_selected(true);
        self.current = Some(id);
        log::debug!("Selected tab {}", id);
        true
    }

    /// Forget the selection if it was `id`. Returns true if it was cleared.
    pub fn on_removed(&mut self, id: TabId) -> bool {
        if self.current == Some(id) {
            self.current = None;
            log::debug!("Selected tab {} was removed, selection cleared", id);
            true
        } else {
            false
        }
    }

    /// Clear the selection if its id is no longer in the registry.
    pub fn retain_valid(&mut self, registry: &TabRegistry) {
        if let Some(id) = self.current
            && !registry.contains(id)
        {
            self.current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabtree_config::TabRecord;

    fn registry_with(ids: &[TabId]) -> TabRegistry {
        let mut registry = TabRegistry::new();
        for id in ids {
            registry.create(*id, &TabRecord::root()).unwrap();
        }
        registry
    }

    fn is_selected(registry: &TabRegistry, id: TabId) -> bool {
        registry.get(id).map(|n| n.borrow().selected()).unwrap_or(false)
    }

    #[test]
    fn test_select_moves_selection() {
        let registry = registry_with(&[1, 2]);
        let mut selection = SelectionManager::new();
        assert!(selection.select(&registry, 1));
        assert!(selection.select(&registry, 2));
        assert_eq!(selection.current(), Some(2));
        assert!(!is_selected(&registry, 1));
        assert!(is_selected(&registry, 2));
    }

    #[test]
    fn test_reselect_is_noop() {
        let registry = registry_with(&[1]);
        let mut selection = SelectionManager::new();
        assert!(selection.select(&registry, 1));
        assert!(!selection.select(&registry, 1));
        assert!(is_selected(&registry, 1));
    }

    #[test]
    fn test_unknown_id_is_not_selected() {
        let registry = registry_with(&[1]);
        let mut selection = SelectionManager::new();
        assert!(!selection.select(&registry, 9));
        assert_eq!(selection.current(), None);
    }

    #[test]
    fn test_on_removed() {
        let registry = registry_with(&[1, 2]);
        let mut selection = SelectionManager::new();
        selection.select(&registry, 1);
        assert!(!selection.on_removed(2));
        assert_eq!(selection.current(), Some(1));
        assert!(selection.on_removed(1));
        assert_eq!(selection.current(), None);
    }

    #[test]
    fn test_retain_valid() {
        let mut registry = registry_with(&[4]);
        let mut selection = SelectionManager::new();
        selection.select(&registry, 4);
        registry.remove(4);
        selection.retain_valid(&registry);
        assert_eq!(selection.current(), None);
    }
}
