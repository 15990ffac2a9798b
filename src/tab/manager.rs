//! Tab tree facade coordinating storage, reconciliation and selection for one view

use super::allocator::IdAllocator;
use super::node::{Attachment, TabHandle};
use super::outline::{TabRow, reachable_from_root, visible_rows};
use super::registry::TabRegistry;
use crate::error::TabTreeError;
use crate::reconcile::{ReconcileReport, ReconciliationEngine, TabEvent};
use crate::storage::StorageGateway;
use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, TryRecvError};
use tabtree_config::{Config, Snapshot, TabId, TabRecord};

/// One view of the shared tab tree.
///
/// User actions are written to storage as intents and only show up locally
/// once storage echoes them back through [`TabTree::pump`]. Snapshots are
/// reconciled one at a time in the order storage delivered them.
pub struct TabTree {
    /// Backing store, the source of truth
    storage: Box<dyn StorageGateway>,
    /// Snapshots delivered by the store, not yet reconciled
    updates: Receiver<Snapshot>,
    engine: ReconciliationEngine,
    /// Lifecycle signals not yet taken by the renderer
    events: VecDeque<TabEvent>,
    /// Select tabs opened here once their record is echoed back
    select_new_tabs: bool,
    /// Tab opened by this view waiting for its echo
    pending_selection: Option<TabId>,
}

impl TabTree {
    /// Create a view over `storage` and subscribe to its changes.
    ///
    /// Nothing is loaded until [`TabTree::load`] is called.
    pub fn new(storage: Box<dyn StorageGateway>) -> Self {
        let updates = storage.subscribe();
        Self {
            storage,
            updates,
            engine: ReconciliationEngine::new(),
            events: VecDeque::new(),
            select_new_tabs: false,
            pending_selection: None,
        }
    }

    /// Create a view configured from `config`.
    pub fn with_config(storage: Box<dyn StorageGateway>, config: &Config) -> Self {
        let mut tree = Self::new(storage);
        tree.select_new_tabs = config.select_new_tabs;
        tree
    }

    pub fn set_select_new_tabs(&mut self, enabled: bool) {
        self.select_new_tabs = enabled;
    }

    /// Initial load: reconcile against the store's current snapshot.
    pub fn load(&mut self) -> Result<ReconcileReport, TabTreeError> {
        let snapshot = self.storage.load_snapshot()?;
        log::info!("Loading tab tree ({} records)", snapshot.len());
        self.apply_snapshot(&snapshot)
    }

    /// Reconcile every snapshot queued by the store, oldest first.
    ///
    /// Returns the number of snapshots processed.
    pub fn pump(&mut self) -> Result<usize, TabTreeError> {
        let mut processed = 0;
        loop {
            match self.updates.try_recv() {
                Ok(snapshot) => {
                    self.apply_snapshot(&snapshot)?;
                    processed += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("Storage subscription closed");
                    break;
                }
            }
        }
        Ok(processed)
    }

    /// Reconcile one snapshot and queue the resulting lifecycle signals.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) -> Result<ReconcileReport, TabTreeError> {
        let report = self.engine.reconcile(snapshot)?;
        self.events.extend(report.events());

        if let Some(id) = self.pending_selection
            && self.engine.registry().contains(id)
        {
            self.pending_selection = None;
            self.select(id)?;
        }
        Ok(report)
    }

    pub fn registry(&self) -> &TabRegistry {
        self.engine.registry()
    }

    pub fn get(&self, id: TabId) -> Option<TabHandle> {
        self.engine.registry().get(id)
    }

    /// Currently selected tab.
    pub fn current(&self) -> Option<TabId> {
        self.engine.selection().current()
    }

    /// Select a tab. Returns whether the selection changed.
    pub fn select(&mut self, id: TabId) -> Result<bool, TabTreeError> {
        let previous = self.current();
        let changed = self.engine.select(id)?;
        if changed {
            if let Some(previous) = previous {
                self.events.push_back(TabEvent::Updated(previous));
            }
            self.events.push_back(TabEvent::Updated(id));
        }
        Ok(changed)
    }

    /// Open a tab at the root level.
    ///
    /// Returns the id written to storage, or `None` if storage failed.
    pub fn open_root_tab(&mut self) -> Option<TabId> {
        self.open_tab_under(None)
    }

    /// Open a tab under the selected tab, or at the root when nothing is selected.
    pub fn open_new_tab(&mut self) -> Option<TabId> {
        self.open_tab_under(self.current())
    }

    /// Allocate a free id and write a record for it under `parent`.
    ///
    /// The node appears once storage echoes the record back.
    pub fn open_tab_under(&mut self, parent: Option<TabId>) -> Option<TabId> {
        let snapshot = match self.storage.load_snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::error!("Failed to read storage for id allocation: {}", e);
                return None;
            }
        };
        let id = IdAllocator::allocate(&snapshot);
        let record = TabRecord {
            parent,
            expanded: Some(true),
        };

        if !self.write_intent(id, record) {
            return None;
        }
        log::info!("Opened tab {} (parent: {:?})", id, parent);
        if self.select_new_tabs {
            self.pending_selection = Some(id);
        }
        Some(id)
    }

    /// Remove the selected tab's record. Returns the id that was removed.
    ///
    /// Children are not removed; they stay detached until re-parented.
    pub fn close_current_tab(&mut self) -> Option<TabId> {
        let id = self.current()?;
        match self.storage.remove_tab_record(id) {
            Ok(()) => {
                log::info!("Closed tab {}", id);
                Some(id)
            }
            Err(e) => {
                log::error!("Failed to remove tab {} from storage: {}", id, e);
                None
            }
        }
    }

    /// Re-parent a tab. `None` moves it to the root level.
    ///
    /// # Errors
    /// [`TabTreeError::UnknownTab`] if either tab is not live, and
    /// [`TabTreeError::WouldCycle`] if `new_parent` is the tab or one of its descendants.
    pub fn move_tab(&mut self, id: TabId, new_parent: Option<TabId>) -> Result<(), TabTreeError> {
        let registry = self.engine.registry();
        let handle = registry.get(id).ok_or(TabTreeError::UnknownTab(id))?;
        if let Some(parent) = new_parent {
            if !registry.contains(parent) {
                return Err(TabTreeError::UnknownTab(parent));
            }
            if parent == id || registry.is_ancestor(id, parent) {
                return Err(TabTreeError::WouldCycle { id, parent });
            }
        }

        let record = TabRecord {
            parent: new_parent,
            ..handle.borrow().to_record()
        };
        if self.write_intent(id, record) {
            log::info!("Moved tab {} under {:?}", id, new_parent);
        }
        Ok(())
    }

    /// Flip a tab's expanded state, locally and in storage.
    ///
    /// Returns the new state. The next snapshot decides the final value.
    pub fn toggle_expanded(&mut self, id: TabId) -> Result<bool, TabTreeError> {
        let expanded = self.engine.toggle_local_expanded(id)?;
        self.events.push_back(TabEvent::Updated(id));

        let record = self
            .get(id)
            .map(|handle| handle.borrow().to_record())
            .ok_or(TabTreeError::UnknownTab(id))?;
        self.write_intent(id, record);
        Ok(expanded)
    }

    /// Remove every record from storage.
    pub fn clear_all(&mut self) {
        match self.storage.clear_all() {
            Ok(()) => log::info!("Cleared all tabs"),
            Err(e) => log::error!("Failed to clear storage: {}", e),
        }
    }

    /// Address bar focus belongs to the host; the tree has nothing to do.
    pub fn focus_address_bar(&self) {
        log::debug!("focus_address_bar requested; no address bar attached");
    }

    /// Select the next visible tab, wrapping to the first.
    pub fn select_next(&mut self) -> Option<TabId> {
        self.step_selection(true)
    }

    /// Select the previous visible tab, wrapping to the last.
    pub fn select_prev(&mut self) -> Option<TabId> {
        self.step_selection(false)
    }

    fn step_selection(&mut self, forward: bool) -> Option<TabId> {
        let ids: Vec<TabId> = self.visible_rows().iter().map(|row| row.id).collect();
        if ids.is_empty() {
            return None;
        }

        let position = self
            .current()
            .and_then(|current| ids.iter().position(|id| *id == current));
        let index = match (position, forward) {
            (Some(i), true) => (i + 1) % ids.len(),
            (Some(i), false) => (i + ids.len() - 1) % ids.len(),
            (None, true) => 0,
            (None, false) => ids.len() - 1,
        };

        let id = ids[index];
        match self.select(id) {
            Ok(_) => Some(id),
            Err(e) => {
                log::warn!("Failed to select tab {}: {}", id, e);
                None
            }
        }
    }

    /// The outline as it should be displayed.
    pub fn visible_rows(&self) -> Vec<TabRow> {
        visible_rows(self.engine.registry())
    }

    /// Tabs left unmounted because their parent is missing.
    pub fn detached(&self) -> Vec<TabId> {
        self.engine
            .registry()
            .all()
            .filter(|handle| handle.borrow().attachment() == Attachment::Detached)
            .map(|handle| handle.borrow().id())
            .collect()
    }

    /// Mounted tabs that no root leads to, which only happens with cyclic parents.
    pub fn unreachable(&self) -> Vec<TabId> {
        let registry = self.engine.registry();
        let reached = reachable_from_root(registry);
        registry
            .all()
            .map(|handle| handle.borrow())
            .filter(|node| node.attachment() != Attachment::Detached && !reached.contains(&node.id()))
            .map(|node| node.id())
            .collect()
    }

    /// Take the lifecycle signals emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<TabEvent> {
        self.events.drain(..).collect()
    }

    /// Fire-and-forget write; failures are logged. Returns whether it succeeded.
    fn write_intent(&self, id: TabId, record: TabRecord) -> bool {
        match self.storage.write_tab_record(id, record) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to write tab {} to storage: {}", id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn tree_over(store: &MemoryStore) -> TabTree {
        let mut tree = TabTree::new(Box::new(store.clone()));
        tree.load().unwrap();
        tree
    }

    #[test]
    fn test_open_is_visible_only_after_pump() {
        let store = MemoryStore::new();
        let mut tree = tree_over(&store);
        assert_eq!(tree.open_root_tab(), Some(0));
        assert!(tree.get(0).is_none());
        assert_eq!(tree.pump().unwrap(), 1);
        assert!(tree.get(0).is_some());
    }

    #[test]
    fn test_open_new_tab_uses_selection_as_parent() {
        let store = MemoryStore::new();
        let mut tree = tree_over(&store);
        tree.open_root_tab();
        tree.pump().unwrap();
        tree.select(0).unwrap();
        assert_eq!(tree.open_new_tab(), Some(1));
        tree.pump().unwrap();
        assert_eq!(tree.get(1).unwrap().borrow().parent(), Some(0));
    }

    #[test]
    fn test_select_new_tabs_selects_on_echo() {
        let store = MemoryStore::new();
        let mut tree = tree_over(&store);
        tree.set_select_new_tabs(true);
        tree.open_root_tab();
        assert_eq!(tree.current(), None);
        tree.pump().unwrap();
        assert_eq!(tree.current(), Some(0));
    }

    #[test]
    fn test_close_without_selection_does_nothing() {
        let store = MemoryStore::with_snapshot(Snapshot::new().with_tab(0, TabRecord::root()));
        let mut tree = tree_over(&store);
        assert_eq!(tree.close_current_tab(), None);
        assert!(store.snapshot().contains(0));
    }

    #[test]
    fn test_step_selection_wraps() {
        let store = MemoryStore::with_snapshot(
            Snapshot::new()
                .with_tab(0, TabRecord::root())
                .with_tab(1, TabRecord::root()),
        );
        let mut tree = tree_over(&store);
        assert_eq!(tree.select_next(), Some(0));
        assert_eq!(tree.select_next(), Some(1));
        assert_eq!(tree.select_next(), Some(0));
        assert_eq!(tree.select_prev(), Some(1));
    }

    #[test]
    fn test_step_selection_on_empty_tree() {
        let store = MemoryStore::new();
        let mut tree = tree_over(&store);
        assert_eq!(tree.select_next(), None);
        assert_eq!(tree.select_prev(), None);
    }
}
