//! Reconciliation of the live tab tree against a storage snapshot.
//!
//! A pass runs in fixed phases so that iteration order inside a snapshot never
//! matters:
//!
//! 1. **Upsert**: create missing nodes, apply records to existing ones, and
//!    collect every node whose attachment needs resolving.
//! 2. **Remove**: release and drop nodes whose ids are gone.
//! 3. **Attach**: resolve parents against the now-final registry. A missing
//!    parent yields a [`Diagnostic`] and leaves the node detached.
//! 4. **Refresh**: recompute has-children flags and note changed nodes.
//! 5. **Selection**: clear the selection if its node is gone.
//!
//! Diagnostics never abort a pass. The only error is
//! [`TabTreeError::DuplicateCreate`], which means the registry was misused.

use crate::error::TabTreeError;
use crate::tab::{Attachment, NodeState, SelectionManager, TabRegistry};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tabtree_config::{Snapshot, TabId};

/// Non-fatal anomaly found during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    /// A record names a parent that is not in the registry.
    DanglingParentReference { id: TabId, parent: TabId },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DanglingParentReference { id, parent } => write!(
                f,
                "Tab {} names missing parent {}; leaving it detached",
                id, parent
            ),
        }
    }
}

/// Lifecycle signal for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabEvent {
    Created(TabId),
    Updated(TabId),
    Removed(TabId),
}

/// What a single pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: Vec<TabId>,
    pub updated: Vec<TabId>,
    pub removed: Vec<TabId>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ReconcileReport {
    /// Lifecycle signals in emission order: creations, removals, then updates.
    pub fn events(&self) -> Vec<TabEvent> {
        self.created
            .iter()
            .map(|id| TabEvent::Created(*id))
            .chain(self.removed.iter().map(|id| TabEvent::Removed(*id)))
            .chain(self.updated.iter().map(|id| TabEvent::Updated(*id)))
            .collect()
    }

    /// Whether the pass left everything as it was.
    pub fn is_unchanged(&self) -> bool {
        self.created.is_empty()
            && self.updated.is_empty()
            && self.removed.is_empty()
            && self.diagnostics.is_empty()
    }
}

/// Keeps a [`TabRegistry`] and [`SelectionManager`] in step with storage.
///
/// The engine is the only writer of the registry. Readers get a shared
/// reference through [`ReconciliationEngine::registry`].
#[derive(Debug, Default)]
pub struct ReconciliationEngine {
    registry: TabRegistry,
    selection: SelectionManager,
}

impl ReconciliationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &TabRegistry {
        &self.registry
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    /// Select a live tab. Returns whether the selection changed.
    pub fn select(&mut self, id: TabId) -> Result<bool, TabTreeError> {
        if !self.registry.contains(id) {
            return Err(TabTreeError::UnknownTab(id));
        }
        Ok(self.selection.select(&self.registry, id))
    }

    /// Flip a node's expanded flag ahead of the storage echo.
    ///
    /// Returns the new value. The next snapshot overwrites it either way.
    pub fn toggle_local_expanded(&mut self, id: TabId) -> Result<bool, TabTreeError> {
        let handle = self.registry.get(id).ok_or(TabTreeError::UnknownTab(id))?;
        let mut node = handle.borrow_mut();
        let expanded = !node.expanded();
        node.set_expanded(expanded);
        Ok(expanded)
    }

    /// Bring the registry in line with `snapshot`.
    pub fn reconcile(&mut self, snapshot: &Snapshot) -> Result<ReconcileReport, TabTreeError> {
        let before: BTreeMap<TabId, NodeState> = self
            .registry
            .all()
            .map(|handle| {
                let node = handle.borrow();
                (node.id(), node.state())
            })
            .collect();

        let mut report = ReconcileReport::default();
        let mut pending = self.upsert(snapshot, &mut report)?;
        self.remove_absent(snapshot, &mut pending, &mut report);
        self.attach_pending(&pending, &mut report);
        self.refresh_display();
        self.selection.retain_valid(&self.registry);

        for handle in self.registry.all() {
            let node = handle.borrow();
            if let Some(previous) = before.get(&node.id())
                && *previous != node.state()
            {
                report.updated.push(node.id());
            }
        }

        log::debug!(
            "Reconciled {} records: {} created, {} updated, {} removed, {} diagnostics",
            snapshot.len(),
            report.created.len(),
            report.updated.len(),
            report.removed.len(),
            report.diagnostics.len()
        );
        Ok(report)
    }

    /// Phase 1. Returns the ids whose attachment must be resolved.
    fn upsert(
        &mut self,
        snapshot: &Snapshot,
        report: &mut ReconcileReport,
    ) -> Result<BTreeSet<TabId>, TabTreeError> {
        let mut pending = BTreeSet::new();
        for (id, record) in snapshot.iter() {
            match self.registry.get(id) {
                Some(handle) => {
                    let mut node = handle.borrow_mut();
                    let parent_changed = node.apply_record(record);
                    if parent_changed || !node.attached_as_recorded() {
                        pending.insert(id);
                    }
                }
                None => {
                    self.registry.create(id, record)?;
                    report.created.push(id);
                    pending.insert(id);
                }
            }
        }
        Ok(pending)
    }

    /// Phase 2.
    fn remove_absent(
        &mut self,
        snapshot: &Snapshot,
        pending: &mut BTreeSet<TabId>,
        report: &mut ReconcileReport,
    ) {
        let stale: Vec<TabId> = self
            .registry
            .ids()
            .filter(|id| !snapshot.contains(*id))
            .collect();
        if stale.is_empty() {
            return;
        }

        for id in &stale {
            if let Some(handle) = self.registry.remove(*id) {
                handle.borrow_mut().release();
            }
            self.selection.on_removed(*id);
            report.removed.push(*id);
        }
        log::debug!("Removed tabs {:?}", stale);

        // Children mounted under a removed node lose their mount point
        for handle in self.registry.all() {
            let node = handle.borrow();
            if let Attachment::Under(parent) = node.attachment()
                && !self.registry.contains(parent)
            {
                pending.insert(node.id());
            }
        }
    }

    /// Phase 3.
    fn attach_pending(&mut self, pending: &BTreeSet<TabId>, report: &mut ReconcileReport) {
        for id in pending {
            let Some(handle) = self.registry.get(*id) else {
                continue;
            };
            let parent = handle.borrow().parent();
            let attachment = match parent {
                None => Attachment::Root,
                Some(parent) if self.registry.contains(parent) => Attachment::Under(parent),
                Some(parent) => {
                    let diagnostic = Diagnostic::DanglingParentReference { id: *id, parent };
                    log::warn!("{}", diagnostic);
                    report.diagnostics.push(diagnostic);
                    Attachment::Detached
                }
            };
            handle.borrow_mut().set_attachment(attachment);
        }
    }

    /// Phase 4.
    fn refresh_display(&mut self) {
        let parents = self.registry.parent_ids();
        for handle in self.registry.all() {
            let mut node = handle.borrow_mut();
            let has_children = parents.contains(&node.id());
            node.set_has_children(has_children);
        }
    }
}
