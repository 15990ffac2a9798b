//! A single node in the tab tree.

use std::cell::RefCell;
use std::rc::Rc;
use tabtree_config::{TabId, TabRecord};

/// Shared handle to a live node.
///
/// The registry hands out clones of the same handle for as long as the id
/// survives, so `Rc::ptr_eq` on two handles tells whether they are the same node.
pub type TabHandle = Rc<RefCell<TabNode>>;

/// Where a node's visual representation is currently mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    /// Not mounted anywhere: new, released, or waiting for a missing parent
    Detached,
    /// Mounted at the top level of the outline
    Root,
    /// Mounted under the given parent
    Under(TabId),
}

/// Visible state of a node, compared across a pass to decide whether it changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeState {
    pub parent: Option<TabId>,
    pub expanded: bool,
    pub attachment: Attachment,
    pub has_children: bool,
    pub selected: bool,
}

/// One tab in the tree.
///
/// Fields are only mutated by the engine; external code reads them through
/// the accessors.
#[derive(Debug)]
pub struct TabNode {
    id: TabId,
    parent: Option<TabId>,
    expanded: bool,
    attachment: Attachment,
    has_children: bool,
    selected: bool,
}

impl TabNode {
    pub(crate) fn new(id: TabId) -> Self {
        Self {
            id,
            parent: None,
            expanded: true,
            attachment: Attachment::Detached,
            has_children: false,
            selected: false,
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    /// Parent named by the last applied record.
    pub fn parent(&self) -> Option<TabId> {
        self.parent
    }

    pub fn expanded(&self) -> bool {
        self.expanded
    }

    pub fn attachment(&self) -> Attachment {
        self.attachment
    }

    /// Whether any node names this one as its parent.
    pub fn has_children(&self) -> bool {
        self.has_children
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    /// Caption shown for the tab.
    pub fn label(&self) -> String {
        format!("New Tab: {}", self.id)
    }

    /// Record that would persist this node's current state.
    pub fn to_record(&self) -> TabRecord {
        TabRecord {
            parent: self.parent,
            expanded: Some(self.expanded),
        }
    }

    pub fn state(&self) -> NodeState {
        NodeState {
            parent: self.parent,
            expanded: self.expanded,
            attachment: self.attachment,
            has_children: self.has_children,
            selected: self.selected,
        }
    }

    /// Whether the node is mounted where its parent field says it should be.
    pub(crate) fn attached_as_recorded(&self) -> bool {
        match (self.parent, self.attachment) {
            (None, Attachment::Root) => true,
            (Some(parent), Attachment::Under(mounted)) => parent == mounted,
            _ => false,
        }
    }

    /// Apply a persisted record. Returns true if the parent changed.
    pub(crate) fn apply_record(&mut self, record: &TabRecord) -> bool {
        let parent_changed = self.parent != record.parent;
        self.parent = record.parent;
        self.expanded = record.is_expanded();
        parent_changed
    }

    pub(crate) fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    pub(crate) fn set_attachment(&mut self, attachment: Attachment) {
        self.attachment = attachment;
    }

    pub(crate) fn set_has_children(&mut self, has_children: bool) {
        self.has_children = has_children;
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Release the visual attachment when the node leaves the registry.
    pub(crate) fn release(&mut self) {
        self.attachment = Attachment::Detached;
        self.selected = false;
    }
}
