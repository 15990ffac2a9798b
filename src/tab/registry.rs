//! Owner of the live set of tab nodes.

use super::node::{TabHandle, TabNode};
use crate::error::TabTreeError;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;
use tabtree_config::{TabId, TabRecord};

/// Live nodes keyed by id.
///
/// The registry is the only place nodes are constructed or dropped. Lookups
/// return clones of the stored handle, so identity survives updates.
#[derive(Debug, Default)]
pub struct TabRegistry {
    nodes: BTreeMap<TabId, TabHandle>,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: TabId) -> Option<TabHandle> {
        self.nodes.get(&id).map(Rc::clone)
    }

    pub fn contains(&self, id: TabId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Construct a node for `id` with `record` as its initial state.
    ///
    /// The node starts detached; attachment is resolved by the engine.
    ///
    /// # Errors
    /// [`TabTreeError::DuplicateCreate`] if `id` is already present.
    pub fn create(&mut self, id: TabId, record: &TabRecord) -> Result<TabHandle, TabTreeError> {
        if self.nodes.contains_key(&id) {
            return Err(TabTreeError::DuplicateCreate(id));
        }
        let mut node = TabNode::new(id);
        node.apply_record(record);
        let handle = Rc::new(RefCell::new(node));
        self.nodes.insert(id, Rc::clone(&handle));
        Ok(handle)
    }

    /// Drop the registry's handle for `id`, returning it so the caller can release it.
    pub fn remove(&mut self, id: TabId) -> Option<TabHandle> {
        self.nodes.remove(&id)
    }

    /// All nodes in id order.
    pub fn all(&self) -> impl Iterator<Item = &TabHandle> {
        self.nodes.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = TabId> + '_ {
        self.nodes.keys().copied()
    }

    /// Ids of the nodes whose parent field names `id`, in id order.
    ///
    /// Derived on every call from the nodes' parent fields.
    pub fn children_of(&self, id: TabId) -> Vec<TabId> {
        self.nodes
            .iter()
            .filter(|(_, handle)| handle.borrow().parent() == Some(id))
            .map(|(child, _)| *child)
            .collect()
    }

    /// Ids that at least one node names as its parent.
    pub fn parent_ids(&self) -> BTreeSet<TabId> {
        self.nodes
            .values()
            .filter_map(|handle| handle.borrow().parent())
            .collect()
    }

    /// Whether `ancestor` appears on the parent chain above `id`.
    ///
    /// The walk stops at the first repeated id, so cyclic data terminates.
    pub fn is_ancestor(&self, ancestor: TabId, id: TabId) -> bool {
        let mut visited = BTreeSet::new();
        let mut cursor = self.nodes.get(&id).and_then(|h| h.borrow().parent());
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            if !visited.insert(current) {
                return false;
            }
            cursor = self.nodes.get(&current).and_then(|h| h.borrow().parent());
        }
        false
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
