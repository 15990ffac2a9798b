//! Flattening the mounted tree into display order.

use super::node::Attachment;
use super::registry::TabRegistry;
use std::collections::{BTreeMap, BTreeSet};
use tabtree_config::TabId;

/// One visible line of the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabRow {
    pub id: TabId,
    /// Nesting level; root tabs are at depth 0
    pub depth: usize,
    pub expanded: bool,
    pub has_children: bool,
    pub selected: bool,
    pub label: String,
}

/// Roots and mounted children, each list in id order.
fn mount_points(registry: &TabRegistry) -> (Vec<TabId>, BTreeMap<TabId, Vec<TabId>>) {
    let mut roots = Vec::new();
    let mut children: BTreeMap<TabId, Vec<TabId>> = BTreeMap::new();
    for handle in registry.all() {
        let node = handle.borrow();
        match node.attachment() {
            Attachment::Root => roots.push(node.id()),
            Attachment::Under(parent) => children.entry(parent).or_default().push(node.id()),
            Attachment::Detached => {}
        }
    }
    (roots, children)
}

/// Depth-first outline of mounted nodes, skipping the children of collapsed nodes.
///
/// Detached nodes and nodes only reachable through a cycle are not listed.
pub fn visible_rows(registry: &TabRegistry) -> Vec<TabRow> {
    let (roots, children) = mount_points(registry);
    let mut rows = Vec::new();
    let mut visited = BTreeSet::new();
    let mut stack: Vec<(TabId, usize)> = roots.into_iter().rev().map(|id| (id, 0)).collect();

    while let Some((id, depth)) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        let Some(handle) = registry.get(id) else {
            continue;
        };
        let node = handle.borrow();
        rows.push(TabRow {
            id,
            depth,
            expanded: node.expanded(),
            has_children: node.has_children(),
            selected: node.selected(),
            label: node.label(),
        });
        if node.expanded()
            && let Some(kids) = children.get(&id)
        {
            stack.extend(kids.iter().rev().map(|child| (*child, depth + 1)));
        }
    }
    rows
}

/// Every id reachable from a root through mounted links, regardless of expansion.
pub fn reachable_from_root(registry: &TabRegistry) -> BTreeSet<TabId> {
    let (roots, children) = mount_points(registry);
    let mut reached = BTreeSet::new();
    let mut stack = roots;
    while let Some(id) = stack.pop() {
        if reached.insert(id)
            && let Some(kids) = children.get(&id)
        {
            stack.extend(kids.iter().copied());
        }
    }
    reached
}
