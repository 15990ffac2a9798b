//! Shared integration test helpers for tabtree.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::{snapshot, shared_views};
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a subset
//! of helpers are used per file.

#![allow(dead_code)]

use std::path::PathBuf;
use tabtree::{MemoryStore, Snapshot, TabId, TabRecord, TabTree};
use tempfile::TempDir;

/// Build a snapshot from `(id, parent)` pairs with no stored expansion state.
pub fn snapshot(entries: &[(TabId, Option<TabId>)]) -> Snapshot {
    entries
        .iter()
        .map(|(id, parent)| {
            (
                *id,
                TabRecord {
                    parent: *parent,
                    expanded: None,
                },
            )
        })
        .collect()
}

/// A loaded view over `store`.
pub fn loaded_view(store: &MemoryStore) -> TabTree {
    let mut tree = TabTree::new(Box::new(store.clone()));
    tree.load().expect("initial load failed");
    tree
}

/// Two loaded views sharing one in-memory store.
pub fn shared_views(initial: Snapshot) -> (MemoryStore, TabTree, TabTree) {
    let store = MemoryStore::with_snapshot(initial);
    let first = loaded_view(&store);
    let second = loaded_view(&store);
    (store, first, second)
}

/// Ids of the visible rows, in display order.
pub fn visible_ids(tree: &TabTree) -> Vec<TabId> {
    tree.visible_rows().iter().map(|row| row.id).collect()
}

/// A temp directory and a store path inside it.
///
/// The `TempDir` must be kept alive for the duration of the test.
pub fn temp_store_path() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("tabs.json");
    (temp_dir, path)
}
