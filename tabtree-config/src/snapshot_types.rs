//! Persisted tab record types shared by the storage layer and the engine.
//!
//! A [`Snapshot`] is the complete set of tab records held by storage. It is
//! always delivered wholesale; nothing in tabtree applies a partial snapshot.
//!
//! # Serialization
//!
//! ```text
//! {"tabs": {"0": {"parent": null, "expanded": true}, "1": {"parent": 0}}}
//! ```
//!
//! Map keys are written as strings by JSON and parsed back into [`TabId`].
//! A missing `expanded` field stays `None` so the engine can apply its own
//! default; a missing or `null` `parent` means the tab sits at the root.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unique identifier for a tab.
pub type TabId = u64;

/// Persisted state of a single tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TabRecord {
    /// Containing tab, or `None` for a root-level tab
    #[serde(default)]
    pub parent: Option<TabId>,

    /// Whether the tab's children are shown; `None` when never written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
}

impl TabRecord {
    /// Record for a root-level tab with no stored expansion state.
    pub fn root() -> Self {
        Self::default()
    }

    /// Record for a tab nested under `parent`.
    pub fn child_of(parent: TabId) -> Self {
        Self {
            parent: Some(parent),
            expanded: None,
        }
    }

    /// Return a copy with the expansion state set.
    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = Some(expanded);
        self
    }

    /// Effective expansion state. Tabs are expanded unless a record says otherwise.
    pub fn is_expanded(&self) -> bool {
        self.expanded.unwrap_or(true)
    }
}

/// The complete set of persisted tab records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tabs: BTreeMap<TabId, TabRecord>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly useful for constructing fixtures.
    pub fn with_tab(mut self, id: TabId, record: TabRecord) -> Self {
        self.tabs.insert(id, record);
        self
    }

    /// Check whether a record exists for `id`.
    pub fn contains(&self, id: TabId) -> bool {
        self.tabs.contains_key(&id)
    }

    /// Get the record for `id`.
    pub fn get(&self, id: TabId) -> Option<&TabRecord> {
        self.tabs.get(&id)
    }

    /// Iterate over all `(id, record)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (TabId, &TabRecord)> {
        self.tabs.iter().map(|(id, record)| (*id, record))
    }

    /// Iterate over all ids.
    pub fn ids(&self) -> impl Iterator<Item = TabId> + '_ {
        self.tabs.keys().copied()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Whether the snapshot holds no records.
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}

impl FromIterator<(TabId, TabRecord)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (TabId, TabRecord)>>(iter: I) -> Self {
        Self {
            tabs: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_expanded_defaults_to_true() {
        let record: TabRecord = serde_json::from_str(r#"{"parent": null}"#).unwrap();
        assert_eq!(record.expanded, None);
        assert!(record.is_expanded());
    }

    #[test]
    fn test_missing_parent_is_root() {
        let record: TabRecord = serde_json::from_str(r#"{"expanded": false}"#).unwrap();
        assert_eq!(record.parent, None);
        assert!(!record.is_expanded());
    }

    #[test]
    fn test_parent_zero_is_a_real_parent() {
        let record: TabRecord = serde_json::from_str(r#"{"parent": 0}"#).unwrap();
        assert_eq!(record.parent, Some(0));
    }

    #[test]
    fn test_snapshot_parses_string_keys() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"{"tabs": {"0": {"parent": null}, "3": {"parent": 0, "expanded": false}}}"#,
        )
        .unwrap();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains(3));
        assert_eq!(snapshot.get(3).and_then(|r| r.parent), Some(0));
    }

    #[test]
    fn test_empty_document_is_empty_snapshot() {
        let snapshot: Snapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_unset_expanded_is_not_serialized() {
        let json = serde_json::to_string(&TabRecord::child_of(4)).unwrap();
        assert_eq!(json, r#"{"parent":4}"#);
    }
}
