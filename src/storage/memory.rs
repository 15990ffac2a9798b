//! In-process storage shared between views.

use super::StorageGateway;
use crate::error::StorageError;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use tabtree_config::{Snapshot, TabId, TabRecord};

/// Cloneable handle to one shared in-memory store.
///
/// Every change broadcasts the full snapshot to all live subscribers of every
/// clone. Writes that leave the snapshot unchanged broadcast nothing.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    snapshot: Snapshot,
    subscribers: Vec<Sender<Snapshot>>,
}

impl MemoryStoreInner {
    fn broadcast(&mut self) {
        let snapshot = &self.snapshot;
        // Receivers that were dropped are pruned here
        self.subscribers
            .retain(|tx| tx.send(snapshot.clone()).is_ok());
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `snapshot`.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryStoreInner {
                snapshot,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Copy of the stored snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock().snapshot.clone()
    }

    /// Replace the whole snapshot, as an external writer would.
    pub fn replace(&self, snapshot: Snapshot) {
        self.mutate(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }

    /// Number of subscribers still listening, as of the last broadcast.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    fn mutate(&self, change: impl FnOnce(&mut Snapshot) -> bool) {
        let mut inner = self.inner.lock();
        if change(&mut inner.snapshot) {
            inner.broadcast();
        }
    }
}

impl StorageGateway for MemoryStore {
    fn load_snapshot(&self) -> Result<Snapshot, StorageError> {
        Ok(self.snapshot())
    }

    fn subscribe(&self) -> Receiver<Snapshot> {
        let (tx, rx) = channel();
        self.inner.lock().subscribers.push(tx);
        rx
    }

    fn write_tab_record(&self, id: TabId, record: TabRecord) -> Result<(), StorageError> {
        self.mutate(|snapshot| snapshot.tabs.insert(id, record) != Some(record));
        Ok(())
    }

    fn remove_tab_record(&self, id: TabId) -> Result<(), StorageError> {
        self.mutate(|snapshot| snapshot.tabs.remove(&id).is_some());
        Ok(())
    }

    fn clear_all(&self) -> Result<(), StorageError> {
        self.mutate(|snapshot| {
            let had_tabs = !snapshot.is_empty();
            snapshot.tabs.clear();
            had_tabs
        });
        Ok(())
    }
}
