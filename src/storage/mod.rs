//! Storage gateways holding the canonical tab records.
//!
//! Storage is the single source of truth. The engine writes intents through a
//! [`StorageGateway`] and learns about the result only from the snapshots the
//! gateway delivers on its subscription channel, including snapshots caused
//! by its own writes.
//!
//! - [`MemoryStore`]: shared in-process store; clones are views of one store
//! - [`FileStore`]: JSON file on disk with change watching

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StorageError;
use std::sync::mpsc::Receiver;
use tabtree_config::{Snapshot, TabId, TabRecord};

/// Narrow interface to the backing store.
pub trait StorageGateway {
    /// Current full snapshot.
    fn load_snapshot(&self) -> Result<Snapshot, StorageError>;

    /// Register for change notifications.
    ///
    /// Every change delivers the full snapshot, in the order changes happened.
    fn subscribe(&self) -> Receiver<Snapshot>;

    /// Insert or replace the record for `id`.
    fn write_tab_record(&self, id: TabId, record: TabRecord) -> Result<(), StorageError>;

    /// Delete the record for `id`. Deleting a missing id is not an error.
    fn remove_tab_record(&self, id: TabId) -> Result<(), StorageError>;

    /// Delete every record.
    fn clear_all(&self) -> Result<(), StorageError>;
}

/// Shared handles forward to the store they point at, so a caller can keep
/// using a concrete store after handing a clone to a [`crate::TabTree`].
impl<T: StorageGateway + ?Sized> StorageGateway for std::rc::Rc<T> {
    fn load_snapshot(&self) -> Result<Snapshot, StorageError> {
        (**self).load_snapshot()
    }

    fn subscribe(&self) -> Receiver<Snapshot> {
        (**self).subscribe()
    }

    fn write_tab_record(&self, id: TabId, record: TabRecord) -> Result<(), StorageError> {
        (**self).write_tab_record(id, record)
    }

    fn remove_tab_record(&self, id: TabId) -> Result<(), StorageError> {
        (**self).remove_tab_record(id)
    }

    fn clear_all(&self) -> Result<(), StorageError> {
        (**self).clear_all()
    }
}
