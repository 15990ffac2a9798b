//! JSON file storage.
//!
//! Records are stored at `~/.config/tabtree/tabs.json` unless configured
//! otherwise. Several processes may share one file; changes made by others are
//! picked up through a debounced file watcher.

use super::StorageGateway;
use crate::error::StorageError;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Duration;
use tabtree_config::watcher::FileWatcher;
use tabtree_config::{Snapshot, TabId, TabRecord};

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError {
    let path = path.to_path_buf();
    move |source| StorageError::Io { path, source }
}

/// Store backed by a JSON file.
///
/// A missing or empty file reads as an empty snapshot. Writes replace the file
/// atomically (temp file + rename) and broadcast the new snapshot immediately.
pub struct FileStore {
    path: PathBuf,
    state: Mutex<FileStoreState>,
    watcher: Option<FileWatcher>,
}

#[derive(Default)]
struct FileStoreState {
    subscribers: Vec<Sender<Snapshot>>,
    /// Snapshot most recently sent to subscribers, used to drop echo events
    last_broadcast: Option<Snapshot>,
}

impl FileStoreState {
    fn broadcast(&mut self, snapshot: Snapshot) {
        self.subscribers
            .retain(|tx| tx.send(snapshot.clone()).is_ok());
        self.last_broadcast = Some(snapshot);
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .field("watching", &self.watcher.is_some())
            .finish()
    }
}

impl FileStore {
    /// Open a store at `path` without watching for external changes.
    ///
    /// The file is not touched until the first read or write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(FileStoreState::default()),
            watcher: None,
        }
    }

    /// Open a store at `path` and watch it for changes made by other processes.
    ///
    /// The file is created empty if it does not exist yet, since the watcher
    /// needs something to watch.
    pub fn open_watched(path: impl Into<PathBuf>, debounce_ms: u64) -> Result<Self, StorageError> {
        let mut store = Self::open(path);
        if !store.path.exists() {
            store.write_file(&Snapshot::new())?;
        }
        let watcher = FileWatcher::new(&store.path, debounce_ms)
            .map_err(|e| StorageError::Watch(format!("{e:#}")))?;
        store.watcher = Some(watcher);
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    fn read_file(&self) -> Result<Snapshot, StorageError> {
        if !self.path.exists() {
            return Ok(Snapshot::new());
        }

        let contents = std::fs::read_to_string(&self.path).map_err(io_err(&self.path))?;

        if contents.trim().is_empty() {
            return Ok(Snapshot::new());
        }

        serde_json::from_str(&contents).map_err(|source| StorageError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn write_file(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err(parent))?;
        }

        let contents = serde_json::to_string_pretty(snapshot).map_err(StorageError::Serialize)?;

        // Write to a sibling temp file and rename so readers never see a partial file
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, contents).map_err(io_err(&temp_path))?;
        std::fs::rename(&temp_path, &self.path).map_err(io_err(&self.path))?;

        log::debug!("Wrote {} tab records to {:?}", snapshot.len(), self.path);
        Ok(())
    }

    /// Read-modify-write under the state lock; broadcasts when `change` reports a change.
    fn update(&self, change: impl FnOnce(&mut Snapshot) -> bool) -> Result<(), StorageError> {
        let mut state = self.state.lock();
        let mut snapshot = self.read_file()?;
        if change(&mut snapshot) {
            self.write_file(&snapshot)?;
            state.broadcast(snapshot);
        }
        Ok(())
    }

    /// Re-read the file and broadcast it if it differs from what subscribers last saw.
    ///
    /// Returns true if a snapshot was broadcast.
    pub fn reload(&self) -> Result<bool, StorageError> {
        let mut state = self.state.lock();
        let snapshot = self.read_file()?;
        if state.last_broadcast.as_ref() == Some(&snapshot) {
            return Ok(false);
        }
        log::info!(
            "Store {:?} changed externally ({} records)",
            self.path,
            snapshot.len()
        );
        state.broadcast(snapshot);
        Ok(true)
    }

    /// Handle any pending watcher events without blocking.
    ///
    /// Returns true if a changed snapshot was broadcast.
    pub fn poll_external_changes(&self) -> Result<bool, StorageError> {
        let Some(watcher) = &self.watcher else {
            return Ok(false);
        };

        let mut saw_event = false;
        while watcher.try_recv().is_some() {
            saw_event = true;
        }
        if saw_event { self.reload() } else { Ok(false) }
    }

    /// Block up to `timeout` for an external change.
    ///
    /// Returns true if a changed snapshot was broadcast.
    pub fn wait_for_change(&self, timeout: Duration) -> Result<bool, StorageError> {
        let Some(watcher) = &self.watcher else {
            return Ok(false);
        };

        if watcher.recv_timeout(timeout).is_some() {
            while watcher.try_recv().is_some() {}
            self.reload()
        } else {
            Ok(false)
        }
    }
}

impl StorageGateway for FileStore {
    fn load_snapshot(&self) -> Result<Snapshot, StorageError> {
        let snapshot = self.read_file()?;
        log::info!("Loaded {} tab records from {:?}", snapshot.len(), self.path);
        Ok(snapshot)
    }

    fn subscribe(&self) -> Receiver<Snapshot> {
        let (tx, rx) = channel();
        self.state.lock().subscribers.push(tx);
        rx
    }

    fn write_tab_record(&self, id: TabId, record: TabRecord) -> Result<(), StorageError> {
        self.update(|snapshot| snapshot.tabs.insert(id, record) != Some(record))
    }

    fn remove_tab_record(&self, id: TabId) -> Result<(), StorageError> {
        self.update(|snapshot| snapshot.tabs.remove(&id).is_some())
    }

    fn clear_all(&self) -> Result<(), StorageError> {
        self.update(|snapshot| {
            let had_tabs = !snapshot.is_empty();
            snapshot.tabs.clear();
            had_tabs
        })
    }
}
