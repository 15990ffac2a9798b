//! Typed error types for the tabtree engine.
//!
//! Callers at the crate boundary can match on specific variants instead of
//! relying on opaque `anyhow` strings. Reconciliation anomalies that do not
//! abort a pass are not errors; see [`crate::reconcile::Diagnostic`].

use std::path::PathBuf;
use tabtree_config::TabId;
use thiserror::Error;

/// Failures raised by a [`crate::storage::StorageGateway`] implementation.
#[derive(Debug, Error)]
pub enum StorageError {
    // -----------------------------------------------------------------------
    // File store
    // -----------------------------------------------------------------------
    /// The store file or its directory could not be read or written.
    #[error("Store I/O failed for '{path}': {source}")]
    Io {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The store file exists but does not contain a valid snapshot.
    #[error("Store file '{path}' is corrupt: {source}")]
    Parse {
        /// Path to the corrupt file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A snapshot could not be encoded for writing.
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The change watcher for the store file could not be started.
    #[error("Store watcher failed: {0}")]
    Watch(String),
}

/// Errors returned by the reconciliation engine and the [`crate::TabTree`] facade.
#[derive(Debug, Error)]
pub enum TabTreeError {
    /// A node was created for an id the registry already holds.
    #[error("Tab {0} already exists in the registry")]
    DuplicateCreate(TabId),

    /// An operation named a tab that is not in the registry.
    #[error("Unknown tab {0}")]
    UnknownTab(TabId),

    /// Re-parenting would place a tab under itself or one of its descendants.
    #[error("Cannot move tab {id} under {parent}: it would create a cycle")]
    WouldCycle {
        /// Tab being moved.
        id: TabId,
        /// Requested new parent.
        parent: TabId,
    },

    /// The storage gateway failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
