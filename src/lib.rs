// Library exports for the tabtree binary, integration tests, and embedding hosts.
//
// State ownership:
//
//   - `ReconciliationEngine` is the only writer of the `TabRegistry` and the
//     `SelectionManager`. Everything else reads through shared references.
//
//   - Storage is the source of truth. `TabTree` writes intents through a
//     `StorageGateway` and applies the echoed snapshots one at a time in
//     arrival order via `TabTree::pump`.
//
//   - Tab nodes are `Rc<RefCell<_>>` handles and never cross threads. Only the
//     storage gateways share state across threads (`parking_lot::Mutex`).

/// Application version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod debug;
mod dispatch;
pub mod error;
pub mod reconcile;
pub mod storage;
pub mod tab;
pub mod tree_view;

pub use error::{StorageError, TabTreeError};
pub use reconcile::{Diagnostic, ReconcileReport, ReconciliationEngine, TabEvent};
pub use storage::{FileStore, MemoryStore, StorageGateway};
pub use tab::{
    Attachment, IdAllocator, SelectionManager, TabHandle, TabId, TabNode, TabRecord, TabRegistry,
    TabRow, TabTree,
};
pub use tabtree_config::{Config, Snapshot};
