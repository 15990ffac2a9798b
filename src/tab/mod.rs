//! Tab tree state: nodes, the registry that owns them, selection, id
//! allocation, and the [`TabTree`] facade that ties them to storage.

mod allocator;
mod manager;
mod node;
mod outline;
mod registry;
mod selection;

pub use allocator::IdAllocator;
pub use manager::TabTree;
pub use node::{Attachment, NodeState, TabHandle, TabNode};
pub use outline::{TabRow, reachable_from_root, visible_rows};
pub use registry::TabRegistry;
pub use selection::SelectionManager;
pub use tabtree_config::{TabId, TabRecord};
