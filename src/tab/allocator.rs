//! Free tab id allocation.

use tabtree_config::{Snapshot, TabId};

/// Picks ids for new tabs.
///
/// The id is only free with respect to the snapshot it was computed from. Two
/// views allocating from the same stale snapshot can pick the same id before
/// either write lands; nothing here detects that.
pub struct IdAllocator;

impl IdAllocator {
    /// Smallest non-negative id not used as a key in `snapshot`.
    pub fn allocate(snapshot: &Snapshot) -> TabId {
        let mut candidate: TabId = 0;
        // Keys are sorted, so the first gap is the answer
        for id in snapshot.ids() {
            if id != candidate {
                break;
            }
            candidate += 1;
        }
        candidate
    }
}
