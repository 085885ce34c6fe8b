//! Allocator identity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`AllocatorId`] allocation.
static ALLOCATOR_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a [`ChainAllocator`](crate::ChainAllocator).
///
/// Allocated from a monotonic atomic counter via [`AllocatorId::next`].
/// Pool blocks and arrays remember the id of the allocator they came from,
/// so handing them to a different allocator is caught instead of freeing
/// rings that belong to someone else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AllocatorId(u64);

impl AllocatorId {
    /// Allocate a fresh, unique allocator ID.
    ///
    /// Each call returns an ID never returned before within this process.
    pub fn next() -> Self {
        Self(ALLOCATOR_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for AllocatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
