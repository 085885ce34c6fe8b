//! Memory blocks and their provenance.
//!
//! A [`MemoryBlock`] describes a run of elements issued by a
//! [`ChainAllocator`](crate::ChainAllocator). It either points into the
//! allocator's pool buffer or owns a heap buffer created when the pool was
//! exhausted. The provenance is an explicit tag, never inferred from
//! addresses.

use std::fmt;

/// Where a [`MemoryBlock`]'s elements live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockOrigin {
    /// No elements; the block was never issued or has been released.
    Empty,
    /// A run of whole rings inside the pool buffer.
    Pool {
        /// Element offset of the first slot within the pool buffer.
        offset: usize,
    },
    /// A separately heap-allocated buffer (pool exhaustion fallback).
    Fallback,
}

/// Backing storage of a block.
pub(crate) enum Storage<T> {
    Empty,
    Pool {
        /// Issuing allocator.
        allocator: crate::AllocatorId,
        /// Allocator clear-generation at issue time.
        generation: u64,
        /// Element offset within the pool buffer.
        offset: usize,
    },
    Fallback {
        /// Allocator that served the request.
        allocator: crate::AllocatorId,
        data: Box<[T]>,
    },
}

/// A contiguous run of `T` issued by a chain allocator.
///
/// The holder owns the block and must hand it back to the issuing
/// allocator exactly once through `dealloc`. After that the block is empty
/// and further deallocation is a no-op. Dropping a pooled block without
/// deallocating it keeps its rings reserved until the allocator is cleared.
///
/// Element access goes through the allocator
/// ([`ChainAllocator::block`](crate::ChainAllocator::block)), because
/// pooled elements live in the allocator's buffer.
#[must_use]
pub struct MemoryBlock<T> {
    pub(crate) storage: Storage<T>,
    /// Number of elements in the block (ring-rounded for pool blocks).
    pub(crate) count: usize,
}

impl<T> MemoryBlock<T> {
    /// An empty block holding no elements.
    pub const fn empty() -> Self {
        Self {
            storage: Storage::Empty,
            count: 0,
        }
    }

    pub(crate) fn pool(
        allocator: crate::AllocatorId,
        generation: u64,
        offset: usize,
        count: usize,
    ) -> Self {
        Self {
            storage: Storage::Pool {
                allocator,
                generation,
                offset,
            },
            count,
        }
    }

    pub(crate) fn fallback(allocator: crate::AllocatorId, data: Box<[T]>) -> Self {
        let count = data.len();
        Self {
            storage: Storage::Fallback { allocator, data },
            count,
        }
    }

    /// Number of elements in the block.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the block holds no elements.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The provenance of this block.
    pub fn origin(&self) -> BlockOrigin {
        match self.storage {
            Storage::Empty => BlockOrigin::Empty,
            Storage::Pool { offset, .. } => BlockOrigin::Pool { offset },
            Storage::Fallback { .. } => BlockOrigin::Fallback,
        }
    }

    /// Whether this block was served from the heap instead of the pool.
    pub fn is_fallback(&self) -> bool {
        matches!(self.storage, Storage::Fallback { .. })
    }

    /// Move the block out, leaving an empty block behind.
    pub(crate) fn take(&mut self) -> Self {
        std::mem::replace(self, Self::empty())
    }
}

impl<T> Default for MemoryBlock<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> fmt::Debug for MemoryBlock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBlock")
            .field("origin", &self.origin())
            .field("count", &self.count)
            .finish()
    }
}

impl<T> fmt::Display for MemoryBlock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin() {
            BlockOrigin::Empty => write!(f, "MemoryBlock(empty)"),
            BlockOrigin::Pool { offset } => {
                write!(f, "MemoryBlock(pool, off={offset}, len={})", self.count)
            }
            BlockOrigin::Fallback => write!(f, "MemoryBlock(fallback, len={})", self.count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AllocatorId;

    #[test]
    fn empty_block() {
        let b: MemoryBlock<u32> = MemoryBlock::empty();
        assert!(b.is_empty());
        assert_eq!(b.origin(), BlockOrigin::Empty);
        assert!(!b.is_fallback());
    }

    #[test]
    fn pool_origin_reports_offset() {
        let b: MemoryBlock<u32> = MemoryBlock::pool(AllocatorId::next(), 0, 16, 8);
        assert_eq!(b.len(), 8);
        assert_eq!(b.origin(), BlockOrigin::Pool { offset: 16 });
        assert_eq!(b.to_string(), "MemoryBlock(pool, off=16, len=8)");
    }

    #[test]
    fn fallback_len_matches_buffer() {
        let b = MemoryBlock::fallback(AllocatorId::next(), vec![0u8; 5].into_boxed_slice());
        assert_eq!(b.len(), 5);
        assert!(b.is_fallback());
    }

    #[test]
    fn take_leaves_empty_block() {
        let mut b: MemoryBlock<u32> = MemoryBlock::pool(AllocatorId::next(), 0, 0, 4);
        let taken = b.take();
        assert_eq!(taken.len(), 4);
        assert!(b.is_empty());
        assert_eq!(b.origin(), BlockOrigin::Empty);
    }
}
