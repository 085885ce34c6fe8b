//! The ring-pooled chain allocator.
//!
//! A [`ChainAllocator`] pre-allocates one buffer for up to
//! `element_count_max` elements and splits it into rings of
//! `ring_element_count` elements. A bitmap with one flag per ring tracks
//! which rings are in use. Requests are served first-fit from the first run
//! of free rings that is long enough; a chain of rings, hence the name.
//!
//! The buffer is allocated once and never moved or resized, so a pooled
//! block stays where it is until it is deallocated. When no run is long
//! enough the request is served from a separate zero-filled heap buffer.

use std::fmt;

use log::{debug, warn};

use crate::block::{MemoryBlock, Storage};
use crate::config::ChainConfig;
use crate::error::ConfigError;
use crate::id::AllocatorId;

/// Bitmap value of a free ring.
const RING_FREE: u8 = 0x00;
/// Bitmap value of a ring that belongs to a live block.
const RING_USED: u8 = 0xFF;
/// Number of bitmap entries inspected at once by the scan fast path.
const SCAN_WINDOW: usize = 8;
const WINDOW_FREE: u64 = 0;
const WINDOW_USED: u64 = u64::MAX;

/// Fixed-capacity, pointer-stable pool allocator for `T`.
///
/// Every issued block is zero-initialised (filled with `T::default()`).
/// Freeing only flips ring flags back to free, so adjacent free rings
/// merge implicitly and no coalescing step exists.
///
/// # Contract
///
/// - `alloc(0)` panics.
/// - Blocks must be returned to the allocator that issued them; a block
///   from another allocator panics.
/// - [`clear`](Self::clear) invalidates every outstanding pool block. Using
///   or deallocating such a block afterwards panics.
///
/// # Example
///
/// ```
/// use mapedit_alloc::{ChainAllocator, ChainConfig};
///
/// let mut pool: ChainAllocator<i32> =
///     ChainAllocator::new(ChainConfig::new(64).with_ring_element_count(8)).unwrap();
/// let mut block = pool.alloc(5);
/// assert_eq!(block.len(), 8);
/// pool.block_mut(&mut block)[0] = 7;
/// assert_eq!(pool.block(&block)[0], 7);
/// pool.dealloc(&mut block);
/// assert!(block.is_empty());
/// ```
pub struct ChainAllocator<T> {
    id: AllocatorId,
    /// Bumped by `clear()`; pool blocks from older generations are stale.
    generation: u64,
    /// One flag per ring: `RING_FREE` or `RING_USED`, never anything else.
    rings: Box<[u8]>,
    /// Element storage. Allocated once at construction, never resized.
    buffer: Box<[T]>,
    ring_element_count: usize,
    used_rings: usize,
    live_fallbacks: usize,
    total_fallbacks: u64,
}

impl<T: Default> ChainAllocator<T> {
    /// Create an allocator and reserve its whole pool.
    ///
    /// All rings start free.
    pub fn new(config: ChainConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let buffer: Box<[T]> = std::iter::repeat_with(T::default)
            .take(config.element_count_max)
            .collect();
        let allocator = Self {
            id: AllocatorId::next(),
            generation: 0,
            rings: vec![RING_FREE; config.ring_count()].into_boxed_slice(),
            buffer,
            ring_element_count: config.ring_element_count,
            used_rings: 0,
            live_fallbacks: 0,
            total_fallbacks: 0,
        };
        debug!(
            "chain allocator {} ready: {} elements in {} rings of {}, {} bytes reserved",
            allocator.id,
            allocator.capacity(),
            allocator.ring_count(),
            allocator.ring_element_count,
            allocator.allocated_size()
        );
        Ok(allocator)
    }

    /// Allocate `count` contiguous, zero-initialised elements.
    ///
    /// The request is rounded up to whole rings and placed at the first
    /// free run that fits. If there is none, a heap block of exactly
    /// `count` elements is returned instead and a warning is logged.
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero.
    pub fn alloc(&mut self, count: usize) -> MemoryBlock<T> {
        assert!(count > 0, "chain allocator {}: alloc of 0 elements", self.id);
        let rings_needed = count.div_ceil(self.ring_element_count);

        if let Some(first_ring) = self.find_free_run(rings_needed) {
            self.rings[first_ring..first_ring + rings_needed].fill(RING_USED);
            self.used_rings += rings_needed;

            let offset = first_ring * self.ring_element_count;
            let len = rings_needed * self.ring_element_count;
            self.buffer[offset..offset + len].fill_with(T::default);
            return MemoryBlock::pool(self.id, self.generation, offset, len);
        }

        warn!(
            "chain allocator {} exhausted: {count} elements requested, {} of {} rings free; \
             falling back to the heap",
            self.id,
            self.free_ring_count(),
            self.ring_count()
        );
        self.live_fallbacks += 1;
        self.total_fallbacks += 1;
        let data: Box<[T]> = std::iter::repeat_with(T::default).take(count).collect();
        MemoryBlock::fallback(self.id, data)
    }

    /// Allocate a single element (rounded up to one ring).
    pub fn alloc_one(&mut self) -> MemoryBlock<T> {
        self.alloc(1)
    }

    /// Move the first `count` elements of `from` into `to`.
    ///
    /// The vacated slots of `from` are left holding `T::default()`.
    pub(crate) fn relocate(
        &mut self,
        from: &mut MemoryBlock<T>,
        to: &mut MemoryBlock<T>,
        count: usize,
    ) {
        assert!(
            count <= from.len() && count <= to.len(),
            "chain allocator {}: relocating {count} elements between blocks of {} and {}",
            self.id,
            from.len(),
            to.len()
        );
        for i in 0..count {
            let value = std::mem::take(&mut self.block_mut(from)[i]);
            self.block_mut(to)[i] = value;
        }
    }
}

impl<T> ChainAllocator<T> {
    /// Return a block to the allocator.
    ///
    /// Pool blocks release their rings; heap fallback blocks are dropped
    /// without touching the bitmap. The block is left empty, so a second
    /// call is a no-op.
    pub fn dealloc(&mut self, block: &mut MemoryBlock<T>) {
        if block.is_empty() {
            return;
        }
        let MemoryBlock { storage, count } = block.take();
        match storage {
            Storage::Empty => {}
            Storage::Pool {
                allocator,
                generation,
                offset,
            } => {
                self.check_pool_block(allocator, generation);
                let first_ring = offset / self.ring_element_count;
                let ring_count = count / self.ring_element_count;
                self.rings[first_ring..first_ring + ring_count].fill(RING_FREE);
                self.used_rings -= ring_count;
            }
            Storage::Fallback { allocator, data } => {
                self.check_owner(allocator);
                self.live_fallbacks -= 1;
                drop(data);
            }
        }
    }

    /// Return a block obtained from [`alloc_one`](Self::alloc_one).
    pub fn dealloc_one(&mut self, mut block: MemoryBlock<T>) {
        self.dealloc(&mut block);
    }

    /// Mark every ring free without looking at outstanding blocks.
    ///
    /// All pool blocks issued so far become stale. Heap fallback blocks are
    /// unaffected and still have to be deallocated by their holders.
    pub fn clear(&mut self) {
        self.rings.fill(RING_FREE);
        self.used_rings = 0;
        self.generation += 1;
        debug!(
            "chain allocator {} cleared (generation {})",
            self.id, self.generation
        );
    }

    /// Shared view of a block's elements.
    ///
    /// # Panics
    ///
    /// Panics if the block was issued by another allocator, or is a pool
    /// block issued before the last [`clear`](Self::clear).
    pub fn block<'a>(&'a self, block: &'a MemoryBlock<T>) -> &'a [T] {
        match &block.storage {
            Storage::Empty => &[],
            Storage::Pool {
                allocator,
                generation,
                offset,
            } => {
                self.check_pool_block(*allocator, *generation);
                &self.buffer[*offset..*offset + block.count]
            }
            Storage::Fallback { allocator, data } => {
                self.check_owner(*allocator);
                &data[..]
            }
        }
    }

    /// Mutable view of a block's elements.
    ///
    /// # Panics
    ///
    /// Same conditions as [`block`](Self::block).
    pub fn block_mut<'a>(&'a mut self, block: &'a mut MemoryBlock<T>) -> &'a mut [T] {
        let count = block.count;
        match &mut block.storage {
            Storage::Empty => &mut [],
            Storage::Pool {
                allocator,
                generation,
                offset,
            } => {
                self.check_pool_block(*allocator, *generation);
                &mut self.buffer[*offset..*offset + count]
            }
            Storage::Fallback { allocator, data } => {
                self.check_owner(*allocator);
                &mut data[..]
            }
        }
    }

    /// This allocator's identity.
    pub fn id(&self) -> AllocatorId {
        self.id
    }

    /// Pool capacity in elements.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Elements per ring.
    pub fn ring_element_count(&self) -> usize {
        self.ring_element_count
    }

    /// Total number of rings.
    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// Number of rings held by live pool blocks.
    pub fn used_ring_count(&self) -> usize {
        self.used_rings
    }

    /// Number of free rings (not necessarily contiguous).
    pub fn free_ring_count(&self) -> usize {
        self.rings.len() - self.used_rings
    }

    /// Whether ring `index` belongs to a live pool block.
    ///
    /// # Panics
    ///
    /// Panics if `index >= ring_count()`.
    pub fn is_ring_used(&self, index: usize) -> bool {
        self.rings[index] == RING_USED
    }

    /// Heap fallback blocks issued and not yet returned through
    /// [`dealloc`](Self::dealloc).
    ///
    /// A fallback block that is dropped instead of deallocated frees its
    /// memory but stays counted here; the allocator cannot observe the drop.
    pub fn live_fallback_count(&self) -> usize {
        self.live_fallbacks
    }

    /// Heap fallback blocks issued over the allocator's lifetime.
    pub fn total_fallback_count(&self) -> u64 {
        self.total_fallbacks
    }

    /// Bytes reserved up front: the ring bitmap plus the element buffer.
    pub fn allocated_size(&self) -> usize {
        self.rings.len() * std::mem::size_of::<u8>()
            + self.buffer.len() * std::mem::size_of::<T>()
    }

    /// First-fit search for `rings_needed` contiguous free rings.
    ///
    /// Windows of eight entries that are all free or all used are consumed
    /// in one step; mixed windows fall back to one entry at a time. The
    /// chosen run is the same as a plain entry-by-entry scan would pick.
    fn find_free_run(&self, rings_needed: usize) -> Option<usize> {
        let total = self.rings.len();
        if rings_needed > total {
            return None;
        }

        let mut run_start = 0;
        let mut run_len = 0;
        let mut i = 0;
        while i < total {
            match self.window(i) {
                Some(WINDOW_FREE) => {
                    let step = (rings_needed - run_len).min(SCAN_WINDOW);
                    run_len += step;
                    i += step;
                }
                Some(WINDOW_USED) => {
                    i += SCAN_WINDOW;
                    run_start = i;
                    run_len = 0;
                    continue;
                }
                _ => {
                    i += 1;
                    if self.rings[i - 1] == RING_USED {
                        run_start = i;
                        run_len = 0;
                        continue;
                    }
                    run_len += 1;
                }
            }
            if run_len >= rings_needed {
                return Some(run_start);
            }
        }
        None
    }

    /// Eight bitmap entries starting at `i`, if that many remain.
    fn window(&self, i: usize) -> Option<u64> {
        self.rings
            .get(i..i + SCAN_WINDOW)
            .and_then(|w| <[u8; SCAN_WINDOW]>::try_from(w).ok())
            .map(u64::from_ne_bytes)
    }

    fn check_owner(&self, allocator: AllocatorId) {
        assert!(
            allocator == self.id,
            "block issued by chain allocator {allocator} used with allocator {}",
            self.id
        );
    }

    fn check_pool_block(&self, allocator: AllocatorId, generation: u64) {
        self.check_owner(allocator);
        assert!(
            generation == self.generation,
            "stale block: issued in generation {generation} of chain allocator {}, now {}",
            self.id,
            self.generation
        );
    }
}

impl<T> fmt::Debug for ChainAllocator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainAllocator")
            .field("id", &self.id)
            .field("generation", &self.generation)
            .field("capacity", &self.capacity())
            .field("ring_element_count", &self.ring_element_count)
            .field("used_rings", &self.used_rings)
            .field("live_fallbacks", &self.live_fallbacks)
            .finish()
    }
}

impl<T> Drop for ChainAllocator<T> {
    fn drop(&mut self) {
        if self.used_rings > 0 || self.live_fallbacks > 0 {
            debug!(
                "chain allocator {} torn down with {} rings and {} fallback blocks outstanding",
                self.id, self.used_rings, self.live_fallbacks
            );
        }
    }
}
