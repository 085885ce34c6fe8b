//! Growable arrays backed by a chain allocator.
//!
//! A [`DynamicArray`] is bound to exactly one
//! [`ChainAllocator`](crate::ChainAllocator) and keeps its elements in a
//! single [`MemoryBlock`] issued by it. Growth allocates a bigger block,
//! moves the live elements across and returns the old block, so slices
//! taken before a growth event must not be held across it.

use std::fmt;

use crate::block::MemoryBlock;
use crate::chain::ChainAllocator;
use crate::id::AllocatorId;

/// An automatically growing sequence stored in a chain allocator's pool.
///
/// The array does not keep a reference to its allocator: it remembers the
/// allocator's [`AllocatorId`] when bound and every operation takes the
/// allocator as an argument. Appending grows capacity geometrically
/// (`max(capacity * 2, len + added)`); removal comes in an O(1) unordered
/// flavour ([`swap_remove`](Self::swap_remove)) and an O(n) ordered one
/// ([`remove`](Self::remove)).
///
/// Dropping a bound array without calling [`clear`](Self::clear) leaves its
/// rings reserved until the allocator itself is cleared or dropped.
/// A heap fallback block is freed by the drop but stays counted in
/// [`ChainAllocator::live_fallback_count`].
///
/// # Panics
///
/// Every operation that takes an allocator panics if the array is unbound
/// or bound to a different allocator. Index-taking operations panic when
/// the index is not below [`len`](Self::len).
///
/// # Example
///
/// ```
/// use mapedit_alloc::{ChainAllocator, ChainConfig, DynamicArray};
///
/// let mut pool: ChainAllocator<i32> = ChainAllocator::new(ChainConfig::new(64)).unwrap();
/// let mut values = DynamicArray::bound_to(&pool);
/// values.push(&mut pool, 10);
/// values.push(&mut pool, 20);
/// values.push(&mut pool, 30);
/// let removed = values.swap_remove(&mut pool, 0);
/// assert_eq!(removed, 10);
/// assert_eq!(values.as_slice(&pool), &[30, 20]);
/// values.clear(&mut pool);
/// ```
pub struct DynamicArray<T> {
    allocator: Option<AllocatorId>,
    block: MemoryBlock<T>,
    /// Number of live elements, never above `block.len()`.
    len: usize,
}

impl<T> DynamicArray<T> {
    /// An unbound, empty array. Call [`init`](Self::init) before use.
    pub const fn new() -> Self {
        Self {
            allocator: None,
            block: MemoryBlock::empty(),
            len: 0,
        }
    }

    /// An empty array bound to `allocator`.
    pub fn bound_to(allocator: &ChainAllocator<T>) -> Self {
        let mut array = Self::new();
        array.init(allocator);
        array
    }

    /// Bind the array to `allocator`.
    ///
    /// # Panics
    ///
    /// Panics if the array is already bound.
    pub fn init(&mut self, allocator: &ChainAllocator<T>) {
        if let Some(bound) = self.allocator {
            panic!("dynamic array already bound to chain allocator {bound}");
        }
        self.allocator = Some(allocator.id());
    }

    /// Whether [`init`](Self::init) has been called.
    pub fn is_bound(&self) -> bool {
        self.allocator.is_some()
    }

    /// The allocator this array is bound to, if any.
    pub fn allocator_id(&self) -> Option<AllocatorId> {
        self.allocator
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array holds no live elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the current block can hold.
    pub fn capacity(&self) -> usize {
        self.block.len()
    }

    /// The block currently backing the array.
    pub fn block(&self) -> &MemoryBlock<T> {
        &self.block
    }

    /// The live elements.
    ///
    /// The slice is contiguous and valid until the next mutation.
    pub fn as_slice<'a>(&'a self, allocator: &'a ChainAllocator<T>) -> &'a [T] {
        self.check_binding(allocator);
        &allocator.block(&self.block)[..self.len]
    }

    /// The live elements, mutably.
    pub fn as_mut_slice<'a>(&'a mut self, allocator: &'a mut ChainAllocator<T>) -> &'a mut [T] {
        self.check_binding(allocator);
        let len = self.len;
        &mut allocator.block_mut(&mut self.block)[..len]
    }

    /// Iterate over the live elements.
    pub fn iter<'a>(&'a self, allocator: &'a ChainAllocator<T>) -> std::slice::Iter<'a, T> {
        self.as_slice(allocator).iter()
    }

    /// The element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn get<'a>(&'a self, allocator: &'a ChainAllocator<T>, index: usize) -> &'a T {
        self.check_index(index);
        &self.as_slice(allocator)[index]
    }

    /// The element at `index`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn get_mut<'a>(
        &'a mut self,
        allocator: &'a mut ChainAllocator<T>,
        index: usize,
    ) -> &'a mut T {
        self.check_index(index);
        &mut self.as_mut_slice(allocator)[index]
    }

    fn check_binding(&self, allocator: &ChainAllocator<T>) {
        match self.allocator {
            None => panic!("dynamic array used before init"),
            Some(bound) => assert!(
                bound == allocator.id(),
                "dynamic array bound to chain allocator {bound} used with allocator {}",
                allocator.id()
            ),
        }
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.len,
            "index {index} out of bounds for dynamic array of length {}",
            self.len
        );
    }
}

impl<T: Default> DynamicArray<T> {
    /// Make room for at least `new_capacity` elements in total.
    ///
    /// No-op if the capacity already suffices. Otherwise a new block is
    /// allocated, the live elements are moved into it and the old block is
    /// returned to the allocator.
    pub fn reserve(&mut self, allocator: &mut ChainAllocator<T>, new_capacity: usize) {
        self.check_binding(allocator);
        if new_capacity <= self.capacity() {
            return;
        }
        let mut new_block = allocator.alloc(new_capacity);
        allocator.relocate(&mut self.block, &mut new_block, self.len);
        allocator.dealloc(&mut self.block);
        self.block = new_block;
    }

    /// Append one element and return a reference to it.
    pub fn push<'a>(&'a mut self, allocator: &'a mut ChainAllocator<T>, value: T) -> &'a mut T {
        self.grow_for(allocator, 1);
        let index = self.len;
        self.len += 1;
        let slot = &mut allocator.block_mut(&mut self.block)[index];
        *slot = value;
        slot
    }

    /// Append clones of `values`.
    pub fn extend_from_slice(&mut self, allocator: &mut ChainAllocator<T>, values: &[T])
    where
        T: Clone,
    {
        if values.is_empty() {
            self.check_binding(allocator);
            return;
        }
        self.grow_for(allocator, values.len());
        let start = self.len;
        allocator.block_mut(&mut self.block)[start..start + values.len()].clone_from_slice(values);
        self.len += values.len();
    }

    /// Append `count` default-initialised elements and return them.
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero.
    pub fn push_zeroed<'a>(
        &'a mut self,
        allocator: &'a mut ChainAllocator<T>,
        count: usize,
    ) -> &'a mut [T] {
        assert!(count > 0, "push_zeroed of 0 elements");
        self.grow_for(allocator, count);
        let start = self.len;
        self.len += count;
        let added = &mut allocator.block_mut(&mut self.block)[start..start + count];
        added.fill_with(T::default);
        added
    }

    /// Remove the element at `index` by moving the last element into its
    /// place. O(1); does not preserve order.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn swap_remove(&mut self, allocator: &mut ChainAllocator<T>, index: usize) -> T {
        self.check_binding(allocator);
        self.check_index(index);
        let last = self.len - 1;
        let slots = allocator.block_mut(&mut self.block);
        slots.swap(index, last);
        self.len = last;
        std::mem::take(&mut slots[last])
    }

    /// Remove the element at `index`, shifting everything after it down by
    /// one. O(n); preserves order.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn remove(&mut self, allocator: &mut ChainAllocator<T>, index: usize) -> T {
        self.check_binding(allocator);
        self.check_index(index);
        let last = self.len - 1;
        let slots = allocator.block_mut(&mut self.block);
        slots[index..=last].rotate_left(1);
        self.len = last;
        std::mem::take(&mut slots[last])
    }

    /// Drop every live element and return the block to the allocator.
    ///
    /// The array stays bound and can be reused.
    pub fn clear(&mut self, allocator: &mut ChainAllocator<T>) {
        self.check_binding(allocator);
        let len = self.len;
        for slot in &mut allocator.block_mut(&mut self.block)[..len] {
            drop(std::mem::take(slot));
        }
        allocator.dealloc(&mut self.block);
        self.len = 0;
    }

    fn grow_for(&mut self, allocator: &mut ChainAllocator<T>, additional: usize) {
        let needed = self.len + additional;
        if needed > self.capacity() {
            self.reserve(allocator, (self.capacity() * 2).max(needed));
        } else {
            self.check_binding(allocator);
        }
    }
}

impl<T: bytemuck::Pod> DynamicArray<T> {
    /// The live elements as raw bytes, for handing to a renderer or writer.
    pub fn as_bytes<'a>(&'a self, allocator: &'a ChainAllocator<T>) -> &'a [u8] {
        bytemuck::cast_slice(self.as_slice(allocator))
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicArray")
            .field("allocator", &self.allocator)
            .field("len", &self.len)
            .field("block", &self.block)
            .finish()
    }
}
