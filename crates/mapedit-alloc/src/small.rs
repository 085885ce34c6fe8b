//! Growable arrays with inline small-buffer storage.
//!
//! [`SmallBuffer`] serves small, frequently resized bookkeeping collections
//! (per-frame hover and visibility flags) that are not worth a pool. It
//! starts in an inline buffer of `N` elements and moves to the heap the
//! first time it needs more. Once on the heap it stays there.

use std::fmt;
use std::ops::{Deref, DerefMut};

use smallvec::SmallVec;

/// A growable array with `N` elements of inline storage.
///
/// Spilling to the heap is permanent: clearing or truncating keeps the
/// heap buffer, and nothing ever shrinks storage back inline. Heap growth
/// doubles the capacity. Slices are stable only until the next growth.
pub struct SmallBuffer<T, const N: usize> {
    items: SmallVec<[T; N]>,
}

impl<T, const N: usize> SmallBuffer<T, N> {
    /// Inline capacity.
    pub const INLINE_CAPACITY: usize = N;

    /// An empty buffer using inline storage.
    pub fn new() -> Self {
        Self {
            items: SmallVec::new(),
        }
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current capacity: `N` while inline, the heap capacity afterwards.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Whether storage has moved to the heap.
    pub fn is_spilled(&self) -> bool {
        self.items.spilled()
    }

    /// Append an element.
    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    /// Make room for at least `new_capacity` elements in total.
    pub fn reserve(&mut self, new_capacity: usize) {
        let additional = new_capacity.saturating_sub(self.items.len());
        self.items.reserve(additional);
    }

    /// Remove the element at `index`, shifting later elements down.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn remove_index(&mut self, index: usize) -> T {
        self.check_index(index);
        self.items.remove(index)
    }

    /// Remove the element at `index` by moving the last element into its
    /// place.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn swap_remove(&mut self, index: usize) -> T {
        self.check_index(index);
        self.items.swap_remove(index)
    }

    /// Drop every element. Heap storage, if any, is kept.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Shorten the buffer to `len` elements. Storage is kept.
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    /// Resize to `new_len`, filling new slots with `T::default()`.
    pub fn resize_default(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.items.resize_with(new_len, T::default);
    }

    /// The elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// The elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.items.len(),
            "index {index} out of bounds for small buffer of length {}",
            self.items.len()
        );
    }
}

impl<T, const N: usize> Default for SmallBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Deref for SmallBuffer<T, N> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, const N: usize> DerefMut for SmallBuffer<T, N> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for SmallBuffer<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_inline() {
        let buf: SmallBuffer<u8, 4> = SmallBuffer::new();
        assert!(!buf.is_spilled());
        assert_eq!(buf.capacity(), 4);
        assert!(buf.is_empty());
    }

    #[test]
    fn stays_inline_up_to_n() {
        let mut buf: SmallBuffer<u8, 4> = SmallBuffer::new();
        for i in 0..4 {
            buf.push(i);
        }
        assert!(!buf.is_spilled());
        assert_eq!(buf.as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn spills_past_n_and_keeps_values() {
        let mut buf: SmallBuffer<u8, 4> = SmallBuffer::new();
        for i in 0..5 {
            buf.push(i);
        }
        assert!(buf.is_spilled());
        assert!(buf.capacity() >= 5);
        assert_eq!(buf.as_slice(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn never_reverts_to_inline() {
        let mut buf: SmallBuffer<u8, 4> = SmallBuffer::new();
        buf.resize_default(10);
        let cap = buf.capacity();
        buf.clear();
        assert!(buf.is_spilled());
        assert_eq!(buf.capacity(), cap);
        buf.resize_default(2);
        buf.truncate(0);
        assert!(buf.is_spilled());
    }

    #[test]
    fn heap_growth_doubles() {
        let mut buf: SmallBuffer<u32, 2> = SmallBuffer::new();
        buf.resize_default(3);
        let cap = buf.capacity();
        buf.resize_default(cap + 1);
        assert!(buf.capacity() >= cap * 2);
    }

    #[test]
    fn resize_default_zero_fills_new_slots() {
        let mut buf: SmallBuffer<u8, 8> = SmallBuffer::new();
        buf.push(9);
        buf.resize_default(3);
        assert_eq!(buf.as_slice(), &[9, 0, 0]);
        buf.resize_default(1);
        assert_eq!(buf.as_slice(), &[9]);
    }

    #[test]
    fn clear_inline_keeps_inline_capacity() {
        let mut buf: SmallBuffer<u8, 8> = SmallBuffer::new();
        buf.push(1);
        buf.clear();
        assert_eq!(buf.capacity(), 8);
        assert!(buf.is_empty());
    }

    #[test]
    fn removal_flavours() {
        let mut buf: SmallBuffer<u8, 8> = SmallBuffer::new();
        for v in [10, 20, 30, 40] {
            buf.push(v);
        }
        assert_eq!(buf.remove_index(0), 10);
        assert_eq!(buf.as_slice(), &[20, 30, 40]);
        assert_eq!(buf.swap_remove(0), 20);
        assert_eq!(buf.as_slice(), &[40, 30]);
    }

    #[test]
    fn reserve_spills_when_asked_beyond_inline() {
        let mut buf: SmallBuffer<u8, 4> = SmallBuffer::new();
        buf.reserve(4);
        assert!(!buf.is_spilled());
        buf.reserve(16);
        assert!(buf.is_spilled());
        assert!(buf.capacity() >= 16);
    }

    #[test]
    fn deref_gives_slice_access() {
        let mut buf: SmallBuffer<u8, 4> = SmallBuffer::new();
        buf.resize_default(2);
        buf[1] = 7;
        assert_eq!(buf.iter().copied().max(), Some(7));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn remove_out_of_bounds_panics() {
        let mut buf: SmallBuffer<u8, 4> = SmallBuffer::new();
        buf.remove_index(0);
    }
}
