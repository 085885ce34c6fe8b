//! Integration test: pool-level guarantees seen from outside the crate.
//!
//! Covers pointer stability of issued blocks under unrelated churn, the
//! exhaustion fallback path, and the reuse of rings released by arrays.

use mapedit_alloc::{BlockOrigin, ChainAllocator, ChainConfig, DynamicArray, MemoryBlock};

fn pool(capacity: usize, ring: usize) -> ChainAllocator<i32> {
    ChainAllocator::new(ChainConfig::new(capacity).with_ring_element_count(ring)).unwrap()
}

#[test]
fn block_address_and_contents_survive_unrelated_churn() {
    let mut a = pool(256, 4);
    let mut anchor = a.alloc(10);
    a.block_mut(&mut anchor)
        .iter_mut()
        .enumerate()
        .for_each(|(i, v)| *v = i as i32 * 3);
    let ptr = a.block(&anchor).as_ptr();
    let snapshot: Vec<i32> = a.block(&anchor).to_vec();

    let mut others: Vec<MemoryBlock<i32>> = Vec::new();
    for round in 0..50 {
        others.push(a.alloc(1 + round % 7));
        if round % 3 == 0 {
            let mut victim = others.remove(0);
            a.dealloc(&mut victim);
        }
    }
    // Force at least one heap fallback as well.
    let mut spill = a.alloc(1000);
    assert!(spill.is_fallback());

    assert_eq!(a.block(&anchor).as_ptr(), ptr);
    assert_eq!(a.block(&anchor), snapshot.as_slice());

    a.dealloc(&mut spill);
    for mut b in others {
        a.dealloc(&mut b);
    }
    assert_eq!(a.block(&anchor), snapshot.as_slice());
}

#[test]
fn int32_pool_example_from_ring_of_eight() {
    let mut a = pool(64, 8);

    let first = a.alloc(5);
    assert_eq!(first.len(), 8);
    assert_eq!(first.origin(), BlockOrigin::Pool { offset: 0 });
    assert!(a.block(&first).iter().all(|&v| v == 0));

    let mut second = a.alloc(64);
    assert!(second.is_fallback());
    assert_eq!(second.len(), 64);
    assert!(a.block(&second).iter().all(|&v| v == 0));

    a.dealloc(&mut second);
    assert!(a.is_ring_used(0));
    assert_eq!(a.used_ring_count(), 1);
}

#[test]
fn requests_within_free_run_never_fall_back() {
    let mut a = pool(64, 1);
    let mut blocks = Vec::new();
    for _ in 0..8 {
        blocks.push(a.alloc(8));
    }
    assert!(blocks.iter().all(|b| !b.is_fallback()));
    assert_eq!(a.total_fallback_count(), 0);
    assert_eq!(a.free_ring_count(), 0);
}

#[test]
fn array_growth_keeps_earlier_values() {
    let mut a = pool(4096, 1);
    let mut array = DynamicArray::bound_to(&a);
    for i in 0..1000 {
        array.push(&mut a, i);
    }
    assert_eq!(array.len(), 1000);
    assert!(array.capacity() >= 1000);
    assert!(array.iter(&a).copied().eq(0..1000));
}

#[test]
fn data_pointer_changes_only_on_growth() {
    let mut a = pool(256, 1);
    let mut array = DynamicArray::bound_to(&a);
    array.reserve(&mut a, 4);
    let before = array.as_slice(&a).as_ptr();
    for i in 0..4 {
        array.push(&mut a, i);
    }
    assert_eq!(array.as_slice(&a).as_ptr(), before);
    array.push(&mut a, 4);
    assert_ne!(array.as_slice(&a).as_ptr(), before);
}

#[test]
fn cleared_array_rings_are_immediately_reusable() {
    let mut a = pool(32, 8);
    let mut array = DynamicArray::bound_to(&a);
    array.extend_from_slice(&mut a, &[1; 32]);
    assert_eq!(a.free_ring_count(), 0);

    array.clear(&mut a);
    assert_eq!(array.len(), 0);

    let reuse = a.alloc(32);
    assert_eq!(reuse.origin(), BlockOrigin::Pool { offset: 0 });
}

#[test]
fn arrays_sharing_a_pool_stay_independent() {
    let mut a = pool(128, 2);
    let mut evens = DynamicArray::bound_to(&a);
    let mut odds = DynamicArray::bound_to(&a);
    for i in 0..20 {
        if i % 2 == 0 {
            evens.push(&mut a, i);
        } else {
            odds.push(&mut a, i);
        }
    }
    assert!(evens.iter(&a).all(|v| v % 2 == 0));
    assert!(odds.iter(&a).all(|v| v % 2 == 1));
    assert_eq!(evens.len() + odds.len(), 20);

    evens.clear(&mut a);
    odds.clear(&mut a);
    assert_eq!(a.used_ring_count(), 0);
}
