//! Benchmark profiles for the mapedit allocator and document model.
//!
//! - [`reference_budget`]: pools sized for a typical map.
//! - [`stress_budget`]: pools sized so churn workloads run near exhaustion.
//! - [`request_sizes`]: deterministic allocation sizes from a seed.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use mapedit_alloc::ChainConfig;
use mapedit_doc::DocumentBudget;

/// Pools sized for a typical map: the default budget.
pub fn reference_budget() -> DocumentBudget {
    DocumentBudget::default()
}

/// Tight pools: roughly one default map's worth of tiles and a few hundred
/// quads, so sustained churn exercises long bitmap scans and the heap
/// fallback.
pub fn stress_budget() -> DocumentBudget {
    DocumentBudget {
        tiles: ChainConfig::new(4096).with_ring_element_count(64),
        quads: ChainConfig::new(512).with_ring_element_count(8),
        ..DocumentBudget::default()
    }
}

/// `n` request sizes in `1..=max` derived from `seed`.
///
/// Uses the same multiplicative mixing on every call so benchmark runs are
/// comparable.
pub fn request_sizes(n: usize, max: usize, seed: u64) -> Vec<usize> {
    let max = max.max(1) as u64;
    (0..n as u64)
        .map(|i| {
            let mixed = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add(i.wrapping_mul(1442695040888963407));
            ((mixed >> 33) % max + 1) as usize
        })
        .collect()
}
