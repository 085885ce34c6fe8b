//! Allocator configuration errors.
//!
//! Only configuration is fallible. Misuse of an allocator or array is a
//! programming error and panics; running out of pool space falls back to
//! the heap.

/// Errors produced while validating or loading a [`ChainConfig`](crate::ChainConfig).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `ring_element_count` was zero.
    #[error("ring element count must be at least 1")]
    ZeroRingSize,
    /// `element_count_max` was zero.
    #[error("pool capacity must be at least 1 element")]
    ZeroCapacity,
    /// The capacity does not split into whole rings.
    #[error(
        "pool capacity {element_count_max} is not a multiple of ring size {ring_element_count}"
    )]
    UnalignedCapacity {
        /// Requested pool capacity in elements.
        element_count_max: usize,
        /// Requested ring size in elements.
        ring_element_count: usize,
    },
    /// A budget document could not be parsed.
    #[error("invalid budget: {reason}")]
    Parse {
        /// Parser diagnostic.
        reason: String,
    },
    /// A named pool inside a budget failed validation.
    #[error("pool '{pool}': {source}")]
    Pool {
        /// Name of the offending pool.
        pool: &'static str,
        /// The underlying validation failure.
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Attach the name of the pool this error belongs to.
    pub fn in_pool(self, pool: &'static str) -> Self {
        Self::Pool {
            pool,
            source: Box::new(self),
        }
    }
}
