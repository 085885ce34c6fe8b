//! Chain allocator configuration parameters.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for a single [`ChainAllocator`](crate::ChainAllocator).
///
/// Controls the pool capacity and the ring granularity. Validated at
/// allocator construction; immutable afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Maximum number of elements the pool buffer holds.
    ///
    /// The buffer is allocated once at this size and never resized.
    /// Must be a non-zero multiple of `ring_element_count`.
    pub element_count_max: usize,

    /// Number of elements per ring, the allocation granule.
    ///
    /// Every pooled request is rounded up to a whole number of rings.
    /// Default: 1.
    pub ring_element_count: usize,
}

impl ChainConfig {
    /// Default ring size: one element per ring.
    pub const DEFAULT_RING_ELEMENT_COUNT: usize = 1;

    /// Default pool capacity used by `Default`.
    pub const DEFAULT_ELEMENT_COUNT_MAX: usize = 1024;

    /// Create a config for `element_count_max` elements with one-element rings.
    pub const fn new(element_count_max: usize) -> Self {
        Self {
            element_count_max,
            ring_element_count: Self::DEFAULT_RING_ELEMENT_COUNT,
        }
    }

    /// Set the ring size.
    pub const fn with_ring_element_count(mut self, ring_element_count: usize) -> Self {
        self.ring_element_count = ring_element_count;
        self
    }

    /// Number of rings (bitmap entries) in the pool.
    ///
    /// Only meaningful for a validated config.
    pub fn ring_count(&self) -> usize {
        self.element_count_max / self.ring_element_count.max(1)
    }

    /// Check that the config describes a usable pool.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ring_element_count == 0 {
            return Err(ConfigError::ZeroRingSize);
        }
        if self.element_count_max == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.element_count_max % self.ring_element_count != 0 {
            return Err(ConfigError::UnalignedCapacity {
                element_count_max: self.element_count_max,
                ring_element_count: self.ring_element_count,
            });
        }
        Ok(())
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ELEMENT_COUNT_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ring_is_one_element() {
        let config = ChainConfig::new(64);
        assert_eq!(config.ring_element_count, 1);
        assert_eq!(config.ring_count(), 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn ring_count_divides_capacity() {
        let config = ChainConfig::new(64).with_ring_element_count(8);
        assert_eq!(config.ring_count(), 8);
    }

    #[test]
    fn zero_ring_rejected() {
        let config = ChainConfig::new(64).with_ring_element_count(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroRingSize));
    }

    #[test]
    fn zero_capacity_rejected() {
        assert_eq!(ChainConfig::new(0).validate(), Err(ConfigError::ZeroCapacity));
    }

    #[test]
    fn unaligned_capacity_rejected() {
        let config = ChainConfig::new(65).with_ring_element_count(8);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnalignedCapacity {
                element_count_max: 65,
                ring_element_count: 8
            })
        ));
    }
}
