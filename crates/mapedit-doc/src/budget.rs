//! Per-element-type pool budgets.
//!
//! A [`DocumentBudget`] fixes the size of every pool a
//! [`MapDocument`](crate::MapDocument) creates. It is read once, when the
//! document is created, and can be loaded from TOML:
//!
//! ```toml
//! [tiles]
//! element_count_max = 262144
//! ring_element_count = 64
//!
//! [history]
//! element_count_max = 512
//! ```
//!
//! Pools missing from the document keep their defaults, as do keys missing
//! from a pool table. Unknown tables and keys are rejected.

use mapedit_alloc::{ChainConfig, ConfigError};
use serde::{Deserialize, Serialize};

/// Pool sizes for every pooled element type of a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawBudget")]
pub struct DocumentBudget {
    /// Tiles across all tile layers and brushes.
    pub tiles: ChainConfig,
    /// Quads across all quad layers.
    pub quads: ChainConfig,
    /// Envelope keyframes.
    pub env_points: ChainConfig,
    /// Layers.
    pub layers: ChainConfig,
    /// Groups.
    pub groups: ChainConfig,
    /// Envelopes.
    pub envelopes: ChainConfig,
    /// Undo/redo history entries.
    pub history: ChainConfig,
}

impl DocumentBudget {
    /// Default tile budget: 1M tiles in rings of 64.
    pub const DEFAULT_TILES: ChainConfig = ChainConfig::new(1 << 20).with_ring_element_count(64);
    /// Default quad budget.
    pub const DEFAULT_QUADS: ChainConfig = ChainConfig::new(16_384).with_ring_element_count(8);
    /// Default envelope point budget.
    pub const DEFAULT_ENV_POINTS: ChainConfig =
        ChainConfig::new(16_384).with_ring_element_count(8);
    /// Default layer budget.
    pub const DEFAULT_LAYERS: ChainConfig = ChainConfig::new(1024);
    /// Default group budget.
    pub const DEFAULT_GROUPS: ChainConfig = ChainConfig::new(256);
    /// Default envelope budget.
    pub const DEFAULT_ENVELOPES: ChainConfig = ChainConfig::new(512);
    /// Default history entry budget.
    pub const DEFAULT_HISTORY: ChainConfig = ChainConfig::new(1024);

    /// Parse a budget from TOML and validate it.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let budget: Self = toml::from_str(source).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        budget.validate()?;
        Ok(budget)
    }

    /// Validate every pool, naming the first one that fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, config) in self.pools() {
            config.validate().map_err(|e| e.in_pool(name))?;
        }
        Ok(())
    }

    /// Every pool with its name, in creation order.
    pub fn pools(&self) -> [(&'static str, ChainConfig); 7] {
        [
            ("tiles", self.tiles),
            ("quads", self.quads),
            ("env_points", self.env_points),
            ("layers", self.layers),
            ("groups", self.groups),
            ("envelopes", self.envelopes),
            ("history", self.history),
        ]
    }
}

impl Default for DocumentBudget {
    fn default() -> Self {
        Self {
            tiles: Self::DEFAULT_TILES,
            quads: Self::DEFAULT_QUADS,
            env_points: Self::DEFAULT_ENV_POINTS,
            layers: Self::DEFAULT_LAYERS,
            groups: Self::DEFAULT_GROUPS,
            envelopes: Self::DEFAULT_ENVELOPES,
            history: Self::DEFAULT_HISTORY,
        }
    }
}

/// One pool table as written; absent keys fall back to that pool's default.
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PoolOverride {
    element_count_max: Option<usize>,
    ring_element_count: Option<usize>,
}

impl PoolOverride {
    fn over(self, base: ChainConfig) -> ChainConfig {
        ChainConfig {
            element_count_max: self.element_count_max.unwrap_or(base.element_count_max),
            ring_element_count: self.ring_element_count.unwrap_or(base.ring_element_count),
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawBudget {
    tiles: PoolOverride,
    quads: PoolOverride,
    env_points: PoolOverride,
    layers: PoolOverride,
    groups: PoolOverride,
    envelopes: PoolOverride,
    history: PoolOverride,
}

impl From<RawBudget> for DocumentBudget {
    fn from(raw: RawBudget) -> Self {
        Self {
            tiles: raw.tiles.over(Self::DEFAULT_TILES),
            quads: raw.quads.over(Self::DEFAULT_QUADS),
            env_points: raw.env_points.over(Self::DEFAULT_ENV_POINTS),
            layers: raw.layers.over(Self::DEFAULT_LAYERS),
            groups: raw.groups.over(Self::DEFAULT_GROUPS),
            envelopes: raw.envelopes.over(Self::DEFAULT_ENVELOPES),
            history: raw.history.over(Self::DEFAULT_HISTORY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(DocumentBudget::default().validate().is_ok());
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let budget = DocumentBudget::from_toml_str("").unwrap();
        assert_eq!(budget, DocumentBudget::default());
    }

    #[test]
    fn partial_toml_overrides_named_pools() {
        let budget = DocumentBudget::from_toml_str(
            "[tiles]\nelement_count_max = 4096\nring_element_count = 16\n\n[history]\nelement_count_max = 8\n",
        )
        .unwrap();
        assert_eq!(budget.tiles, ChainConfig::new(4096).with_ring_element_count(16));
        assert_eq!(budget.history, ChainConfig::new(8));
        assert_eq!(budget.quads, DocumentBudget::DEFAULT_QUADS);
    }

    #[test]
    fn invalid_pool_is_named() {
        let err = DocumentBudget::from_toml_str(
            "[quads]\nelement_count_max = 10\nring_element_count = 4\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Pool { pool: "quads", .. }));
    }

    #[test]
    fn missing_key_keeps_pool_default() {
        let budget = DocumentBudget::from_toml_str("[tiles]\nelement_count_max = 4096\n").unwrap();
        assert_eq!(budget.tiles, ChainConfig::new(4096).with_ring_element_count(64));
    }

    #[test]
    fn unknown_pool_is_rejected() {
        let err = DocumentBudget::from_toml_str("[tile]\nelement_count_max = 4096\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = DocumentBudget::from_toml_str("[quads]\nring_elements = 8\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn serialized_budget_reads_back() {
        let budget = DocumentBudget {
            history: ChainConfig::new(64),
            ..DocumentBudget::default()
        };
        let text = toml::to_string(&budget).unwrap();
        assert_eq!(DocumentBudget::from_toml_str(&text).unwrap(), budget);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = DocumentBudget::from_toml_str("[tiles\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
