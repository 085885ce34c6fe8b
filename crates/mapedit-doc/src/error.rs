//! Document-level error types.

use mapedit_alloc::ConfigError;

use crate::id::{EnvelopeId, GroupId, LayerId};

/// Errors returned by [`MapDocument`](crate::MapDocument) operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// No layer with this id exists.
    #[error("unknown layer: {layer}")]
    UnknownLayer {
        /// The unrecognised layer.
        layer: LayerId,
    },
    /// No group with this id exists.
    #[error("unknown group: {group}")]
    UnknownGroup {
        /// The unrecognised group.
        group: GroupId,
    },
    /// No envelope with this id exists.
    #[error("unknown envelope: {envelope}")]
    UnknownEnvelope {
        /// The unrecognised envelope.
        envelope: EnvelopeId,
    },
    /// The layer exists but is of a different kind than the operation needs.
    #[error("layer {layer} is not a {expected} layer")]
    WrongLayerKind {
        /// The layer that was addressed.
        layer: LayerId,
        /// The kind the operation expected (`"tile"` or `"quad"`).
        expected: &'static str,
    },
    /// The group's layer list is full.
    #[error("group {group} already holds the maximum of {max} layers")]
    GroupFull {
        /// The full group.
        group: GroupId,
        /// Maximum layers per group.
        max: usize,
    },
    /// A tile layer was requested with a zero or overflowing size.
    #[error("invalid tile layer size {width}x{height}")]
    InvalidDimensions {
        /// Requested width in tiles.
        width: u32,
        /// Requested height in tiles.
        height: u32,
    },
    /// A tile coordinate lies outside the layer.
    #[error("tile ({x}, {y}) is outside layer {layer}")]
    TileOutOfRange {
        /// The addressed layer.
        layer: LayerId,
        /// Column.
        x: u32,
        /// Row.
        y: u32,
    },
    /// A quad index lies outside the layer's quad list.
    #[error("quad {index} is outside layer {layer}")]
    QuadOutOfRange {
        /// The addressed layer.
        layer: LayerId,
        /// The quad index.
        index: usize,
    },
    /// The pool budget was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
