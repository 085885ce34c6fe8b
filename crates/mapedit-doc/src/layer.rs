//! Layers: a name, presentation data and a kind-tagged payload.

use mapedit_alloc::DynamicArray;

use crate::element::{FixedStr, Quad, Tile};
use crate::id::EnvelopeId;

/// A layer of the map.
///
/// Layers live in the document's layer pool. A default layer is
/// [`LayerKind::Invalid`] and owns nothing; that is the state of an unused
/// pool slot.
#[derive(Debug, Default)]
pub struct Layer {
    /// Display name.
    pub name: FixedStr<12>,
    /// Image used to texture the layer, if any.
    pub image: Option<u32>,
    /// RGBA tint in 0.0..=1.0.
    pub color: [f32; 4],
    /// What the layer holds.
    pub kind: LayerKind,
}

/// The kind of a layer together with the data only that kind has.
#[derive(Debug, Default)]
pub enum LayerKind {
    /// An unused slot.
    #[default]
    Invalid,
    /// A grid of tiles.
    Tiles(TileLayer),
    /// A list of free-form quads.
    Quads(QuadLayer),
}

/// Payload of a tile layer.
#[derive(Debug, Default)]
pub struct TileLayer {
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    /// Envelope animating the layer colour.
    pub color_envelope: Option<EnvelopeId>,
    /// Whether this is the game (collision) layer.
    pub is_game: bool,
    /// `width * height` tiles in row-major order, bound to the tile pool.
    pub tiles: DynamicArray<Tile>,
}

impl TileLayer {
    /// Row-major index of `(x, y)`, or `None` outside the grid.
    pub fn cell_index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }
}

/// Payload of a quad layer.
#[derive(Debug, Default)]
pub struct QuadLayer {
    /// Quads in draw order, bound to the quad pool.
    pub quads: DynamicArray<Quad>,
}

impl Layer {
    /// Opaque white.
    pub const WHITE: [f32; 4] = [1.0; 4];

    /// Whether this is a tile layer.
    pub fn is_tile_layer(&self) -> bool {
        matches!(self.kind, LayerKind::Tiles(_))
    }

    /// Whether this is a quad layer.
    pub fn is_quad_layer(&self) -> bool {
        matches!(self.kind, LayerKind::Quads(_))
    }

    /// The tile payload, if this is a tile layer.
    pub fn as_tiles(&self) -> Option<&TileLayer> {
        match &self.kind {
            LayerKind::Tiles(t) => Some(t),
            _ => None,
        }
    }

    /// The quad payload, if this is a quad layer.
    pub fn as_quads(&self) -> Option<&QuadLayer> {
        match &self.kind {
            LayerKind::Quads(q) => Some(q),
            _ => None,
        }
    }

    /// Number of elements (tiles or quads) the layer holds.
    pub fn element_count(&self) -> usize {
        match &self.kind {
            LayerKind::Invalid => 0,
            LayerKind::Tiles(t) => t.tiles.len(),
            LayerKind::Quads(q) => q.quads.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layer_is_invalid() {
        let layer = Layer::default();
        assert!(matches!(layer.kind, LayerKind::Invalid));
        assert!(!layer.is_tile_layer());
        assert!(!layer.is_quad_layer());
        assert_eq!(layer.element_count(), 0);
    }

    #[test]
    fn cell_index_is_row_major() {
        let t = TileLayer {
            width: 4,
            height: 3,
            ..TileLayer::default()
        };
        assert_eq!(t.cell_index(0, 0), Some(0));
        assert_eq!(t.cell_index(3, 0), Some(3));
        assert_eq!(t.cell_index(1, 2), Some(9));
        assert_eq!(t.cell_index(4, 0), None);
        assert_eq!(t.cell_index(0, 3), None);
    }
}
