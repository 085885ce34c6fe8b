//! Layer groups.

use crate::element::FixedStr;
use crate::id::LayerId;

/// A group of layers sharing parallax and offset.
///
/// Holds up to [`Group::MAX_LAYERS`] layer ids inline so groups can sit in
/// a pool without owning heap memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Group {
    /// Display name.
    pub name: FixedStr<12>,
    layer_ids: [u32; Group::MAX_LAYERS],
    layer_count: usize,
    /// Horizontal parallax in percent.
    pub parallax_x: i32,
    /// Vertical parallax in percent.
    pub parallax_y: i32,
    /// Horizontal offset.
    pub offset_x: i32,
    /// Vertical offset.
    pub offset_y: i32,
}

impl Group {
    /// Maximum number of layers per group.
    pub const MAX_LAYERS: usize = 64;

    /// An empty group with neutral (100%) parallax.
    pub fn new(name: &str) -> Self {
        Self {
            name: FixedStr::new(name),
            parallax_x: 100,
            parallax_y: 100,
            ..Self::default()
        }
    }

    /// Layers of this group in draw order.
    pub fn layers(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.layer_ids[..self.layer_count].iter().map(|&id| LayerId(id))
    }

    /// Number of layers in the group.
    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    /// Whether the group references `layer`.
    pub fn contains(&self, layer: LayerId) -> bool {
        self.layer_ids[..self.layer_count].contains(&layer.0)
    }

    /// Append `layer`. Returns `false` if the group is full.
    pub fn push_layer(&mut self, layer: LayerId) -> bool {
        if self.layer_count == Self::MAX_LAYERS {
            return false;
        }
        self.layer_ids[self.layer_count] = layer.0;
        self.layer_count += 1;
        true
    }

    /// Account for the removal of `layer` from the document's layer list:
    /// drop references to it and renumber the layers that followed it.
    pub fn forget_layer(&mut self, layer: LayerId) {
        let mut kept = 0;
        for i in 0..self.layer_count {
            let id = self.layer_ids[i];
            if id == layer.0 {
                continue;
            }
            self.layer_ids[kept] = if id > layer.0 { id - 1 } else { id };
            kept += 1;
        }
        self.layer_ids[kept..self.layer_count].fill(0);
        self.layer_count = kept;
    }
}

impl Default for Group {
    fn default() -> Self {
        Self {
            name: FixedStr::default(),
            layer_ids: [0; Self::MAX_LAYERS],
            layer_count: 0,
            parallax_x: 0,
            parallax_y: 0,
            offset_x: 0,
            offset_y: 0,
        }
    }
}
