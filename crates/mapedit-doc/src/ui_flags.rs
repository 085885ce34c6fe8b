//! Per-frame UI flag sets for the layer panel.

use mapedit_alloc::SmallBuffer;

use crate::id::{GroupId, LayerId};

/// Open/hidden/hovered flags for every group and layer of a document.
///
/// One byte per entry, kept inline for typical maps and spilling to the
/// heap for large ones. Call [`sync`](Self::sync) once per frame with the
/// document's current counts; new entries start cleared.
#[derive(Debug, Default)]
pub struct UiFlags {
    group_open: SmallBuffer<u8, 64>,
    group_hidden: SmallBuffer<u8, 64>,
    group_hovered: SmallBuffer<u8, 64>,
    layer_hovered: SmallBuffer<u8, 128>,
    layer_hidden: SmallBuffer<u8, 128>,
}

impl UiFlags {
    /// Empty flag sets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resize every set to the document's group and layer counts.
    pub fn sync(&mut self, group_count: usize, layer_count: usize) {
        self.group_open.resize_default(group_count);
        self.group_hidden.resize_default(group_count);
        self.group_hovered.resize_default(group_count);
        self.layer_hovered.resize_default(layer_count);
        self.layer_hidden.resize_default(layer_count);
    }

    /// Reset hover state at the start of a frame.
    pub fn begin_frame(&mut self) {
        self.group_hovered.fill(0);
        self.layer_hovered.fill(0);
    }

    /// Drop the flags of a deleted layer so later layers keep theirs.
    pub fn forget_layer(&mut self, layer: LayerId) {
        let index = layer.index();
        if index < self.layer_hidden.len() {
            self.layer_hidden.remove_index(index);
        }
        if index < self.layer_hovered.len() {
            self.layer_hovered.remove_index(index);
        }
    }

    /// Number of tracked groups.
    pub fn group_count(&self) -> usize {
        self.group_open.len()
    }

    /// Number of tracked layers.
    pub fn layer_count(&self) -> usize {
        self.layer_hidden.len()
    }

    /// Whether `group` is expanded in the panel.
    pub fn is_group_open(&self, group: GroupId) -> bool {
        flag(&self.group_open, group.index())
    }

    /// Expand or collapse `group`.
    pub fn set_group_open(&mut self, group: GroupId, open: bool) {
        set_flag(&mut self.group_open, group.index(), open);
    }

    /// Flip the expanded state of `group`.
    pub fn toggle_group_open(&mut self, group: GroupId) {
        let open = self.is_group_open(group);
        self.set_group_open(group, !open);
    }

    /// Whether `group` is hidden in the view.
    pub fn is_group_hidden(&self, group: GroupId) -> bool {
        flag(&self.group_hidden, group.index())
    }

    /// Hide or show `group`.
    pub fn set_group_hidden(&mut self, group: GroupId, hidden: bool) {
        set_flag(&mut self.group_hidden, group.index(), hidden);
    }

    /// Whether the pointer is over `group` this frame.
    pub fn is_group_hovered(&self, group: GroupId) -> bool {
        flag(&self.group_hovered, group.index())
    }

    /// Mark `group` as hovered for this frame.
    pub fn hover_group(&mut self, group: GroupId) {
        set_flag(&mut self.group_hovered, group.index(), true);
    }

    /// Whether `layer` is hidden in the view.
    pub fn is_layer_hidden(&self, layer: LayerId) -> bool {
        flag(&self.layer_hidden, layer.index())
    }

    /// Hide or show `layer`.
    pub fn set_layer_hidden(&mut self, layer: LayerId, hidden: bool) {
        set_flag(&mut self.layer_hidden, layer.index(), hidden);
    }

    /// Whether the pointer is over `layer` this frame.
    pub fn is_layer_hovered(&self, layer: LayerId) -> bool {
        flag(&self.layer_hovered, layer.index())
    }

    /// Mark `layer` as hovered for this frame.
    pub fn hover_layer(&mut self, layer: LayerId) {
        set_flag(&mut self.layer_hovered, layer.index(), true);
    }

    /// Whether the layer flags outgrew their inline storage.
    pub fn layers_spilled(&self) -> bool {
        self.layer_hidden.is_spilled()
    }
}

fn flag<const N: usize>(set: &SmallBuffer<u8, N>, index: usize) -> bool {
    set.get(index).is_some_and(|&f| f != 0)
}

/// Out-of-range writes are ignored until the next `sync`.
fn set_flag<const N: usize>(set: &mut SmallBuffer<u8, N>, index: usize, value: bool) {
    if let Some(f) = set.get_mut(index) {
        *f = u8::from(value);
    }
}
