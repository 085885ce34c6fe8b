//! The map document: pools plus the arrays that live in them.

use std::fmt;

use log::{debug, info, warn};
use mapedit_alloc::{ChainAllocator, DynamicArray, MemoryBlock};

use crate::budget::DocumentBudget;
use crate::element::{EnvPoint, Envelope, FixedStr, Quad, Tile};
use crate::error::DocumentError;
use crate::group::Group;
use crate::history::HistoryEntry;
use crate::id::{EnvelopeId, GroupId, LayerId};
use crate::layer::{Layer, LayerKind, QuadLayer, TileLayer};

/// Width and height of the game layer created by
/// [`MapDocument::load_default`].
pub const DEFAULT_MAP_SIZE: u32 = 50;

/// Envelope item version written by [`MapDocument::add_envelope`].
pub const ENVELOPE_VERSION: i32 = 2;

/// One chain allocator per pooled element type.
///
/// Pools are sized from a [`DocumentBudget`] when the document is created
/// and never resized.
#[derive(Debug)]
pub struct Pools {
    /// Tiles of every tile layer and brush.
    pub tiles: ChainAllocator<Tile>,
    /// Quads of every quad layer.
    pub quads: ChainAllocator<Quad>,
    /// Envelope keyframes.
    pub env_points: ChainAllocator<EnvPoint>,
    /// Layers.
    pub layers: ChainAllocator<Layer>,
    /// Groups.
    pub groups: ChainAllocator<Group>,
    /// Envelopes.
    pub envelopes: ChainAllocator<Envelope>,
    /// Undo/redo history entries.
    pub history: ChainAllocator<HistoryEntry>,
}

impl Pools {
    /// Create every pool described by `budget`.
    pub fn new(budget: &DocumentBudget) -> Result<Self, DocumentError> {
        budget.validate()?;
        Ok(Self {
            tiles: ChainAllocator::new(budget.tiles)?,
            quads: ChainAllocator::new(budget.quads)?,
            env_points: ChainAllocator::new(budget.env_points)?,
            layers: ChainAllocator::new(budget.layers)?,
            groups: ChainAllocator::new(budget.groups)?,
            envelopes: ChainAllocator::new(budget.envelopes)?,
            history: ChainAllocator::new(budget.history)?,
        })
    }
}

/// Usage of one pool at the time of a [`MemoryReport`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolUsage {
    /// Pool name, as in [`DocumentBudget::pools`].
    pub name: &'static str,
    /// Bytes reserved up front.
    pub allocated_size: usize,
    /// Element capacity.
    pub capacity: usize,
    /// Rings currently handed out.
    pub used_rings: usize,
    /// Rings in the pool.
    pub ring_count: usize,
    /// Heap fallback blocks not yet returned.
    pub live_fallbacks: usize,
}

impl PoolUsage {
    fn of<T>(name: &'static str, pool: &ChainAllocator<T>) -> Self {
        Self {
            name,
            allocated_size: pool.allocated_size(),
            capacity: pool.capacity(),
            used_rings: pool.used_ring_count(),
            ring_count: pool.ring_count(),
            live_fallbacks: pool.live_fallback_count(),
        }
    }
}

/// Snapshot of every pool's reservation and occupancy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryReport {
    /// One entry per pool, in budget order.
    pub pools: [PoolUsage; 7],
}

impl MemoryReport {
    /// Bytes reserved across all pools.
    pub fn total_allocated_size(&self) -> usize {
        self.pools.iter().map(|p| p.allocated_size).sum()
    }

    /// The entry for the pool called `name`.
    pub fn pool(&self, name: &str) -> Option<&PoolUsage> {
        self.pools.iter().find(|p| p.name == name)
    }
}

impl fmt::Display for MemoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.pools {
            writeln!(
                f,
                "{:<10} {:>10} bytes  {:>6}/{:<6} rings  {} fallback",
                p.name, p.allocated_size, p.used_rings, p.ring_count, p.live_fallbacks
            )?;
        }
        write!(f, "total      {:>10} bytes", self.total_allocated_size())
    }
}

/// An editable map.
///
/// Owns one [`ChainAllocator`] per element type and the document-level
/// arrays bound to them. Layers are stored in the layer pool; each tile or
/// quad layer owns an array bound to the tile or quad pool.
///
/// ```
/// use mapedit_doc::{DocumentBudget, MapDocument, Tile};
///
/// let mut doc = MapDocument::new(DocumentBudget::default()).unwrap();
/// doc.load_default();
/// let game = doc.game_layer().unwrap();
/// doc.tiles_mut(game).unwrap()[0] = Tile::new(1);
/// assert_eq!(doc.tiles(game).unwrap()[0].index, 1);
/// ```
#[derive(Debug)]
pub struct MapDocument {
    pools: Pools,
    layers: DynamicArray<Layer>,
    groups: DynamicArray<Group>,
    envelopes: DynamicArray<Envelope>,
    env_points: DynamicArray<EnvPoint>,
    game_layer: Option<LayerId>,
    game_group: Option<GroupId>,
}

impl MapDocument {
    /// Create an empty document with pools sized by `budget`.
    pub fn new(budget: DocumentBudget) -> Result<Self, DocumentError> {
        let pools = Pools::new(&budget)?;
        let doc = Self {
            layers: DynamicArray::bound_to(&pools.layers),
            groups: DynamicArray::bound_to(&pools.groups),
            envelopes: DynamicArray::bound_to(&pools.envelopes),
            env_points: DynamicArray::bound_to(&pools.env_points),
            pools,
            game_layer: None,
            game_group: None,
        };
        info!(
            "map document created, {} bytes reserved in pools",
            doc.memory_report().total_allocated_size()
        );
        Ok(doc)
    }

    /// Create a document from a TOML budget.
    pub fn from_budget_toml(source: &str) -> Result<Self, DocumentError> {
        Self::new(DocumentBudget::from_toml_str(source)?)
    }

    /// The document's pools.
    pub fn pools(&self) -> &Pools {
        &self.pools
    }

    /// The tile pool, for working with arrays from
    /// [`new_tile_array`](Self::new_tile_array).
    pub fn tile_pool_mut(&mut self) -> &mut ChainAllocator<Tile> {
        &mut self.pools.tiles
    }

    /// The quad pool, for working with arrays from
    /// [`new_quad_array`](Self::new_quad_array).
    pub fn quad_pool_mut(&mut self) -> &mut ChainAllocator<Quad> {
        &mut self.pools.quads
    }

    /// An empty tile array bound to the tile pool, e.g. for a brush.
    ///
    /// The caller must clear it with [`tile_pool_mut`](Self::tile_pool_mut)
    /// before the document is cleared.
    pub fn new_tile_array(&self) -> DynamicArray<Tile> {
        DynamicArray::bound_to(&self.pools.tiles)
    }

    /// An empty quad array bound to the quad pool.
    pub fn new_quad_array(&self) -> DynamicArray<Quad> {
        DynamicArray::bound_to(&self.pools.quads)
    }

    /// Number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Number of groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of envelopes.
    pub fn envelope_count(&self) -> usize {
        self.envelopes.len()
    }

    /// The game (collision) layer, if the document has one.
    pub fn game_layer(&self) -> Option<LayerId> {
        self.game_layer
    }

    /// The group holding the game layer.
    pub fn game_group(&self) -> Option<GroupId> {
        self.game_group
    }

    /// Append a `width` x `height` tile layer filled with empty tiles.
    pub fn new_tile_layer(&mut self, width: u32, height: u32) -> Result<LayerId, DocumentError> {
        let cells = (width as usize).checked_mul(height as usize).filter(|&n| n > 0);
        let Some(cells) = cells else {
            return Err(DocumentError::InvalidDimensions { width, height });
        };
        let id = self.push_tile_layer(width, height, cells);
        debug!("tile layer {id} created ({width}x{height})");
        Ok(id)
    }

    fn push_tile_layer(&mut self, width: u32, height: u32, cells: usize) -> LayerId {
        let mut tiles = DynamicArray::bound_to(&self.pools.tiles);
        tiles.push_zeroed(&mut self.pools.tiles, cells);
        let layer = Layer {
            name: FixedStr::new("Tiles"),
            color: Layer::WHITE,
            kind: LayerKind::Tiles(TileLayer {
                width,
                height,
                tiles,
                ..TileLayer::default()
            }),
            ..Layer::default()
        };
        self.push_layer(layer)
    }

    /// Append an empty quad layer.
    pub fn new_quad_layer(&mut self) -> LayerId {
        let layer = Layer {
            name: FixedStr::new("Quads"),
            color: Layer::WHITE,
            kind: LayerKind::Quads(QuadLayer {
                quads: DynamicArray::bound_to(&self.pools.quads),
            }),
            ..Layer::default()
        };
        let id = self.push_layer(layer);
        debug!("quad layer {id} created");
        id
    }

    fn push_layer(&mut self, layer: Layer) -> LayerId {
        self.layers.push(&mut self.pools.layers, layer);
        LayerId(index_u32(self.layers.len() - 1))
    }

    /// Append an empty group.
    pub fn new_group(&mut self, name: &str) -> GroupId {
        self.groups.push(&mut self.pools.groups, Group::new(name));
        GroupId(index_u32(self.groups.len() - 1))
    }

    /// Append `layer` to `group`'s layer list.
    pub fn group_add_layer(&mut self, group: GroupId, layer: LayerId) -> Result<(), DocumentError> {
        self.layer(layer)?;
        let g = self.group_mut(group)?;
        if g.push_layer(layer) {
            Ok(())
        } else {
            Err(DocumentError::GroupFull {
                group,
                max: Group::MAX_LAYERS,
            })
        }
    }

    /// The layer with id `layer`.
    pub fn layer(&self, layer: LayerId) -> Result<&Layer, DocumentError> {
        self.layers
            .as_slice(&self.pools.layers)
            .get(layer.index())
            .ok_or(DocumentError::UnknownLayer { layer })
    }

    /// The layer with id `layer`, mutably.
    ///
    /// Replacing the layer's payload arrays leaks their pool space until
    /// the document is cleared.
    pub fn layer_mut(&mut self, layer: LayerId) -> Result<&mut Layer, DocumentError> {
        layer_slot(&mut self.layers, &mut self.pools.layers, layer)
    }

    /// Iterate over the layers in order.
    pub fn layers(&self) -> impl Iterator<Item = (LayerId, &Layer)> + '_ {
        self.layers
            .iter(&self.pools.layers)
            .enumerate()
            .map(|(i, l)| (LayerId(index_u32(i)), l))
    }

    /// The group with id `group`.
    pub fn group(&self, group: GroupId) -> Result<&Group, DocumentError> {
        self.groups
            .as_slice(&self.pools.groups)
            .get(group.index())
            .ok_or(DocumentError::UnknownGroup { group })
    }

    /// The group with id `group`, mutably.
    pub fn group_mut(&mut self, group: GroupId) -> Result<&mut Group, DocumentError> {
        self.groups
            .as_mut_slice(&mut self.pools.groups)
            .get_mut(group.index())
            .ok_or(DocumentError::UnknownGroup { group })
    }

    /// Iterate over the groups in order.
    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &Group)> + '_ {
        self.groups
            .iter(&self.pools.groups)
            .enumerate()
            .map(|(i, g)| (GroupId(index_u32(i)), g))
    }

    /// Delete `layer`, keeping the order of the remaining layers.
    ///
    /// Later layers move down by one id. Group layer lists and the game
    /// layer id are renumbered to match, and the layer's tiles or quads are
    /// returned to their pool.
    pub fn delete_layer(&mut self, layer: LayerId) -> Result<(), DocumentError> {
        self.layer(layer)?;
        let mut removed = self.layers.remove(&mut self.pools.layers, layer.index());
        release_payload(&mut removed, &mut self.pools.tiles, &mut self.pools.quads);

        for group in self.groups.as_mut_slice(&mut self.pools.groups) {
            group.forget_layer(layer);
        }
        self.game_layer = match self.game_layer {
            Some(game) if game == layer => None,
            Some(game) if game > layer => Some(LayerId(game.0 - 1)),
            other => other,
        };
        debug!("layer {layer} deleted, {} left", self.layers.len());
        Ok(())
    }

    /// The tiles of a tile layer in row-major order.
    pub fn tiles(&self, layer: LayerId) -> Result<&[Tile], DocumentError> {
        let payload = tile_payload(self.layer(layer)?, layer)?;
        Ok(payload.tiles.as_slice(&self.pools.tiles))
    }

    /// The tiles of a tile layer, mutably.
    pub fn tiles_mut(&mut self, layer: LayerId) -> Result<&mut [Tile], DocumentError> {
        let slot = layer_slot(&mut self.layers, &mut self.pools.layers, layer)?;
        let LayerKind::Tiles(payload) = &mut slot.kind else {
            return Err(wrong_kind(layer, "tile"));
        };
        Ok(payload.tiles.as_mut_slice(&mut self.pools.tiles))
    }

    /// The tiles of a tile layer as raw bytes.
    pub fn tile_bytes(&self, layer: LayerId) -> Result<&[u8], DocumentError> {
        let payload = tile_payload(self.layer(layer)?, layer)?;
        Ok(payload.tiles.as_bytes(&self.pools.tiles))
    }

    /// The tile at `(x, y)` of a tile layer.
    pub fn tile(&self, layer: LayerId, x: u32, y: u32) -> Result<Tile, DocumentError> {
        let payload = tile_payload(self.layer(layer)?, layer)?;
        let index = payload
            .cell_index(x, y)
            .ok_or(DocumentError::TileOutOfRange { layer, x, y })?;
        Ok(*payload.tiles.get(&self.pools.tiles, index))
    }

    /// Overwrite the tile at `(x, y)` of a tile layer.
    pub fn set_tile(&mut self, layer: LayerId, x: u32, y: u32, tile: Tile) -> Result<(), DocumentError> {
        let slot = layer_slot(&mut self.layers, &mut self.pools.layers, layer)?;
        let LayerKind::Tiles(payload) = &mut slot.kind else {
            return Err(wrong_kind(layer, "tile"));
        };
        let index = payload
            .cell_index(x, y)
            .ok_or(DocumentError::TileOutOfRange { layer, x, y })?;
        *payload.tiles.get_mut(&mut self.pools.tiles, index) = tile;
        Ok(())
    }

    /// The quads of a quad layer in draw order.
    pub fn quads(&self, layer: LayerId) -> Result<&[Quad], DocumentError> {
        let payload = quad_payload(self.layer(layer)?, layer)?;
        Ok(payload.quads.as_slice(&self.pools.quads))
    }

    /// Append `quad` to a quad layer and return its index.
    pub fn add_quad(&mut self, layer: LayerId, quad: Quad) -> Result<usize, DocumentError> {
        let slot = layer_slot(&mut self.layers, &mut self.pools.layers, layer)?;
        let LayerKind::Quads(payload) = &mut slot.kind else {
            return Err(wrong_kind(layer, "quad"));
        };
        payload.quads.push(&mut self.pools.quads, quad);
        Ok(payload.quads.len() - 1)
    }

    /// Remove the quad at `index`, keeping the draw order of the rest.
    pub fn remove_quad(&mut self, layer: LayerId, index: usize) -> Result<Quad, DocumentError> {
        let slot = layer_slot(&mut self.layers, &mut self.pools.layers, layer)?;
        let LayerKind::Quads(payload) = &mut slot.kind else {
            return Err(wrong_kind(layer, "quad"));
        };
        if index >= payload.quads.len() {
            return Err(DocumentError::QuadOutOfRange { layer, index });
        }
        Ok(payload.quads.remove(&mut self.pools.quads, index))
    }

    /// Append an envelope over `points` using `channels` channels.
    ///
    /// The points are appended to the document's shared point list.
    pub fn add_envelope(&mut self, channels: i32, points: &[EnvPoint]) -> EnvelopeId {
        let start_point = index_i32(self.env_points.len());
        self.env_points.extend_from_slice(&mut self.pools.env_points, points);
        let envelope = Envelope {
            version: ENVELOPE_VERSION,
            channels,
            start_point,
            num_points: index_i32(points.len()),
            synchronized: 0,
        };
        self.envelopes.push(&mut self.pools.envelopes, envelope);
        EnvelopeId(index_u32(self.envelopes.len() - 1))
    }

    /// The envelope with id `envelope`.
    pub fn envelope(&self, envelope: EnvelopeId) -> Result<&Envelope, DocumentError> {
        self.envelopes
            .as_slice(&self.pools.envelopes)
            .get(envelope.index())
            .ok_or(DocumentError::UnknownEnvelope { envelope })
    }

    /// The keyframes of an envelope.
    pub fn envelope_points(&self, envelope: EnvelopeId) -> Result<&[EnvPoint], DocumentError> {
        let env = self.envelope(envelope)?;
        let start = usize::try_from(env.start_point).unwrap_or(usize::MAX);
        let count = usize::try_from(env.num_points).unwrap_or(0);
        self.env_points
            .as_slice(&self.pools.env_points)
            .get(start..start.saturating_add(count))
            .ok_or(DocumentError::UnknownEnvelope { envelope })
    }

    /// Record a history entry in the history pool.
    ///
    /// The entry stays valid until handed back with
    /// [`release_history_entry`](Self::release_history_entry); clearing the
    /// document does not touch it.
    pub fn new_history_entry(&mut self, action: &str, description: &str) -> MemoryBlock<HistoryEntry> {
        let mut block = self.pools.history.alloc_one();
        let entry = &mut self.pools.history.block_mut(&mut block)[0];
        entry.set_action(action);
        entry.set_description(description);
        block
    }

    /// The entry stored in `block`.
    pub fn history_entry<'a>(&'a self, block: &'a MemoryBlock<HistoryEntry>) -> &'a HistoryEntry {
        &self.pools.history.block(block)[0]
    }

    /// Return a history entry to the pool.
    pub fn release_history_entry(&mut self, block: MemoryBlock<HistoryEntry>) {
        self.pools.history.dealloc_one(block);
    }

    /// Replace the contents with the default map: one "Game" group
    /// holding a [`DEFAULT_MAP_SIZE`]-square game tile layer.
    pub fn load_default(&mut self) {
        self.clear();
        let group = self.new_group("Game");
        let cells = (DEFAULT_MAP_SIZE * DEFAULT_MAP_SIZE) as usize;
        let layer = self.push_tile_layer(DEFAULT_MAP_SIZE, DEFAULT_MAP_SIZE, cells);
        let slot = self.layers.get_mut(&mut self.pools.layers, layer.index());
        slot.name.set("Game");
        if let LayerKind::Tiles(payload) = &mut slot.kind {
            payload.is_game = true;
        }
        self.groups
            .get_mut(&mut self.pools.groups, group.index())
            .push_layer(layer);
        self.game_layer = Some(layer);
        self.game_group = Some(group);
        info!("default map loaded ({DEFAULT_MAP_SIZE}x{DEFAULT_MAP_SIZE} game layer)");
    }

    /// Remove every layer, group and envelope, then reset the document pools.
    ///
    /// Arrays created with [`new_tile_array`](Self::new_tile_array) or
    /// [`new_quad_array`](Self::new_quad_array) must be cleared first; any
    /// block still outstanding becomes stale. The history pool is left alone.
    pub fn clear(&mut self) {
        for layer in self.layers.as_mut_slice(&mut self.pools.layers) {
            release_payload(layer, &mut self.pools.tiles, &mut self.pools.quads);
        }
        self.layers.clear(&mut self.pools.layers);
        self.groups.clear(&mut self.pools.groups);
        self.envelopes.clear(&mut self.pools.envelopes);
        self.env_points.clear(&mut self.pools.env_points);

        reset_pool("tiles", &mut self.pools.tiles);
        reset_pool("quads", &mut self.pools.quads);
        reset_pool("env_points", &mut self.pools.env_points);
        reset_pool("layers", &mut self.pools.layers);
        reset_pool("groups", &mut self.pools.groups);
        reset_pool("envelopes", &mut self.pools.envelopes);

        self.game_layer = None;
        self.game_group = None;
        info!("map document cleared");
    }

    /// Reservation and occupancy of every pool.
    pub fn memory_report(&self) -> MemoryReport {
        let p = &self.pools;
        MemoryReport {
            pools: [
                PoolUsage::of("tiles", &p.tiles),
                PoolUsage::of("quads", &p.quads),
                PoolUsage::of("env_points", &p.env_points),
                PoolUsage::of("layers", &p.layers),
                PoolUsage::of("groups", &p.groups),
                PoolUsage::of("envelopes", &p.envelopes),
                PoolUsage::of("history", &p.history),
            ],
        }
    }
}

impl Drop for MapDocument {
    fn drop(&mut self) {
        for layer in self.layers.as_mut_slice(&mut self.pools.layers) {
            release_payload(layer, &mut self.pools.tiles, &mut self.pools.quads);
        }
    }
}

fn layer_slot<'a>(
    layers: &'a mut DynamicArray<Layer>,
    pool: &'a mut ChainAllocator<Layer>,
    layer: LayerId,
) -> Result<&'a mut Layer, DocumentError> {
    layers
        .as_mut_slice(pool)
        .get_mut(layer.index())
        .ok_or(DocumentError::UnknownLayer { layer })
}

fn tile_payload(slot: &Layer, layer: LayerId) -> Result<&TileLayer, DocumentError> {
    slot.as_tiles().ok_or_else(|| wrong_kind(layer, "tile"))
}

fn quad_payload(slot: &Layer, layer: LayerId) -> Result<&QuadLayer, DocumentError> {
    slot.as_quads().ok_or_else(|| wrong_kind(layer, "quad"))
}

fn wrong_kind(layer: LayerId, expected: &'static str) -> DocumentError {
    DocumentError::WrongLayerKind { layer, expected }
}

/// Return a layer's tiles or quads to their pool and mark it invalid.
fn release_payload(
    layer: &mut Layer,
    tiles: &mut ChainAllocator<Tile>,
    quads: &mut ChainAllocator<Quad>,
) {
    match std::mem::take(&mut layer.kind) {
        LayerKind::Invalid => {}
        LayerKind::Tiles(mut payload) => payload.tiles.clear(tiles),
        LayerKind::Quads(mut payload) => payload.quads.clear(quads),
    }
}

fn reset_pool<T>(name: &str, pool: &mut ChainAllocator<T>) {
    if pool.used_ring_count() > 0 || pool.live_fallback_count() > 0 {
        warn!(
            "{name} pool reset with {} rings in use and {} fallback blocks never returned through dealloc",
            pool.used_ring_count(),
            pool.live_fallback_count()
        );
    }
    pool.clear();
}

// Pool capacities are `usize` but list ids are 32-bit, matching the map format.
fn index_u32(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

fn index_i32(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}
