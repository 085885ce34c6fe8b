//! Map document model for the editor.
//!
//! A [`MapDocument`] owns one [`ChainAllocator`](mapedit_alloc::ChainAllocator)
//! per pooled element type, sized once from a [`DocumentBudget`], and keeps
//! its layers, groups, envelopes and envelope points in
//! [`DynamicArray`](mapedit_alloc::DynamicArray)s bound to those pools.
//! Tile and quad layers own arrays in the tile and quad pools, so resizing
//! or deleting a layer never touches the general-purpose heap while the
//! budget holds.
//!
//! Lookups by id return [`DocumentError`] for unknown ids or mismatched
//! layer kinds. Pool exhaustion is not an error: the allocator falls back
//! to the heap and logs a warning.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod budget;
pub mod document;
pub mod element;
pub mod error;
pub mod group;
pub mod history;
pub mod id;
pub mod layer;
pub mod ui_flags;

pub use budget::DocumentBudget;
pub use document::{MapDocument, MemoryReport, PoolUsage, Pools, DEFAULT_MAP_SIZE};
pub use element::{Color, EnvPoint, Envelope, FixedStr, Point, Quad, Tile};
pub use error::DocumentError;
pub use group::Group;
pub use history::HistoryEntry;
pub use id::{EnvelopeId, GroupId, LayerId};
pub use layer::{Layer, LayerKind, QuadLayer, TileLayer};
pub use ui_flags::UiFlags;
