//! Mapedit: pooled storage and the document model of a tile map editor.
//!
//! This is the top-level facade crate that re-exports the public API of
//! the mapedit sub-crates. Adding `mapedit` as a single dependency is
//! enough for most users.
//!
//! # Quick start
//!
//! ```rust
//! use mapedit::prelude::*;
//!
//! // Pools sized from a TOML budget; missing pools keep their defaults.
//! let budget = DocumentBudget::from_toml_str(
//!     "[tiles]\nelement_count_max = 65536\nring_element_count = 64\n",
//! )
//! .unwrap();
//! let mut doc = MapDocument::new(budget).unwrap();
//! doc.load_default();
//!
//! let game = doc.game_layer().unwrap();
//! doc.set_tile(game, 3, 4, Tile::new(1)).unwrap();
//! assert_eq!(doc.tile(game, 3, 4).unwrap().index, 1);
//!
//! // A brush is a tile array in the document's tile pool.
//! let mut brush = doc.new_tile_array();
//! brush.push_zeroed(doc.tile_pool_mut(), 9);
//! assert_eq!(brush.len(), 9);
//! brush.clear(doc.tile_pool_mut());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`alloc`] | `mapedit-alloc` | `ChainAllocator`, `MemoryBlock`, `DynamicArray`, `SmallBuffer` |
//! | [`doc`] | `mapedit-doc` | `MapDocument`, element types, budgets, UI flags |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Chain allocator and pooled arrays (`mapedit-alloc`).
///
/// [`alloc::ChainAllocator`] hands out pointer-stable blocks from a
/// fixed pool; [`alloc::DynamicArray`] grows inside one.
pub use mapedit_alloc as alloc;

/// Map document model (`mapedit-doc`).
///
/// [`doc::MapDocument`] owns one pool per element type, sized by a
/// [`doc::DocumentBudget`].
pub use mapedit_doc as doc;

/// Common imports for typical mapedit usage.
///
/// ```rust
/// use mapedit::prelude::*;
/// ```
pub mod prelude {
    // Allocation
    pub use mapedit_alloc::{
        BlockOrigin, ChainAllocator, ChainConfig, DynamicArray, MemoryBlock, SmallBuffer,
    };

    // Document
    pub use mapedit_doc::{
        DocumentBudget, EnvPoint, Envelope, Group, GroupId, HistoryEntry, Layer, LayerId,
        LayerKind, MapDocument, Quad, Tile, UiFlags,
    };

    // Errors
    pub use mapedit_alloc::ConfigError;
    pub use mapedit_doc::DocumentError;
}
