//! Ring-pooled chain allocation for the map editor.
//!
//! Provides a fixed-capacity, pointer-stable pool allocator and the
//! growable arrays built on top of it. Collections that are resized all the
//! time (tile grids, quad lists, envelope points, history entries) live in
//! pools sized once at document creation, so neither the general-purpose
//! heap nor long-lived holders of issued blocks are disturbed by churn.
//!
//! # Architecture
//!
//! ```text
//! ChainAllocator<T> (one per element type, owned by the document)
//! ├── ring bitmap: one flag per ring (RingElementCount elements)
//! ├── buffer: Box<[T]>, allocated once, never moved
//! └── issues MemoryBlock<T> (Pool { offset } | Fallback(Box<[T]>))
//!
//! DynamicArray<T>  ──bound to──▶  ChainAllocator<T>
//! └── current MemoryBlock<T> + live length
//!
//! SmallBuffer<T, N> (independent, inline storage spilling to the heap)
//! ```
//!
//! # Access model
//!
//! Arrays do not hold a reference to their allocator. They record the
//! [`AllocatorId`] they were bound to and every operation takes the
//! allocator explicitly, so the document stays the sole owner of its pools.
//! Passing a different allocator than the one an array or block came from
//! is a contract violation and panics.
//!
//! # Failure model
//!
//! Contract violations (double binding, use before binding, out-of-bounds
//! indexing, zero-sized requests) panic. Pool exhaustion is not an error:
//! the request is served from a zero-filled heap block and a warning is
//! logged.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;
pub mod block;
pub mod chain;
pub mod config;
pub mod error;
pub mod id;
pub mod small;

// Public re-exports for the primary API surface.
pub use array::DynamicArray;
pub use block::{BlockOrigin, MemoryBlock};
pub use chain::ChainAllocator;
pub use config::ChainConfig;
pub use error::ConfigError;
pub use id::AllocatorId;
pub use small::SmallBuffer;
