//! Test utilities for mapedit development.
//!
//! Provides small pool budgets, a [`TestDocBuilder`] for assembling
//! documents in a known shape, and [`init_logging`] so tests can see the
//! allocator's exhaustion warnings with `RUST_LOG=warn`.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use mapedit_alloc::ChainConfig;
use mapedit_doc::{DocumentBudget, GroupId, LayerId, MapDocument};

/// Route `log` output through `env_logger` once per test binary.
///
/// Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A budget small enough that tests can exhaust pools on purpose.
pub fn small_budget() -> DocumentBudget {
    DocumentBudget {
        tiles: ChainConfig::new(4096).with_ring_element_count(16),
        quads: ChainConfig::new(256).with_ring_element_count(4),
        env_points: ChainConfig::new(256).with_ring_element_count(4),
        layers: ChainConfig::new(64),
        groups: ChainConfig::new(16),
        envelopes: ChainConfig::new(16),
        history: ChainConfig::new(32),
    }
}

/// Builder for documents with a predictable group/layer layout.
///
/// Layers are appended in call order and added to the most recently
/// created group (a "Background" group is created if none exists).
pub struct TestDocBuilder {
    budget: DocumentBudget,
    steps: Vec<Step>,
}

enum Step {
    Group(String),
    TileLayer { width: u32, height: u32, fill: u8 },
    QuadLayer { quads: usize },
}

/// A built document plus the ids the builder created, in order.
pub struct TestDoc {
    pub doc: MapDocument,
    pub groups: Vec<GroupId>,
    pub layers: Vec<LayerId>,
}

impl TestDocBuilder {
    pub fn new() -> Self {
        Self {
            budget: small_budget(),
            steps: Vec::new(),
        }
    }

    /// Use `budget` instead of [`small_budget`].
    pub fn budget(mut self, budget: DocumentBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn group(mut self, name: &str) -> Self {
        self.steps.push(Step::Group(name.to_owned()));
        self
    }

    /// A tile layer with every tile set to index `fill`.
    pub fn tile_layer(mut self, width: u32, height: u32, fill: u8) -> Self {
        self.steps.push(Step::TileLayer {
            width,
            height,
            fill,
        });
        self
    }

    /// A quad layer holding `quads` unit quads along the x axis.
    pub fn quad_layer(mut self, quads: usize) -> Self {
        self.steps.push(Step::QuadLayer { quads });
        self
    }

    /// Build the document.
    ///
    /// # Panics
    ///
    /// Panics if the budget is invalid or a step is rejected.
    pub fn build(self) -> TestDoc {
        let mut doc = MapDocument::new(self.budget).expect("test budget must be valid");
        let mut groups = Vec::new();
        let mut layers = Vec::new();
        for step in self.steps {
            let layer = match step {
                Step::Group(name) => {
                    groups.push(doc.new_group(&name));
                    continue;
                }
                Step::TileLayer {
                    width,
                    height,
                    fill,
                } => {
                    let id = doc.new_tile_layer(width, height).expect("tile layer");
                    fixtures::fill_tiles(doc.tiles_mut(id).expect("tile layer"), fill);
                    id
                }
                Step::QuadLayer { quads } => {
                    let id = doc.new_quad_layer();
                    for quad in fixtures::quad_row(quads) {
                        doc.add_quad(id, quad).expect("quad layer");
                    }
                    id
                }
            };
            if groups.is_empty() {
                groups.push(doc.new_group("Background"));
            }
            let group = *groups.last().expect("group exists");
            doc.group_add_layer(group, layer).expect("group has room");
            layers.push(layer);
        }
        log::debug!(
            "test document built with {} groups and {} layers",
            groups.len(),
            layers.len()
        );
        TestDoc {
            doc,
            groups,
            layers,
        }
    }
}

impl Default for TestDocBuilder {
    fn default() -> Self {
        Self::new()
    }
}
