//! End-to-end document scenarios: editing, brushes, history and clearing.

use mapedit_doc::{DocumentBudget, LayerId, MapDocument, Tile, UiFlags};
use mapedit_test_utils::fixtures::{checkerboard, linear_envelope};
use mapedit_test_utils::{init_logging, small_budget, TestDocBuilder};

#[test]
fn brush_round_trip_through_tile_pool() {
    init_logging();
    let mut built = TestDocBuilder::new().tile_layer(4, 4, 0).build();
    let layer = built.layers[0];
    let doc = &mut built.doc;

    let mut brush = doc.new_tile_array();
    brush.extend_from_slice(doc.tile_pool_mut(), &checkerboard(4, 4, 3, 5));
    let pattern: Vec<Tile> = brush.as_slice(doc.tile_pool_mut()).to_vec();
    doc.tiles_mut(layer).unwrap().copy_from_slice(&pattern);
    brush.clear(doc.tile_pool_mut());

    assert_eq!(doc.tile(layer, 0, 0).unwrap().index, 3);
    assert_eq!(doc.tile(layer, 1, 0).unwrap().index, 5);
    assert_eq!(doc.tile(layer, 1, 1).unwrap().index, 3);
}

#[test]
fn tile_bytes_match_element_layout() {
    let mut built = TestDocBuilder::new().tile_layer(2, 1, 0).build();
    let layer = built.layers[0];
    let mut tile = Tile::new(7);
    tile.flags = Tile::FLAG_HFLIP;
    built.doc.set_tile(layer, 1, 0, tile).unwrap();
    assert_eq!(built.doc.tile_bytes(layer).unwrap(), &[0u8, 0, 0, 0, 7, 2, 0, 0]);
}

#[test]
fn quad_pool_overflow_falls_back_and_recovers() {
    init_logging();
    let mut built = TestDocBuilder::new().quad_layer(0).build();
    let layer = built.layers[0];
    let doc = &mut built.doc;
    let quads = mapedit_test_utils::fixtures::quad_row(300);
    for quad in &quads {
        doc.add_quad(layer, *quad).unwrap();
    }
    assert_eq!(doc.quads(layer).unwrap().len(), 300);
    assert_eq!(doc.quads(layer).unwrap()[299].points[4].x, 299);
    assert!(doc.pools().quads.total_fallback_count() > 0);

    doc.delete_layer(layer).unwrap();
    assert_eq!(doc.pools().quads.live_fallback_count(), 0);
    assert_eq!(doc.pools().quads.used_ring_count(), 0);
}

#[test]
fn deleting_layers_keeps_ui_flags_aligned() {
    let mut built = TestDocBuilder::new()
        .tile_layer(2, 2, 1)
        .tile_layer(2, 2, 2)
        .tile_layer(2, 2, 3)
        .build();
    let doc = &mut built.doc;
    let mut flags = UiFlags::new();
    flags.sync(doc.group_count(), doc.layer_count());
    flags.set_layer_hidden(LayerId(2), true);

    doc.delete_layer(LayerId(0)).unwrap();
    flags.forget_layer(LayerId(0));
    flags.sync(doc.group_count(), doc.layer_count());

    assert!(flags.is_layer_hidden(LayerId(1)));
    assert_eq!(doc.tiles(LayerId(1)).unwrap()[0].index, 3);
}

#[test]
fn history_entries_survive_document_clear() {
    let mut doc = MapDocument::new(small_budget()).unwrap();
    doc.load_default();
    let entries: Vec<_> = (0..4)
        .map(|i| doc.new_history_entry("Paint", &format!("stroke {i}")))
        .collect();

    doc.load_default();

    let descriptions: Vec<&str> = entries
        .iter()
        .map(|e| doc.history_entry(e).description())
        .collect();
    assert_eq!(descriptions, ["stroke 0", "stroke 1", "stroke 2", "stroke 3"]);
    for entry in entries {
        doc.release_history_entry(entry);
    }
    assert_eq!(doc.pools().history.used_ring_count(), 0);
}

#[test]
fn envelopes_and_layers_after_repeated_clear() {
    let mut doc = MapDocument::new(small_budget()).unwrap();
    for _ in 0..3 {
        doc.load_default();
        let env = doc.add_envelope(4, &linear_envelope(5, 250));
        assert_eq!(doc.envelope_points(env).unwrap().len(), 5);
        let q = doc.new_quad_layer();
        doc.add_quad(q, Default::default()).unwrap();
    }
    doc.clear();
    let report = doc.memory_report();
    assert!(report.pools[..6].iter().all(|p| p.used_rings == 0));
}

#[test]
fn budget_from_toml_drives_pool_sizes() {
    let doc = MapDocument::from_budget_toml(
        "[tiles]\nelement_count_max = 2048\nring_element_count = 32\n",
    )
    .unwrap();
    let tiles = doc.memory_report().pool("tiles").copied().unwrap();
    assert_eq!(tiles.capacity, 2048);
    assert_eq!(tiles.ring_count, 64);
    assert_eq!(
        doc.memory_report().pool("quads").unwrap().capacity,
        DocumentBudget::DEFAULT_QUADS.element_count_max
    );
}
