//! Reusable element fixtures.
//!
//! - [`checkerboard`] / [`fill_tiles`]: tile patterns with known contents.
//! - [`quad_row`]: quads that can be told apart by their centre.
//! - [`linear_envelope`]: evenly spaced envelope keyframes.

use mapedit_doc::{EnvPoint, Point, Quad, Tile};

/// Set every tile to index `index`.
pub fn fill_tiles(tiles: &mut [Tile], index: u8) {
    tiles.fill(Tile::new(index));
}

/// A `width` x `height` row-major checkerboard of indices `a` and `b`.
pub fn checkerboard(width: u32, height: u32, a: u8, b: u8) -> Vec<Tile> {
    (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| Tile::new(if (x + y) % 2 == 0 { a } else { b }))
        .collect()
}

/// `count` unit quads centred at `(i, 0)` for `i` in `0..count`.
pub fn quad_row(count: usize) -> Vec<Quad> {
    (0..count)
        .map(|i| Quad::centered(Point { x: i as i32, y: 0 }, 1, 1))
        .collect()
}

/// `count` keyframes `step_ms` apart with the first channel ramping up.
pub fn linear_envelope(count: usize, step_ms: i32) -> Vec<EnvPoint> {
    (0..count as i32)
        .map(|i| EnvPoint {
            time: i * step_ms,
            curve_type: 1,
            values: [i * 1024, 0, 0, 0],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_alternates() {
        let tiles = checkerboard(3, 2, 1, 2);
        let idx: Vec<u8> = tiles.iter().map(|t| t.index).collect();
        assert_eq!(idx, vec![1, 2, 1, 2, 1, 2]);
    }

    #[test]
    fn envelope_is_evenly_spaced() {
        let points = linear_envelope(3, 100);
        assert_eq!(points[2].time, 200);
        assert_eq!(points[1].values[0], 1024);
    }
}
