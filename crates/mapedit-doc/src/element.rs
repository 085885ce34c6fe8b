//! Plain element types stored in the document's pools.
//!
//! Tiles, quads, envelope points and envelopes are `#[repr(C)]` plain old
//! data so renderers and writers can consume pooled arrays as raw bytes.
//! Names are fixed-size [`FixedStr`] buffers so the types that carry them
//! stay free of heap allocations.

use std::fmt;

use bytemuck::{Pod, Zeroable};

/// One cell of a tile layer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Tile {
    /// Tile index into the layer's image, 0 for an empty cell.
    pub index: u8,
    /// Combination of the `FLAG_*` bits.
    pub flags: u8,
    /// Run-length skip count used by the map writer.
    pub skip: u8,
    /// Reserved, always zero.
    pub reserved: u8,
}

impl Tile {
    /// Flip vertically.
    pub const FLAG_VFLIP: u8 = 1;
    /// Flip horizontally.
    pub const FLAG_HFLIP: u8 = 2;
    /// Fully opaque, lets the renderer skip blending.
    pub const FLAG_OPAQUE: u8 = 4;
    /// Rotate by 90 degrees.
    pub const FLAG_ROTATE: u8 = 8;

    /// A tile with the given index and no flags.
    pub const fn new(index: u8) -> Self {
        Self {
            index,
            flags: 0,
            skip: 0,
            reserved: 0,
        }
    }

    /// Whether the cell is empty.
    pub fn is_empty(&self) -> bool {
        self.index == 0
    }
}

/// A fixed-point 2D position (22.10).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

/// An RGBA colour with 0..=255 channels.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Color {
    /// Red channel.
    pub r: i32,
    /// Green channel.
    pub g: i32,
    /// Blue channel.
    pub b: i32,
    /// Alpha channel.
    pub a: i32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };
}

/// A textured quad in a quad layer.
///
/// Points 0..4 are the corners, point 4 is the pivot.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Quad {
    /// Corner points followed by the pivot.
    pub points: [Point; 5],
    /// Per-corner colours.
    pub colors: [Color; 4],
    /// Per-corner texture coordinates.
    pub tex_coords: [Point; 4],
    /// Position envelope index, -1 for none.
    pub pos_env: i32,
    /// Time offset into the position envelope.
    pub pos_env_offset: i32,
    /// Colour envelope index, -1 for none.
    pub color_env: i32,
    /// Time offset into the colour envelope.
    pub color_env_offset: i32,
}

impl Quad {
    /// An axis-aligned white quad centred on `center` with the given half extents.
    pub fn centered(center: Point, half_width: i32, half_height: i32) -> Self {
        let corner = |dx: i32, dy: i32| Point {
            x: center.x + dx,
            y: center.y + dy,
        };
        Self {
            points: [
                corner(-half_width, -half_height),
                corner(half_width, -half_height),
                corner(-half_width, half_height),
                corner(half_width, half_height),
                center,
            ],
            colors: [Color::WHITE; 4],
            tex_coords: [
                Point { x: 0, y: 0 },
                Point { x: 1 << 10, y: 0 },
                Point { x: 0, y: 1 << 10 },
                Point { x: 1 << 10, y: 1 << 10 },
            ],
            pos_env: -1,
            pos_env_offset: 0,
            color_env: -1,
            color_env_offset: 0,
        }
    }
}

/// A keyframe of an envelope.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct EnvPoint {
    /// Time in milliseconds.
    pub time: i32,
    /// Interpolation curve towards the next point.
    pub curve_type: i32,
    /// Channel values (fixed-point).
    pub values: [i32; 4],
}

/// An animation envelope: a run of points in the document's point list.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Envelope {
    /// Envelope item version.
    pub version: i32,
    /// Number of channels used (1 sound, 3 position, 4 colour).
    pub channels: i32,
    /// Index of the first point in the document's point list.
    pub start_point: i32,
    /// Number of points.
    pub num_points: i32,
    /// Non-zero when the envelope follows server time.
    pub synchronized: i32,
}

/// A NUL-padded UTF-8 string of at most `N - 1` bytes.
///
/// Longer input is cut at the last character boundary that fits.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedStr<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> FixedStr<N> {
    /// Build from `s`, truncating as needed.
    pub fn new(s: &str) -> Self {
        let mut out = Self::default();
        out.set(s);
        out
    }

    /// Replace the contents with `s`, truncating as needed.
    pub fn set(&mut self, s: &str) {
        let mut len = s.len().min(N.saturating_sub(1));
        while !s.is_char_boundary(len) {
            len -= 1;
        }
        self.bytes = [0; N];
        self.bytes[..len].copy_from_slice(&s.as_bytes()[..len]);
    }

    /// The stored text.
    pub fn as_str(&self) -> &str {
        let len = self.bytes.iter().position(|&b| b == 0).unwrap_or(N);
        std::str::from_utf8(&self.bytes[..len]).unwrap_or_default()
    }

    /// Whether no text is stored.
    pub fn is_empty(&self) -> bool {
        self.bytes.first().map_or(true, |&b| b == 0)
    }
}

impl<const N: usize> Default for FixedStr<N> {
    fn default() -> Self {
        Self { bytes: [0; N] }
    }
}

impl<const N: usize> fmt::Debug for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<const N: usize> fmt::Display for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pod_sizes_have_no_padding() {
        assert_eq!(std::mem::size_of::<Tile>(), 4);
        assert_eq!(std::mem::size_of::<Quad>(), (10 + 16 + 8 + 4) * 4);
        assert_eq!(std::mem::size_of::<EnvPoint>(), 24);
        assert_eq!(std::mem::size_of::<Envelope>(), 20);
    }

    #[test]
    fn default_elements_are_zero() {
        assert_eq!(bytemuck::bytes_of(&Tile::default()), &[0u8; 4]);
        assert!(bytemuck::bytes_of(&Quad::default()).iter().all(|&b| b == 0));
    }

    #[test]
    fn centered_quad_pivot_is_center() {
        let q = Quad::centered(Point { x: 10, y: 20 }, 4, 2);
        assert_eq!(q.points[4], Point { x: 10, y: 20 });
        assert_eq!(q.points[0], Point { x: 6, y: 18 });
        assert_eq!(q.points[3], Point { x: 14, y: 22 });
        assert_eq!(q.pos_env, -1);
    }

    #[test]
    fn fixed_str_round_trips_short_text() {
        let s: FixedStr<12> = FixedStr::new("Tiles");
        assert_eq!(s.as_str(), "Tiles");
        assert!(!s.is_empty());
        assert!(FixedStr::<12>::default().is_empty());
    }

    #[test]
    fn fixed_str_truncates_to_n_minus_one() {
        let s: FixedStr<4> = FixedStr::new("abcdef");
        assert_eq!(s.as_str(), "abc");
    }

    #[test]
    fn fixed_str_truncates_on_char_boundary() {
        // 'é' is two bytes; only "a" plus one byte of it would fit in 2.
        let s: FixedStr<3> = FixedStr::new("aé");
        assert_eq!(s.as_str(), "a");
    }

    #[test]
    fn fixed_str_set_overwrites_previous_text() {
        let mut s: FixedStr<8> = FixedStr::new("longer");
        s.set("ab");
        assert_eq!(s.as_str(), "ab");
    }
}
