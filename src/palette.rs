use std::fmt;
use std::sync::OnceLock;

use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Default number of channel levels per axis (32³ = 32768 colors).
pub const DEFAULT_LEVELS: usize = 32;

/// Channel intensities ordered by bisection: every prefix is as spread out
/// over `0..=255` as that many values can be.
const CHANNEL_VALUES: [u8; 256] = bisection_order();

const fn bisection_order() -> [u8; 256] {
    let mut out = [0u8; 256];
    let mut seen = [false; 256];
    seen[0] = true;
    let mut len = 1;
    let mut step = 256usize;
    while step >= 1 {
        let mut v = step - 1;
        while v < 256 {
            if !seen[v] {
                seen[v] = true;
                out[len] = v as u8;
                len += 1;
            }
            v += step * 2;
        }
        step /= 2;
    }
    out
}

/// Which of (R, G, B) sit on the current level. Every non-empty subset, in
/// enumeration order.
const FIXED_CHANNELS: [(bool, bool, bool); 7] = [
    (false, false, true),
    (false, true, false),
    (false, true, true),
    (true, false, false),
    (true, false, true),
    (true, true, false),
    (true, true, true),
];

/// Channel intensity at position `index` of the bisection table.
///
/// Panics if `index > 255`: callers only ever pass palette levels, so an
/// out-of-range index is a bug in palette construction.
pub fn channel_value(index: usize) -> u8 {
    assert!(
        index < CHANNEL_VALUES.len(),
        "channel index {index} outside 0..=255"
    );
    CHANNEL_VALUES[index]
}

/// RGBA8 annotation color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Fresh markers hold this until the first color write.
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Normalized tint for shader uniforms.
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.r as f32, self.g as f32, self.b as f32, self.a as f32) / 255.0
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Color> for [u8; 4] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

/// Same text form the segmentation server answers `/object/<name>/color` with.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(R={},G={},B={},A={})", self.r, self.g, self.b, self.a)
    }
}

/// Deterministic palette of maximally separated colors.
///
/// Colors are enumerated shell by shell over a `levels³` cube: level `m`
/// holds every color whose highest channel index is exactly `m`, so the
/// first entries are black, the primaries, then the cube corners, and finer
/// gradations only appear later. The table is built on first lookup.
pub struct Palette {
    levels: usize,
    colors: OnceLock<Vec<Color>>,
}

impl Palette {
    /// Panics if `levels` is outside `1..=256`.
    pub fn new(levels: usize) -> Self {
        assert!(
            (1..=CHANNEL_VALUES.len()).contains(&levels),
            "palette levels {levels} outside 1..=256"
        );
        Self {
            levels,
            colors: OnceLock::new(),
        }
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Number of distinct colors before lookups wrap around.
    pub fn len(&self) -> usize {
        self.levels.pow(3)
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Color for `index`. Indices past the end wrap modulo [`Palette::len`],
    /// so very large scenes start reusing colors instead of failing.
    pub fn color(&self, index: usize) -> Color {
        let colors = self.colors();
        colors[index % colors.len()]
    }

    fn colors(&self) -> &[Color] {
        self.colors.get_or_init(|| {
            let mut colors = Vec::with_capacity(self.len());
            for level in 0..self.levels {
                for &fixed in &FIXED_CHANNELS {
                    push_shell(level, fixed, &mut colors);
                }
            }
            log::debug!("built annotation palette: {} colors", colors.len());
            colors
        })
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(DEFAULT_LEVELS)
    }
}

/// Fixed channels sit at `level`, free channels range over `0..level`.
fn push_shell(level: usize, (fix_r, fix_g, fix_b): (bool, bool, bool), out: &mut Vec<Color>) {
    let span = |fixed: bool| if fixed { level..level + 1 } else { 0..level };
    for r in span(fix_r) {
        for g in span(fix_g) {
            for b in span(fix_b) {
                out.push(Color::rgb(
                    channel_value(r),
                    channel_value(g),
                    channel_value(b),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn channel_table_starts_with_bisection_midpoints() {
        let head: Vec<u8> = (0..9).map(channel_value).collect();
        assert_eq!(head, vec![0, 255, 127, 63, 191, 31, 95, 159, 223]);
    }

    #[test]
    fn channel_table_is_a_permutation() {
        let all: HashSet<u8> = (0..256).map(channel_value).collect();
        assert_eq!(all.len(), 256);
    }

    #[test]
    #[should_panic(expected = "outside 0..=255")]
    fn channel_index_out_of_range_panics() {
        channel_value(256);
    }

    #[test]
    fn first_colors_are_black_primaries_then_white() {
        let palette = Palette::default();
        assert_eq!(palette.color(0), Color::BLACK);
        assert_eq!(palette.color(1), Color::rgb(0, 0, 255));
        assert_eq!(palette.color(2), Color::rgb(0, 255, 0));
        assert_eq!(palette.color(4), Color::rgb(255, 0, 0));
        assert_eq!(palette.color(7), Color::WHITE);
        // Level 2 opens with the mid-intensity blue.
        assert_eq!(palette.color(8), Color::rgb(0, 0, 127));
    }

    #[test]
    fn default_palette_has_no_collisions() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 32 * 32 * 32);
        let distinct: HashSet<Color> = (0..palette.len()).map(|i| palette.color(i)).collect();
        assert_eq!(distinct.len(), palette.len());
        assert!((0..palette.len()).all(|i| palette.color(i).a == 255));
    }

    #[test]
    fn lookups_wrap_around() {
        let palette = Palette::new(4);
        assert_eq!(palette.len(), 64);
        for i in [0, 1, 17, 63] {
            assert_eq!(palette.color(i), palette.color(i + palette.len()));
        }
    }

    #[test]
    fn display_matches_server_format() {
        assert_eq!(Color::rgb(0, 127, 255).to_string(), "(R=0,G=127,B=255,A=255)");
    }

    #[test]
    fn tint_is_normalized() {
        assert_eq!(Color::WHITE.to_vec4(), Vec4::ONE);
        assert_eq!(Color::TRANSPARENT.to_vec4(), Vec4::ZERO);
    }
}
