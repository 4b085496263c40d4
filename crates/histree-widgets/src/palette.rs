//! Branch color assignment.
//!
//! Each branch of the version graph gets a stable color, handed out by
//! cycling through the solarized accent palette (desaturated twice so
//! node labels stay readable on top). Assignment is cached per branch id;
//! [`BranchPalette::reset`] forgets all assignments, which hosts call
//! together with [`VersionTree::clear`](histree_core::VersionTree::clear).

use histree_core::BranchId;
use rustc_hash::FxHashMap;

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Reduce saturation by `factor` (0.0 greys out, 1.0 is identity),
    /// keeping hue and brightness.
    #[must_use]
    pub fn desaturate(self, factor: f32) -> Self {
        let (h, s, v) = self.to_hsv();
        Self::from_hsv(h, (s * factor).clamp(0.0, 1.0), v)
    }

    fn to_hsv(self) -> (f32, f32, f32) {
        let r = f32::from(self.r) / 255.0;
        let g = f32::from(self.g) / 255.0;
        let b = f32::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let s = if max == 0.0 { 0.0 } else { delta / max };
        (h, s, max)
    }

    fn from_hsv(h: f32, s: f32, v: f32) -> Self {
        let c = v * s;
        let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
        let m = v - c;
        let (r, g, b) = match h {
            h if h < 60.0 => (c, x, 0.0),
            h if h < 120.0 => (x, c, 0.0),
            h if h < 180.0 => (0.0, c, x),
            h if h < 240.0 => (0.0, x, c),
            h if h < 300.0 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        Self {
            r: ((r + m) * 255.0).round() as u8,
            g: ((g + m) * 255.0).round() as u8,
            b: ((b + m) * 255.0).round() as u8,
        }
    }
}

/// The eight solarized accent colors, in cycling order.
pub const SOLARIZED_ACCENTS: [Rgb; 8] = [
    Rgb::new(0xb5, 0x89, 0x00), // yellow
    Rgb::new(0xcb, 0x4b, 0x16), // orange
    Rgb::new(0xdc, 0x32, 0x2f), // red
    Rgb::new(0xd3, 0x36, 0x82), // magenta
    Rgb::new(0x6c, 0x71, 0xc4), // violet
    Rgb::new(0x26, 0x8b, 0xd2), // blue
    Rgb::new(0x2a, 0xa1, 0x98), // cyan
    Rgb::new(0x85, 0x99, 0x00), // green
];

/// Cycling, per-branch color assignment.
#[derive(Debug, Clone)]
pub struct BranchPalette {
    colors: [Rgb; 8],
    assigned: FxHashMap<BranchId, Rgb>,
    next: usize,
}

impl Default for BranchPalette {
    fn default() -> Self {
        Self::new()
    }
}

impl BranchPalette {
    /// Palette over the desaturated solarized accents.
    #[must_use]
    pub fn new() -> Self {
        Self {
            colors: SOLARIZED_ACCENTS.map(|c| c.desaturate(0.7).desaturate(0.7)),
            assigned: FxHashMap::default(),
            next: 0,
        }
    }

    /// The color assigned to `branch`, assigning the next palette entry
    /// on first sight. Stable until [`reset`](Self::reset).
    pub fn color_of(&mut self, branch: BranchId) -> Rgb {
        if let Some(&color) = self.assigned.get(&branch) {
            return color;
        }
        let color = self.colors[self.next % self.colors.len()];
        self.next += 1;
        self.assigned.insert(branch, color);
        color
    }

    /// Forget all assignments and restart the cycle.
    pub fn reset(&mut self) {
        self.assigned.clear();
        self.next = 0;
    }
}
