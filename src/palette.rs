// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Fixed color palette for grid cells

use crate::{LabelError, Result};

/// Display-only value meaning "any non-background cell"
pub const SENTINEL: u8 = 10;

/// Number of palette entries (colors 0..=SENTINEL)
pub const PALETTE_LEN: usize = 11;

/// A named RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub name: &'static str,
    pub rgb: [u8; 3],
}

const fn color(name: &'static str, r: u8, g: u8, b: u8) -> Color {
    Color { name, rgb: [r, g, b] }
}

/// Palette indexed by cell value
pub const PALETTE: [Color; PALETTE_LEN] = [
    color("white", 255, 255, 255),
    color("cornflowerblue", 100, 149, 237),
    color("tomato", 255, 99, 71),
    color("lime", 0, 255, 0),
    color("yellow", 255, 255, 0),
    color("lightgrey", 211, 211, 211),
    color("magenta", 255, 0, 255),
    color("orange", 255, 165, 0),
    color("aqua", 0, 255, 255),
    color("maroon", 128, 0, 0),
    color("black", 0, 0, 0),
];

/// Cell border color
pub const GRID_LINE: Color = color("darkgrey", 169, 169, 169);

/// Bin boundaries: value `v` falls in bin `i` when `BOUNDARIES[i] <= v < BOUNDARIES[i + 1]`
pub const BOUNDARIES: [f32; PALETTE_LEN + 1] =
    [-0.5, 0.5, 1.5, 2.5, 3.5, 4.5, 5.5, 6.5, 7.5, 8.5, 9.5, 10.5];

/// Map a value onto its palette bin
pub fn bin(value: f32) -> Option<usize> {
    BOUNDARIES
        .windows(2)
        .position(|w| w[0] <= value && value < w[1])
}

/// Look up the color for a cell value
pub fn color_for(value: u8) -> Result<Color> {
    bin(f32::from(value))
        .map(|i| PALETTE[i])
        .ok_or_else(|| LabelError::Render(format!("Cell value {} is outside the palette", value)))
}
