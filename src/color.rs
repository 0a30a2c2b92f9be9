// src/color.rs

//! Defines the `Rgb` pixel color and the cursor contrast rule.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Channel sum-of-squares value separating "bright" pixels from "dark" ones
/// for the cursor marker. The comparison is strictly greater-than, so a
/// pixel at exactly (128, 128, 128) still counts as dark.
const MARKER_THRESHOLD: u32 = 3 * 128 * 128;

/// A single pixel color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Returns the marker color that contrasts with this pixel when the
    /// cursor sits on it: black over bright pixels, white over dark ones.
    ///
    /// Brightness is the sum of squared channels, weighing all channels
    /// equally rather than perceptually. One saturated channel is already
    /// enough to cross the threshold.
    pub fn cursor_marker(self) -> Rgb {
        let sq = |c: u8| u32::from(c) * u32::from(c);
        if sq(self.r) + sq(self.g) + sq(self.b) > MARKER_THRESHOLD {
            Rgb::BLACK
        } else {
            Rgb::WHITE
        }
    }
}

impl fmt::Display for Rgb {
    /// Formats as `#rrggbb`, the form shown in the status line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
