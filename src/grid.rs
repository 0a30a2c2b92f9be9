// src/grid.rs

//! The canvas and palette grids behind a shared capability trait.
//!
//! `PixelGrid` is the surface the cursor, renderer, and key actions work
//! against. Its defaults describe a read-only grid: painting and loading do
//! nothing and saving yields `None`. `Canvas` opts into the full
//! read/write/IO set; `Palette` keeps the defaults, so the paint and file
//! keys are harmless while it is focused without any key-level special
//! casing.

use crate::buffer::PixelBuffer;
use crate::color::Rgb;
use crate::error::EditorError;

use log::info;
use rand::Rng;

/// A grid of pixels the editor can walk, sample, and possibly mutate.
pub trait PixelGrid {
    /// The backing pixel storage, for rendering and sampling.
    fn buffer(&self) -> &PixelBuffer;

    /// Reads the color under (x, y). Same bounds contract as
    /// [`PixelBuffer::get`].
    fn sample(&self, x: usize, y: usize) -> Rgb {
        self.buffer().get(x, y)
    }

    /// Writes `color` at (x, y). Read-only grids ignore the write.
    fn paint(&mut self, _x: usize, _y: usize, _color: Rgb) {}

    /// Whether `load_raster` can actually replace this grid's content.
    /// Callers check this before doing any file work.
    fn loads_raster(&self) -> bool {
        false
    }

    /// Replaces the grid content from PNG bytes. `Ok(None)` means the grid
    /// does not load; `Ok(Some((dx, dy)))` carries the new dimensions so
    /// the caller can re-clamp its cursor.
    fn load_raster(&mut self, _bytes: &[u8]) -> Result<Option<(usize, usize)>, EditorError> {
        Ok(None)
    }

    /// Encodes the grid as PNG bytes, or `None` for grids that do not save.
    fn to_raster(&self) -> Option<Result<Vec<u8>, EditorError>> {
        None
    }
}

/// The editable drawing surface.
#[derive(Debug, Clone)]
pub struct Canvas {
    buffer: PixelBuffer,
}

impl Canvas {
    pub fn new(buffer: PixelBuffer) -> Self {
        Canvas { buffer }
    }

    /// Creates a canvas filled with random noise, the starting state for a
    /// fresh drawing.
    pub fn noise(dx: usize, dy: usize) -> Result<Self, EditorError> {
        let mut rng = rand::rng();
        let buffer =
            PixelBuffer::from_fn(dx, dy, |_, _| Rgb::new(rng.random(), rng.random(), rng.random()))?;
        Ok(Canvas { buffer })
    }
}

impl PixelGrid for Canvas {
    fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    fn paint(&mut self, x: usize, y: usize, color: Rgb) {
        self.buffer.set(x, y, color);
    }

    fn loads_raster(&self) -> bool {
        true
    }

    fn load_raster(&mut self, bytes: &[u8]) -> Result<Option<(usize, usize)>, EditorError> {
        // Decode into a fresh buffer first so a failure leaves the current
        // drawing untouched.
        let replacement = PixelBuffer::from_png_bytes(bytes)?;
        let dims = replacement.dimensions();
        info!("Canvas replaced by loaded image, now {}x{}.", dims.0, dims.1);
        self.buffer = replacement;
        Ok(Some(dims))
    }

    fn to_raster(&self) -> Option<Result<Vec<u8>, EditorError>> {
        Some(self.buffer.to_png_bytes())
    }
}

/// The fixed swatch table, row-major. Sixteen colors, two rows of eight.
const SWATCHES: [[Rgb; 8]; 2] = [
    [
        Rgb::new(36, 38, 54),
        Rgb::new(93, 39, 93),
        Rgb::new(177, 62, 73),
        Rgb::new(239, 125, 87),
        Rgb::new(255, 205, 117),
        Rgb::new(167, 240, 112),
        Rgb::new(56, 183, 100),
        Rgb::new(37, 113, 121),
    ],
    [
        Rgb::new(41, 54, 111),
        Rgb::new(59, 93, 201),
        Rgb::new(65, 166, 246),
        Rgb::new(115, 239, 247),
        Rgb::new(244, 244, 244),
        Rgb::new(148, 176, 194),
        Rgb::new(86, 108, 134),
        Rgb::new(51, 60, 87),
    ],
];

/// The 8x2 swatch grid. Sampling works like any grid; paint, save, and
/// load fall through to the read-only defaults.
#[derive(Debug, Clone)]
pub struct Palette {
    buffer: PixelBuffer,
}

impl Palette {
    pub fn new() -> Self {
        let buffer = PixelBuffer::from_fn(SWATCHES[0].len(), SWATCHES.len(), |x, y| SWATCHES[y][x])
            .expect("swatch table dimensions are fixed and non-zero");
        Palette { buffer }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelGrid for Palette {
    fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }
}
