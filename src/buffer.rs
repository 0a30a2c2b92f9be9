// src/buffer.rs

//! Pixel storage shared by the canvas and the palette.
//!
//! A `PixelBuffer` owns a `dy x dx` grid of RGB triples in a flat row-major
//! vector. The terminal packs two pixel rows into every text row, so the
//! visible row count floors the division: a buffer with an odd height keeps
//! its last pixel row in storage and in saved files, but that row is never
//! rendered.

use crate::color::Rgb;
use crate::error::EditorError;

use image::{ColorType, ImageFormat, RgbImage};
use log::debug;
use std::io::Cursor;

/// A rectangular grid of pixels, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<Rgb>,
    dx: usize,
    dy: usize,
}

impl PixelBuffer {
    /// Creates a buffer with every cell set to `fill`.
    pub fn filled(dx: usize, dy: usize, fill: Rgb) -> Result<Self, EditorError> {
        Self::from_fn(dx, dy, |_, _| fill)
    }

    /// Creates a buffer with each cell produced by `init(x, y)`.
    pub fn from_fn(
        dx: usize,
        dy: usize,
        mut init: impl FnMut(usize, usize) -> Rgb,
    ) -> Result<Self, EditorError> {
        if dx == 0 || dy == 0 {
            return Err(EditorError::InvalidDimension { dx, dy });
        }
        let mut pixels = Vec::with_capacity(dx * dy);
        for y in 0..dy {
            for x in 0..dx {
                pixels.push(init(x, y));
            }
        }
        Ok(PixelBuffer { pixels, dx, dy })
    }

    #[inline(always)]
    pub fn dx(&self) -> usize {
        self.dx
    }

    #[inline(always)]
    pub fn dy(&self) -> usize {
        self.dy
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.dx, self.dy)
    }

    /// Text rows needed to show this buffer, two pixel rows per text row.
    /// Odd heights floor, leaving the last pixel row off screen.
    pub fn visible_rows(&self) -> usize {
        self.dy / 2
    }

    /// Gets the pixel at (x, y).
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds. Call sites clamp first;
    /// a bad index here is a bug, not a runtime condition.
    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        assert!(
            x < self.dx && y < self.dy,
            "pixel access out of bounds: ({}, {}) on a {}x{} buffer",
            x,
            y,
            self.dx,
            self.dy
        );
        self.pixels[y * self.dx + x]
    }

    /// Sets the pixel at (x, y). Same bounds contract as [`get`](Self::get).
    #[inline(always)]
    pub fn set(&mut self, x: usize, y: usize, color: Rgb) {
        assert!(
            x < self.dx && y < self.dy,
            "pixel access out of bounds: ({}, {}) on a {}x{} buffer",
            x,
            y,
            self.dx,
            self.dy
        );
        self.pixels[y * self.dx + x] = color;
    }

    /// Decodes PNG bytes into a new buffer.
    ///
    /// Only formats that map losslessly onto an RGB triple grid are
    /// accepted: 8-bit RGB and 8-bit grayscale. Anything carrying alpha or
    /// deeper channels is rejected so a later save cannot silently drop
    /// information.
    pub fn from_png_bytes(bytes: &[u8]) -> Result<Self, EditorError> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| EditorError::Decode(e.to_string()))?;
        let rgb: RgbImage = match decoded.color() {
            ColorType::Rgb8 | ColorType::L8 => decoded.into_rgb8(),
            other => {
                return Err(EditorError::Decode(format!(
                    "unsupported pixel format {:?}, expected 8-bit RGB",
                    other
                )))
            }
        };
        let (w, h) = rgb.dimensions();
        debug!("Decoded {}x{} image.", w, h);
        Self::from_fn(w as usize, h as usize, |x, y| {
            let p = rgb.get_pixel(x as u32, y as u32).0;
            Rgb::new(p[0], p[1], p[2])
        })
    }

    /// Encodes the grid as PNG bytes: 8-bit RGB, no alpha, exact round trip.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, EditorError> {
        let mut raw = Vec::with_capacity(self.pixels.len() * 3);
        for p in &self.pixels {
            raw.extend_from_slice(&[p.r, p.g, p.b]);
        }
        let img = RgbImage::from_raw(self.dx as u32, self.dy as u32, raw)
            .ok_or_else(|| EditorError::Encode("pixel data does not match dimensions".into()))?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| EditorError::Encode(e.to_string()))?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_buffer_has_requested_dimensions_and_fill() {
        let buf = PixelBuffer::filled(3, 5, Rgb::new(10, 20, 30)).unwrap();
        assert_eq!(buf.dimensions(), (3, 5));
        for y in 0..5 {
            for x in 0..3 {
                assert_eq!(buf.get(x, y), Rgb::new(10, 20, 30));
            }
        }
    }

    #[test]
    fn from_fn_runs_the_initializer_per_cell() {
        let buf = PixelBuffer::from_fn(4, 2, |x, y| Rgb::new(x as u8, y as u8, 0)).unwrap();
        assert_eq!(buf.get(3, 1), Rgb::new(3, 1, 0));
        assert_eq!(buf.get(0, 0), Rgb::new(0, 0, 0));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert_eq!(
            PixelBuffer::filled(0, 5, Rgb::BLACK),
            Err(EditorError::InvalidDimension { dx: 0, dy: 5 })
        );
        assert_eq!(
            PixelBuffer::filled(5, 0, Rgb::BLACK),
            Err(EditorError::InvalidDimension { dx: 5, dy: 0 })
        );
    }

    #[test]
    fn get_set_round_trips() {
        let mut buf = PixelBuffer::filled(10, 10, Rgb::BLACK).unwrap();
        buf.set(7, 3, Rgb::new(1, 2, 3));
        assert_eq!(buf.get(7, 3), Rgb::new(1, 2, 3));
        assert_eq!(buf.get(3, 7), Rgb::BLACK, "transposed cell must stay untouched");
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn get_panics_outside_the_grid() {
        let buf = PixelBuffer::filled(4, 4, Rgb::BLACK).unwrap();
        // x is within the flat allocation but outside the row, which is
        // exactly the case a flat index would miss.
        let _ = buf.get(4, 0);
    }

    #[test]
    fn visible_rows_floors_odd_heights() {
        let even = PixelBuffer::filled(4, 6, Rgb::BLACK).unwrap();
        assert_eq!(even.visible_rows(), 3);
        let odd = PixelBuffer::filled(4, 5, Rgb::BLACK).unwrap();
        assert_eq!(odd.visible_rows(), 2, "the fifth pixel row never renders");
        let single = PixelBuffer::filled(4, 1, Rgb::BLACK).unwrap();
        assert_eq!(single.visible_rows(), 0);
    }

    #[test]
    fn png_round_trip_is_lossless() {
        let original =
            PixelBuffer::from_fn(7, 5, |x, y| Rgb::new(x as u8 * 30, y as u8 * 40, 255)).unwrap();
        let bytes = original.to_png_bytes().unwrap();
        let reloaded = PixelBuffer::from_png_bytes(&bytes).unwrap();
        assert_eq!(reloaded, original);
    }

    #[test]
    fn png_round_trip_keeps_the_odd_row() {
        // The unrendered last row of an odd-height buffer still saves.
        let mut original = PixelBuffer::filled(3, 5, Rgb::BLACK).unwrap();
        original.set(1, 4, Rgb::new(9, 9, 9));
        let reloaded = PixelBuffer::from_png_bytes(&original.to_png_bytes().unwrap()).unwrap();
        assert_eq!(reloaded.get(1, 4), Rgb::new(9, 9, 9));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = PixelBuffer::from_png_bytes(b"not a png at all").unwrap_err();
        assert!(matches!(err, EditorError::Decode(_)));
    }
}
