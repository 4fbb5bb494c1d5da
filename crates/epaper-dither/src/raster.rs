//! Row-major RGB raster shared by every pipeline stage.

use crate::color::Rgb;
use crate::preprocess::GeometryError;

/// A `width` x `height` grid of 8-bit RGB pixels, row-major, origin top-left.
///
/// Stages take a raster by reference and return a new one, so at any point
/// in the pipeline exactly one stage owns the pixels it is writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl Raster {
    /// Wrap an existing pixel buffer.
    ///
    /// # Errors
    ///
    /// [`GeometryError::BufferSize`] if `pixels.len() != width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<Rgb>) -> Result<Self, GeometryError> {
        if pixels.len() as u64 != width as u64 * height as u64 {
            return Err(GeometryError::BufferSize {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build from packed `RGBRGB...` bytes as produced by image decoders.
    ///
    /// # Errors
    ///
    /// [`GeometryError::BufferSize`] if `bytes.len() != width * height * 3`.
    pub fn from_rgb_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, GeometryError> {
        if bytes.len() as u64 != width as u64 * height as u64 * 3 {
            return Err(GeometryError::BufferSize {
                width,
                height,
                len: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Internal constructor for stages that size their output themselves.
    pub(crate) fn from_parts(width: u32, height: u32, pixels: Vec<Rgb>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// A raster of one solid color.
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<Rgb> {
        self.pixels
    }

    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the raster.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Rgb {
        self.pixels[self.offset(x, y)]
    }

    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the raster.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Rgb) {
        let i = self.offset(x, y);
        self.pixels[i] = color;
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        y as usize * self.width as usize + x as usize
    }

    /// Packed `RGBRGB...` bytes.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_array()).collect()
    }
}
