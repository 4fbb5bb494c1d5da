//! Index raster produced by the ditherer.

use crate::color::Rgb;
use crate::palette::{ActivePalette, Palette, PaletteSource};
use crate::raster::Raster;

/// One palette index per pixel, row-major.
///
/// The indexed form is canonical; RGB previews are computed on demand.
///
/// ```
/// use epaper_dither::{DitheredImage, Palette, PaletteSource, Rgb};
///
/// let image = DitheredImage::new(vec![0, 1, 1, 0], 2, 2);
/// let preview = image.preview(&Palette::spectra6(), PaletteSource::Theoretical);
/// assert_eq!(preview.get(1, 0), Rgb::WHITE);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DitheredImage {
    indices: Vec<u8>,
    width: u32,
    height: u32,
}

impl DitheredImage {
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `indices.len() == width * height`.
    pub fn new(indices: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            indices.len(),
            width as usize * height as usize,
            "indices length must match {width}x{height}"
        );
        Self {
            indices,
            width,
            height,
        }
    }

    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<u8> {
        self.indices
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Count of pixels per index, for logging and tests.
    pub fn histogram(&self) -> [usize; 16] {
        let mut counts = [0usize; 16];
        for &i in &self.indices {
            counts[(i & 0x0F) as usize] += 1;
        }
        counts
    }

    /// How the frame should look, rendered with the colors of `source`.
    ///
    /// `Theoretical` gives the colors sent to the panel; `Measured` gives
    /// what the panel actually shows, falling back per entry like a render.
    /// Unknown indices preview as black.
    pub fn preview(&self, palette: &Palette, source: PaletteSource) -> Raster {
        self.preview_with(&palette.resolve(source))
    }

    /// Preview with an already resolved palette.
    pub fn preview_with(&self, palette: &ActivePalette) -> Raster {
        let mut lut = [Rgb::BLACK; 16];
        for entry in palette.entries() {
            if let Some(slot) = lut.get_mut(entry.index as usize) {
                *slot = entry.color;
            }
        }
        let pixels = self
            .indices
            .iter()
            .map(|&i| lut.get(i as usize).copied().unwrap_or(Rgb::BLACK))
            .collect();
        Raster::from_parts(self.width, self.height, pixels)
    }
}
