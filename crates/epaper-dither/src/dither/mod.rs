//! Error-diffusion dithering.
//!
//! Pixels are visited in raster order (left to right, top to bottom, never
//! serpentine). Each one gets the error accumulated from earlier pixels,
//! is quantized with [`ActivePalette::find_nearest`], and passes its residual
//! on through a [`Kernel`]. Algorithms differ only in their kernel.
//!
//! ```
//! use epaper_dither::{ColorMethod, Dither, DitherAlgorithm, Palette, PaletteSource, Raster, Rgb};
//!
//! let palette = Palette::spectra6().resolve(PaletteSource::Theoretical);
//! let raster = Raster::filled(16, 16, Rgb::new(128, 128, 128));
//!
//! let indices = DitherAlgorithm::FloydSteinberg.dither(&raster, &palette, ColorMethod::Rgb);
//! assert_eq!(indices.len(), 256);
//! assert!(indices.iter().all(|&i| i == 0 || i == 1));
//! ```

mod diffusion;
mod kernel;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::palette::{ActivePalette, ColorMethod};
use crate::raster::Raster;

pub use diffusion::{ErrorBuffer, ErrorDiffusion};
pub use kernel::*;

/// Turns an adjusted raster into one palette index per pixel.
pub trait Dither {
    /// Returns `raster.width() * raster.height()` indices, row-major, each
    /// one an index of `palette`.
    fn dither(&self, raster: &Raster, palette: &ActivePalette, method: ColorMethod) -> Vec<u8>;
}

/// Selectable diffusion algorithm, named as in the settings API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DitherAlgorithm {
    #[default]
    FloydSteinberg,
    Stucki,
    Burkes,
    Sierra,
    SierraTwoRow,
    SierraLite,
    #[serde(alias = "jjn")]
    JarvisJudiceNinke,
    Atkinson,
}

impl DitherAlgorithm {
    pub const ALL: [DitherAlgorithm; 8] = [
        DitherAlgorithm::FloydSteinberg,
        DitherAlgorithm::Stucki,
        DitherAlgorithm::Burkes,
        DitherAlgorithm::Sierra,
        DitherAlgorithm::SierraTwoRow,
        DitherAlgorithm::SierraLite,
        DitherAlgorithm::JarvisJudiceNinke,
        DitherAlgorithm::Atkinson,
    ];

    pub fn kernel(self) -> &'static Kernel {
        match self {
            DitherAlgorithm::FloydSteinberg => &FLOYD_STEINBERG,
            DitherAlgorithm::Stucki => &STUCKI,
            DitherAlgorithm::Burkes => &BURKES,
            DitherAlgorithm::Sierra => &SIERRA,
            DitherAlgorithm::SierraTwoRow => &SIERRA_TWO_ROW,
            DitherAlgorithm::SierraLite => &SIERRA_LITE,
            DitherAlgorithm::JarvisJudiceNinke => &JARVIS_JUDICE_NINKE,
            DitherAlgorithm::Atkinson => &ATKINSON,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DitherAlgorithm::FloydSteinberg => "floyd-steinberg",
            DitherAlgorithm::Stucki => "stucki",
            DitherAlgorithm::Burkes => "burkes",
            DitherAlgorithm::Sierra => "sierra",
            DitherAlgorithm::SierraTwoRow => "sierra-two-row",
            DitherAlgorithm::SierraLite => "sierra-lite",
            DitherAlgorithm::JarvisJudiceNinke => "jarvis-judice-ninke",
            DitherAlgorithm::Atkinson => "atkinson",
        }
    }
}

impl Dither for DitherAlgorithm {
    fn dither(&self, raster: &Raster, palette: &ActivePalette, method: ColorMethod) -> Vec<u8> {
        ErrorDiffusion::new(self.kernel()).dither(raster, palette, method)
    }
}

impl fmt::Display for DitherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DitherAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s == "jjn" {
            return Ok(DitherAlgorithm::JarvisJudiceNinke);
        }
        DitherAlgorithm::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| format!("unknown dither algorithm {s:?}"))
    }
}
