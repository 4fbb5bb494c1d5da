//! Resolved palette and nearest-color quantization.

use serde::{Deserialize, Serialize};

use super::colorants::ColorantSet;
use super::palette::PaletteSource;
use crate::color::{LinearRgb, Oklab, Rgb};
use crate::raster::Raster;

/// Distance metric used by nearest-color search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMethod {
    /// Euclidean distance between 8-bit sRGB triples.
    #[default]
    Rgb,
    /// Euclidean distance in Oklab.
    #[serde(alias = "lab", alias = "oklab")]
    Perceptual,
}

impl std::str::FromStr for ColorMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rgb" => Ok(Self::Rgb),
            "perceptual" | "lab" | "oklab" => Ok(Self::Perceptual),
            other => Err(format!("unknown color method {other:?}")),
        }
    }
}

/// One colorant as seen by the quantizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveEntry {
    pub index: u8,
    pub color: Rgb,
    /// `color` on the 0.0..=255.0 scale, for residual math.
    pub channels: [f32; 3],
    pub oklab: Oklab,
}

/// A palette resolved against one [`PaletteSource`].
///
/// Read-only for the duration of a render. Entries are ordered by index so
/// that the first strictly-closer match wins and ties resolve to the lowest
/// index.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivePalette {
    source: PaletteSource,
    entries: Vec<ActiveEntry>,
}

impl ActivePalette {
    pub(crate) fn new(source: PaletteSource, colors: impl IntoIterator<Item = (u8, Rgb)>) -> Self {
        let mut entries: Vec<ActiveEntry> = colors
            .into_iter()
            .map(|(index, color)| ActiveEntry {
                index,
                color,
                channels: color.to_f32(),
                oklab: Oklab::from(LinearRgb::from(color)),
            })
            .collect();
        entries.sort_by_key(|e| e.index);
        Self { source, entries }
    }

    #[inline]
    pub fn source(&self) -> PaletteSource {
        self.source
    }

    #[inline]
    pub fn entries(&self) -> &[ActiveEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn color_of(&self, index: u8) -> Option<Rgb> {
        self.entries
            .iter()
            .find(|e| e.index == index)
            .map(|e| e.color)
    }

    pub fn colorants(&self) -> ColorantSet {
        ColorantSet::from_indices(self.entries.iter().map(|e| e.index)).unwrap_or_default()
    }

    /// Nearest entry to `color` (channels on the 0.0..=255.0 scale).
    ///
    /// Pure and stateless. Equal distances resolve to the lowest index.
    ///
    /// # Panics
    ///
    /// Never for palettes built through [`Palette`](super::Palette), which
    /// cannot be empty.
    #[inline]
    pub fn find_nearest(&self, color: [f32; 3], method: ColorMethod) -> &ActiveEntry {
        match method {
            ColorMethod::Rgb => self.nearest_by(|e| {
                let dr = color[0] - e.channels[0];
                let dg = color[1] - e.channels[1];
                let db = color[2] - e.channels[2];
                dr * dr + dg * dg + db * db
            }),
            ColorMethod::Perceptual => {
                let lab = Oklab::from(LinearRgb::from_srgb_f32(color));
                self.nearest_by(|e| lab.distance_squared(e.oklab))
            }
        }
    }

    fn nearest_by(&self, distance: impl Fn(&ActiveEntry) -> f32) -> &ActiveEntry {
        let mut best = &self.entries[0];
        let mut best_dist = distance(best);
        for entry in &self.entries[1..] {
            let dist = distance(entry);
            if dist < best_dist {
                best_dist = dist;
                best = entry;
            }
        }
        best
    }

    /// Index raster for an image whose every pixel already is one of the
    /// active colors, or `None` as soon as a pixel is not.
    ///
    /// Lets callers skip tone mapping and dithering for pre-rendered frames.
    pub fn exact_indices(&self, raster: &Raster) -> Option<Vec<u8>> {
        raster
            .pixels()
            .iter()
            .map(|&px| self.entries.iter().find(|e| e.color == px).map(|e| e.index))
            .collect()
    }
}
