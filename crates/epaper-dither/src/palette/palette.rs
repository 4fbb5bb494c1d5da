//! Palette store: colorant entries with theoretical and measured colors.
//!
//! A [`Palette`] is the persistent, calibratable description of a panel's
//! colorants. Before a render it is resolved into an
//! [`ActivePalette`](super::ActivePalette) for one [`PaletteSource`], so the
//! quantizer never has to know whether a device was calibrated.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::active::ActivePalette;
use super::colorants::ColorantSet;
use super::error::{PaletteError, PaletteIncompleteError};
use crate::color::Rgb;
use crate::raster::Raster;

/// Highest colorant index that fits in a 4-bit packed pixel.
pub const MAX_COLORANT_INDEX: u8 = 15;

/// One display colorant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    /// Colorant id written into the frame buffer.
    pub index: u8,
    /// Nominal color from the panel datasheet.
    pub theoretical_rgb: Rgb,
    /// Color observed on a physical panel, if calibrated.
    #[serde(default)]
    pub measured_rgb: Option<Rgb>,
}

impl PaletteEntry {
    pub const fn new(index: u8, theoretical_rgb: Rgb, measured_rgb: Option<Rgb>) -> Self {
        Self {
            index,
            theoretical_rgb,
            measured_rgb,
        }
    }

    /// Color for the given source, or the fallback error when measured is unset.
    pub fn color(&self, source: PaletteSource) -> Result<Rgb, PaletteIncompleteError> {
        match source {
            PaletteSource::Theoretical => Ok(self.theoretical_rgb),
            PaletteSource::Measured => self.measured_rgb.ok_or(PaletteIncompleteError {
                index: self.index,
                theoretical: self.theoretical_rgb,
            }),
        }
    }
}

/// Which of an entry's two colors the quantizer targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteSource {
    /// Nominal values, matching the stock converter's output.
    Theoretical,
    /// Calibrated values, falling back per entry to theoretical.
    #[default]
    Measured,
}

impl PaletteSource {
    /// Map the `renderMeasured` setting onto a source.
    pub fn from_render_measured(render_measured: bool) -> Self {
        if render_measured {
            Self::Measured
        } else {
            Self::Theoretical
        }
    }
}

/// On-disk shape of a palette document.
#[derive(Serialize, Deserialize)]
struct PaletteDocument {
    entries: Vec<PaletteEntry>,
}

/// Ordered set of colorant entries with unique indices.
///
/// Entries are kept sorted by index, which is also the tie-break order of
/// nearest-color search. Calibration may only change `measured_rgb`; the
/// index set is fixed once constructed.
///
/// ```
/// use epaper_dither::{Palette, PaletteSource, Rgb};
///
/// let mut palette = Palette::spectra6();
/// palette.set_measured(3, Some(Rgb::new(140, 20, 10))).unwrap();
///
/// let active = palette.resolve(PaletteSource::Measured);
/// assert_eq!(active.color_of(3), Some(Rgb::new(140, 20, 10)));
/// assert!(!palette.colorants().contains(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PaletteDocument", into = "PaletteDocument")]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Validate and sort entries.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::EmptyPalette`] if `entries` is empty
    /// - [`PaletteError::IndexOutOfRange`] for an index above 15
    /// - [`PaletteError::DuplicateIndex`] if two entries share an index
    pub fn new(mut entries: Vec<PaletteEntry>) -> Result<Self, PaletteError> {
        if entries.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.index > MAX_COLORANT_INDEX {
                return Err(PaletteError::IndexOutOfRange { index: entry.index });
            }
            if !seen.insert(entry.index) {
                return Err(PaletteError::DuplicateIndex { index: entry.index });
            }
        }

        entries.sort_by_key(|e| e.index);
        Ok(Self { entries })
    }

    /// The Spectra-6 panel: black, white, yellow, red, blue, green at indices
    /// 0, 1, 2, 3, 5, 6 (slot 4 is reserved by the controller). Measured
    /// values are those of a typical uncalibrated panel.
    pub fn spectra6() -> Self {
        let entries = vec![
            PaletteEntry::new(0, Rgb::new(0, 0, 0), Some(Rgb::new(2, 2, 2))),
            PaletteEntry::new(1, Rgb::new(255, 255, 255), Some(Rgb::new(190, 190, 190))),
            PaletteEntry::new(2, Rgb::new(255, 255, 0), Some(Rgb::new(205, 202, 0))),
            PaletteEntry::new(3, Rgb::new(255, 0, 0), Some(Rgb::new(135, 19, 0))),
            PaletteEntry::new(5, Rgb::new(0, 0, 255), Some(Rgb::new(5, 64, 158))),
            PaletteEntry::new(6, Rgb::new(0, 255, 0), Some(Rgb::new(39, 102, 60))),
        ];
        Self { entries }
    }

    /// Palette built only from theoretical colors, indexed 0..n.
    ///
    /// # Errors
    ///
    /// Same as [`Palette::new`].
    pub fn from_theoretical(colors: &[Rgb]) -> Result<Self, PaletteError> {
        let entries = colors
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let index = u8::try_from(i).map_err(|_| PaletteError::IndexOutOfRange {
                    index: u8::MAX,
                })?;
                Ok(PaletteEntry::new(index, c, None))
            })
            .collect::<Result<Vec<_>, PaletteError>>()?;
        Self::new(entries)
    }

    /// Parse a JSON palette document (`{"entries": [...]}`).
    ///
    /// # Errors
    ///
    /// [`PaletteError::Format`] for malformed JSON, otherwise the
    /// validation errors of [`Palette::new`].
    pub fn from_json(json: &str) -> Result<Self, PaletteError> {
        let doc: PaletteDocument =
            serde_json::from_str(json).map_err(|e| PaletteError::Format(e.to_string()))?;
        Self::try_from(doc)
    }

    #[inline]
    pub fn entries(&self) -> &[PaletteEntry] {
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

    pub fn entry(&self, index: u8) -> Option<&PaletteEntry> {
        self.entries.iter().find(|e| e.index == index)
    }

    /// Indices the frame packer must accept for this palette.
    pub fn colorants(&self) -> ColorantSet {
        // Indices are validated to 0..=15 on construction.
        ColorantSet::from_indices(self.entries.iter().map(|e| e.index)).unwrap_or_default()
    }

    /// Whether every entry has a measured value.
    pub fn is_calibrated(&self) -> bool {
        self.entries.iter().all(|e| e.measured_rgb.is_some())
    }

    /// Replace (or clear) the measured color of one entry.
    ///
    /// # Errors
    ///
    /// [`PaletteError::UnknownIndex`] if no entry has `index`.
    pub fn set_measured(&mut self, index: u8, measured: Option<Rgb>) -> Result<(), PaletteError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.index == index)
            .ok_or(PaletteError::UnknownIndex { index })?;
        entry.measured_rgb = measured;
        Ok(())
    }

    /// Forget all calibration data.
    pub fn clear_measured(&mut self) {
        for entry in &mut self.entries {
            entry.measured_rgb = None;
        }
    }

    /// Resolve the colors the quantizer will target for one render.
    ///
    /// With [`PaletteSource::Measured`], every entry lacking a measured value
    /// falls back to its theoretical color and a warning is logged; the other
    /// entries keep their calibration.
    pub fn resolve(&self, source: PaletteSource) -> ActivePalette {
        let colors = self.entries.iter().map(|entry| {
            let color = entry.color(source).unwrap_or_else(|fallback| {
                tracing::warn!(%fallback, "incomplete calibration");
                fallback.theoretical
            });
            (entry.index, color)
        });
        ActivePalette::new(source, colors)
    }

    /// Index raster for an image already drawn in this palette's `source`
    /// colors, or `None` if any pixel is something else.
    pub fn exact_indices(&self, raster: &Raster, source: PaletteSource) -> Option<Vec<u8>> {
        self.resolve(source).exact_indices(raster)
    }
}

impl TryFrom<PaletteDocument> for Palette {
    type Error = PaletteError;

    fn try_from(doc: PaletteDocument) -> Result<Self, Self::Error> {
        Self::new(doc.entries)
    }
}

impl From<Palette> for PaletteDocument {
    fn from(palette: Palette) -> Self {
        Self {
            entries: palette.entries,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::spectra6()
    }
}
