//! Palette store, calibration and nearest-color quantization.

mod active;
mod calibration;
mod colorants;
mod error;
#[allow(clippy::module_inception)]
mod palette;

pub use active::{ActiveEntry, ActivePalette, ColorMethod};
pub use calibration::{calibrate, CalibrationLayout, PatchSample};
pub use colorants::ColorantSet;
pub use error::{CalibrationError, PaletteError, PaletteIncompleteError, ParseColorError};
pub use palette::{Palette, PaletteEntry, PaletteSource, MAX_COLORANT_INDEX};
