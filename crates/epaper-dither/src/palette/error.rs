//! Error types for palette construction, persistence and calibration.

use thiserror::Error;

use crate::color::Rgb;

/// A hex color string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    #[error("invalid hex color length {0} (expected 3 or 6 digits)")]
    InvalidLength(usize),
    #[error("invalid hex color {0:?}")]
    InvalidHex(String),
}

/// A palette violates one of its structural invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("palette has no entries")]
    EmptyPalette,

    #[error("palette index {index} appears more than once")]
    DuplicateIndex { index: u8 },

    #[error("palette index {index} exceeds the 4-bit colorant range (0-15)")]
    IndexOutOfRange { index: u8 },

    #[error("palette has no entry with index {index}")]
    UnknownIndex { index: u8 },

    #[error("invalid palette color: {0}")]
    ParseColor(#[from] ParseColorError),

    #[error("invalid palette document: {0}")]
    Format(String),
}

/// A measured value was requested but the entry has never been calibrated.
///
/// Recovered by the caller: the entry uses its theoretical value for the
/// current render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("palette index {index} has no measured value, using theoretical {theoretical}")]
pub struct PaletteIncompleteError {
    pub index: u8,
    pub theoretical: Rgb,
}

/// Calibration could not sample the captured test pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalibrationError {
    #[error("calibration layout must have at least one row and one column")]
    EmptyLayout,

    #[error("calibration layout has {patches} patches for {cells} grid cells")]
    LayoutMismatch { patches: usize, cells: usize },

    #[error("capture {width}x{height} is too small for a {columns}x{rows} patch grid")]
    CaptureTooSmall {
        width: u32,
        height: u32,
        columns: u32,
        rows: u32,
    },

    #[error(transparent)]
    Palette(#[from] PaletteError),
}
