use std::path::PathBuf;

use epaper_dither::{CalibrationError, GeometryError, PaletteError, RenderError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unrecognized image format")]
    UnknownFormat,

    #[error("Unsupported image format: {0} (only PNG is decoded)")]
    UnsupportedFormat(&'static str),

    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Invalid image: {0}")]
    Image(#[from] GeometryError),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Palette error: {0}")]
    Palette(#[from] PaletteError),

    #[error("Calibration error: {0}")]
    Calibration(#[from] CalibrationError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ToolError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ToolError::Io {
            path: path.into(),
            source,
        }
    }
}
