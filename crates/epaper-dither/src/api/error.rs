//! Unified fatal error for a render.

use thiserror::Error;

use crate::output::PackingRangeError;
use crate::preprocess::GeometryError;

/// Why a render produced no frame.
///
/// Recoverable conditions (out-of-range parameters, missing calibration)
/// never appear here; they are logged and worked around.
///
/// ```
/// use epaper_dither::{Raster, RenderError, Renderer};
///
/// let empty = Raster::new(0, 0, vec![]).unwrap();
/// let err = Renderer::default().render(&empty).unwrap_err();
/// assert!(matches!(err, RenderError::Geometry(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Packing(#[from] PackingRangeError),
}

impl RenderError {
    /// Pipeline stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            RenderError::Geometry(_) => "geometry",
            RenderError::Packing(_) => "packing",
        }
    }
}
