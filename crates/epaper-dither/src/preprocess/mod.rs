//! Stages that run before quantization.
//!
//! 1. [`GeometryNormalizer`]: cover-scale, centered crop and optional 90°
//!    clockwise rotation onto the exact panel size.
//! 2. [`ToneAdjuster`]: exposure, saturation, dynamic-range compression and
//!    contrast or S-curve tone mapping.
//!
//! ```
//! use epaper_dither::{GeometryNormalizer, ProcessingParameters, Raster, Rgb, ToneAdjuster};
//!
//! let photo = Raster::filled(1200, 1600, Rgb::new(120, 90, 60));
//! let framed = GeometryNormalizer::new(800, 480).normalize(&photo).unwrap();
//! assert_eq!((framed.width(), framed.height()), (800, 480));
//!
//! let params = ProcessingParameters::default().sanitized();
//! let adjusted = ToneAdjuster::new(&params).apply(&framed);
//! assert_eq!(adjusted.width(), 800);
//! ```

mod geometry;
mod tone;

pub use geometry::{
    rotate_clockwise, GeometryError, GeometryNormalizer, GeometryPlan, Orientation,
};
pub use tone::{contrast, scurve, DynamicRange, ToneAdjuster, DRC_HIGH, DRC_LOW};
