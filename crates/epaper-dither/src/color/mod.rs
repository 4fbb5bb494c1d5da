//! Color types used by the rendering pipeline.
//!
//! - [`Rgb`]: 8-bit sRGB triple. Rasters, palette entries and the
//!   `rgb` distance metric all live here.
//! - [`LinearRgb`]: decoded light intensity, only used on the way to Oklab.
//! - [`Oklab`]: perceptually uniform space behind the `perceptual` metric.
//!
//! ```
//! use epaper_dither::{LinearRgb, Oklab, Rgb};
//!
//! let orange: Rgb = "#FF8000".parse().unwrap();
//! let lab = Oklab::from(LinearRgb::from(orange));
//! assert!(lab.l > 0.5);
//! ```

mod linear_rgb;
mod lut;
mod oklab;
mod rgb;

pub use linear_rgb::LinearRgb;
pub use oklab::Oklab;
pub use rgb::Rgb;

/// Rec.601 luma weights, applied to gamma-encoded channels.
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Rec.601 luma of gamma-encoded channels (any consistent scale).
#[inline]
pub fn luma(c: [f32; 3]) -> f32 {
    LUMA_WEIGHTS[0] * c[0] + LUMA_WEIGHTS[1] * c[1] + LUMA_WEIGHTS[2] * c[2]
}
