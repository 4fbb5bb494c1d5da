//! Linear-light RGB.

use super::lut::srgb_to_linear;
use super::rgb::Rgb;

/// A color in linear RGB, channels nominally in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl LinearRgb {
    #[inline]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Decode fractional sRGB channels on the 0.0..=255.0 scale.
    ///
    /// The ditherer works on error-adjusted colors that are no longer
    /// integral, so this skips the round trip through [`Rgb`].
    #[inline]
    pub fn from_srgb_f32(c: [f32; 3]) -> Self {
        Self {
            r: srgb_to_linear(c[0] / 255.0),
            g: srgb_to_linear(c[1] / 255.0),
            b: srgb_to_linear(c[2] / 255.0),
        }
    }
}

impl From<Rgb> for LinearRgb {
    fn from(c: Rgb) -> Self {
        Self::from_srgb_f32(c.to_f32())
    }
}
