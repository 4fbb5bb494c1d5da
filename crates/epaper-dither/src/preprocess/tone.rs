//! Tone and color adjustment.
//!
//! Per pixel, on channels normalized to 0.0..=1.0:
//!
//! 1. exposure (linear gain)
//! 2. saturation around Rec.601 luma
//! 3. dynamic-range compression into the panel's black..white range
//!    (optional, see [`DynamicRange`])
//! 4. contrast or S-curve tone mapping
//!
//! The result is re-quantized to 8 bits.

use crate::color::{luma, Rgb};
use crate::palette::{ActivePalette, ColorMethod};
use crate::params::{ProcessingParameters, ToneMode};
use crate::raster::Raster;

/// Black as measured on a reference Spectra-6 panel (2/255). Used when the
/// palette has no black entry.
pub const DRC_LOW: f32 = 2.0 / 255.0;

/// White as measured on a reference Spectra-6 panel (190/255). Used when the
/// palette has no white entry.
pub const DRC_HIGH: f32 = 190.0 / 255.0;

/// Colorant index of black.
const BLACK_INDEX: u8 = 0;
/// Colorant index of white.
const WHITE_INDEX: u8 = 1;

/// Output range of dynamic-range compression, as luma fractions of full
/// scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicRange {
    pub low: f32,
    pub high: f32,
}

impl DynamicRange {
    /// Range of the reference panel.
    pub const REFERENCE: Self = Self {
        low: DRC_LOW,
        high: DRC_HIGH,
    };

    /// Black (index 0) to white (index 1) of the colors a render quantizes
    /// against, so compressed white lands exactly on the panel's white.
    ///
    /// A missing entry falls back to the reference bound; a range that is
    /// empty or inverted falls back to [`DynamicRange::REFERENCE`].
    pub fn of_palette(active: &ActivePalette) -> Self {
        let level = |index: u8| {
            active
                .color_of(index)
                .map(|c| luma(c.to_f32().map(|v| v / 255.0)))
        };
        let range = Self {
            low: level(BLACK_INDEX).unwrap_or(DRC_LOW),
            high: level(WHITE_INDEX).unwrap_or(DRC_HIGH),
        };
        if range.high > range.low {
            range
        } else {
            tracing::warn!(
                low = range.low,
                high = range.high,
                "palette black is not darker than white, using reference range"
            );
            Self::REFERENCE
        }
    }

    #[inline]
    fn compress(self, v: f32) -> f32 {
        self.low + v * (self.high - self.low)
    }
}

impl Default for DynamicRange {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Shadow exponents are kept above this so the curve stays monotone when
/// `strength * shadow_boost` exceeds 1.
const MIN_SHADOW_EXPONENT: f32 = 0.05;

/// Linear contrast around mid-gray, clamped.
#[inline]
pub fn contrast(x: f32, contrast: f32) -> f32 {
    ((x - 0.5) * contrast + 0.5).clamp(0.0, 1.0)
}

/// Two-segment power curve pivoting at `midpoint`.
///
/// Below the pivot the shadow segment is raised to `1 - strength *
/// shadow_boost`; above it the highlight segment to `1 + strength *
/// highlight_compress`. Both segments evaluate to exactly `midpoint` at the
/// pivot, and `strength == 0` is the identity.
#[inline]
pub fn scurve(
    x: f32,
    strength: f32,
    shadow_boost: f32,
    highlight_compress: f32,
    midpoint: f32,
) -> f32 {
    if strength == 0.0 {
        return x;
    }
    let x = x.clamp(0.0, 1.0);
    if x <= midpoint {
        shadow_segment(x, strength * shadow_boost, midpoint)
    } else {
        highlight_segment(x, strength * highlight_compress, midpoint)
    }
}

#[inline]
fn shadow_segment(x: f32, boost: f32, midpoint: f32) -> f32 {
    let exponent = (1.0 - boost).max(MIN_SHADOW_EXPONENT);
    (x / midpoint).powf(exponent) * midpoint
}

#[inline]
fn highlight_segment(x: f32, compress: f32, midpoint: f32) -> f32 {
    let exponent = 1.0 + compress;
    let t = (x - midpoint) / (1.0 - midpoint);
    midpoint + t.powf(exponent) * (1.0 - midpoint)
}

/// Applies exposure, saturation, range compression and tone mapping.
#[derive(Debug, Clone, Copy)]
pub struct ToneAdjuster {
    params: ProcessingParameters,
    range: DynamicRange,
}

impl ToneAdjuster {
    /// Parameters are used as given; sanitize them first. Compression uses
    /// the reference range until [`ToneAdjuster::dynamic_range`] is set.
    pub fn new(params: &ProcessingParameters) -> Self {
        Self {
            params: *params,
            range: DynamicRange::REFERENCE,
        }
    }

    /// Compress into `range` instead of the reference range
    pub fn dynamic_range(mut self, range: DynamicRange) -> Self {
        self.range = range;
        self
    }

    /// Adjust a single pixel.
    pub fn adjust(&self, px: Rgb) -> Rgb {
        let p = &self.params;
        let mut c = px.to_f32().map(|v| v / 255.0);

        if p.exposure != 1.0 {
            c = c.map(|v| (v * p.exposure).clamp(0.0, 1.0));
        }

        if p.saturation != 1.0 {
            let y = luma(c);
            c = c.map(|v| (y + (v - y) * p.saturation).clamp(0.0, 1.0));
        }

        if p.compress_dynamic_range {
            c = c.map(|v| self.range.compress(v));
        }

        c = match p.tone_mode {
            ToneMode::Contrast if p.contrast == 1.0 => c,
            ToneMode::Contrast => c.map(|v| contrast(v, p.contrast)),
            ToneMode::Scurve => self.apply_scurve(c),
        };

        Rgb::from_f32(c.map(|v| v * 255.0))
    }

    /// The `rgb` method curves each channel; `perceptual` curves luma and
    /// shifts all channels by the same amount, leaving chroma alone.
    fn apply_scurve(&self, c: [f32; 3]) -> [f32; 3] {
        let p = &self.params;
        let curve = |v: f32| {
            scurve(
                v,
                p.strength,
                p.shadow_boost,
                p.highlight_compress,
                p.midpoint,
            )
        };
        match p.color_method {
            ColorMethod::Rgb => c.map(curve),
            ColorMethod::Perceptual => {
                let y = luma(c);
                let shift = curve(y.clamp(0.0, 1.0)) - y;
                c.map(|v| (v + shift).clamp(0.0, 1.0))
            }
        }
    }

    /// Adjust every pixel of `raster` into a new raster of the same size.
    pub fn apply(&self, raster: &Raster) -> Raster {
        let pixels = raster.pixels().iter().map(|&px| self.adjust(px)).collect();
        Raster::from_parts(raster.width(), raster.height(), pixels)
    }
}
