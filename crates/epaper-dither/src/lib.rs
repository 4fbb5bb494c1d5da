// Generated LUT tables trip these.
#![allow(clippy::excessive_precision, clippy::needless_range_loop)]

//! epaper-dither: color-accurate rendering for fixed-palette e-paper panels
//!
//! Turns an arbitrary RGB image into the 4-bit packed frame buffer of a
//! panel with a handful of colorants (Spectra-6: black, white, yellow, red,
//! blue, green), deterministically, so host tooling and device firmware
//! produce byte-identical frames.
//!
//! # Quick Start
//!
//! ```
//! use epaper_dither::{Palette, ProcessingParameters, Raster, Renderer, Rgb};
//!
//! let renderer = Renderer::new(Palette::spectra6())
//!     .target(800, 480)
//!     .params(ProcessingParameters::default());
//!
//! let photo = Raster::filled(1200, 900, Rgb::new(200, 120, 80));
//! let out = renderer.render(&photo).unwrap();
//! assert_eq!(out.frame.len(), 800 * 480 / 2);
//! ```
//!
//! # Pipeline
//!
//! 1. [`GeometryNormalizer`]: rotate to the panel's orientation, cover-scale,
//!    crop centered. Fails only on zero-sized input.
//! 2. [`Palette::resolve`]: pick theoretical or measured colorant values.
//!    Missing measurements fall back per entry with a warning.
//! 3. [`ToneAdjuster`]: exposure, saturation, optional dynamic-range
//!    compression into the resolved palette's black..white
//!    ([`DynamicRange`]), then contrast or S-curve.
//! 4. [`Dither`]: error diffusion in raster order, quantizing each pixel with
//!    [`ActivePalette::find_nearest`] under the [`ColorMethod`].
//! 5. [`FramePacker`]: two pixels per byte, even pixel in the high nibble.
//!
//! # Measured vs theoretical
//!
//! A panel's real colorants are far from their nominal values: "white" is a
//! light gray, "red" a dark brick. Dithering against the measured values
//! (`renderMeasured`, the default) makes the ditherer compensate for that,
//! and dynamic-range compression maps full-scale white onto the panel's own
//! white so errors do not pile up against an unreachable target.
//!
//! # Determinism
//!
//! Geometry uses exact integer arithmetic. Tone and dither math is plain
//! `f32` with a fixed operation order and no platform-dependent intrinsics;
//! sRGB decoding for the perceptual metric goes through a build-time table.

pub mod api;
pub mod color;
pub mod dither;
pub mod output;
pub mod palette;
pub mod params;
pub mod preprocess;
pub mod raster;

#[cfg(test)]
mod domain_tests;

pub use api::{RenderError, RenderOutput, Renderer, PANEL_HEIGHT, PANEL_WIDTH};
pub use color::{LinearRgb, Oklab, Rgb};
pub use dither::{Dither, DitherAlgorithm, ErrorDiffusion, Kernel};
pub use output::{DitheredImage, FramePacker, PackedFrame, PackingRangeError};
pub use palette::{
    calibrate, ActiveEntry, ActivePalette, CalibrationError, CalibrationLayout, ColorMethod,
    ColorantSet, PaletteEntry, PaletteError, PaletteIncompleteError, PaletteSource,
    ParseColorError, PatchSample, Palette,
};
pub use params::{ParameterRangeError, Preset, ProcessingParameters, ToneMode};
pub use preprocess::{DynamicRange, GeometryError, GeometryNormalizer, ToneAdjuster};
pub use raster::Raster;
