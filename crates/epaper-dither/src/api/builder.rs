//! Renderer builder: the full pipeline behind one call.
//!
//! ```text
//! source Raster
//!     |  GeometryNormalizer   cover scale, centered crop, rotate
//!     v
//! target-sized Raster
//!     |  Palette::resolve     theoretical or measured, per-entry fallback
//!     |  ToneAdjuster         exposure, saturation, DRC into the resolved
//!     |                       black..white, contrast / S-curve
//!     v
//! adjusted Raster  ----------------------------> RenderOutput::adjusted
//!     |  Dither               quantize + diffuse in raster order
//!     v
//! DitheredImage    ----------------------------> RenderOutput::dithered
//!     |  FramePacker          4 bits per pixel, even pixel high
//!     v
//! PackedFrame      ----------------------------> RenderOutput::frame
//! ```

use crate::dither::Dither;
use crate::output::{DitheredImage, FramePacker, PackedFrame};
use crate::palette::{Palette, PaletteSource};
use crate::params::ProcessingParameters;
use crate::preprocess::{DynamicRange, GeometryNormalizer, ToneAdjuster};
use crate::raster::Raster;

use super::error::RenderError;

/// Native width of the reference 7.3" Spectra-6 panel.
pub const PANEL_WIDTH: u32 = 800;
/// Native height of the reference 7.3" Spectra-6 panel.
pub const PANEL_HEIGHT: u32 = 480;

/// Everything a successful render produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    /// Buffer for the panel controller.
    pub frame: PackedFrame,
    /// Target-sized raster after tone mapping, before dithering.
    pub adjusted: Raster,
    pub dithered: DitheredImage,
}

/// Configured rendering pipeline.
///
/// Holds its own [`Palette`], so calibration (which needs `&mut Palette`)
/// cannot run while a render borrows the renderer. `render` takes `&self`;
/// one renderer can serve many images, and independent renderers may run
/// on different threads.
///
/// ```
/// use epaper_dither::{Palette, ProcessingParameters, Raster, Renderer, Rgb};
///
/// let renderer = Renderer::new(Palette::spectra6())
///     .target(8, 4)
///     .params(ProcessingParameters::new().saturation(1.2));
///
/// let photo = Raster::filled(30, 20, Rgb::new(120, 90, 60));
/// let out = renderer.render(&photo).unwrap();
/// assert_eq!(out.frame.len(), 16);
/// assert_eq!((out.adjusted.width(), out.adjusted.height()), (8, 4));
/// ```
#[derive(Debug, Clone)]
pub struct Renderer {
    palette: Palette,
    params: ProcessingParameters,
    geometry: GeometryNormalizer,
}

impl Renderer {
    /// Default parameters, 800x480 target.
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            params: ProcessingParameters::default(),
            geometry: GeometryNormalizer::new(PANEL_WIDTH, PANEL_HEIGHT),
        }
    }

    /// Replace the processing parameters. Out-of-range values are clamped
    /// with a warning.
    pub fn params(mut self, params: ProcessingParameters) -> Self {
        self.params = params.sanitized();
        self
    }

    /// Set the output frame size.
    pub fn target(mut self, width: u32, height: u32) -> Self {
        self.geometry =
            GeometryNormalizer::new(width, height).skip_rotation(self.geometry.skips_rotation());
        self
    }

    /// Never rotate sources whose orientation differs from the frame.
    pub fn skip_rotation(mut self, skip: bool) -> Self {
        self.geometry = self.geometry.skip_rotation(skip);
        self
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[inline]
    pub fn parameters(&self) -> &ProcessingParameters {
        &self.params
    }

    #[inline]
    pub fn geometry(&self) -> &GeometryNormalizer {
        &self.geometry
    }

    /// Run the whole pipeline on `source`.
    ///
    /// # Errors
    ///
    /// [`RenderError::Geometry`] for a zero-sized source or target,
    /// [`RenderError::Packing`] if the ditherer emitted an index the panel
    /// does not accept. No frame is produced on error.
    pub fn render(&self, source: &Raster) -> Result<RenderOutput, RenderError> {
        let normalized = self.geometry.normalize(source)?;
        let active = self.palette.resolve(self.params.palette_source());
        let range = DynamicRange::of_palette(&active);
        let adjusted = ToneAdjuster::new(&self.params)
            .dynamic_range(range)
            .apply(&normalized);

        let algorithm = self.params.dither_algorithm;
        let indices = algorithm.dither(&adjusted, &active, self.params.color_method);

        let (width, height) = (adjusted.width(), adjusted.height());
        let frame = FramePacker::new(self.palette.colorants()).pack(&indices, width, height)?;
        tracing::debug!(
            %algorithm,
            source = ?active.source(),
            width,
            height,
            bytes = frame.len(),
            "rendered frame"
        );

        Ok(RenderOutput {
            frame,
            adjusted,
            dithered: DitheredImage::new(indices, width, height),
        })
    }

    /// Pack `source` as-is when, after geometry, every pixel is already a
    /// theoretical palette color. Returns `Ok(None)` otherwise.
    ///
    /// Pre-rendered frames and the calibration pattern are drawn in
    /// theoretical colors whatever `renderMeasured` says, so they are matched
    /// against those; tone mapping and dithering never touch them.
    ///
    /// # Errors
    ///
    /// Same as [`Renderer::render`].
    pub fn render_exact(&self, source: &Raster) -> Result<Option<RenderOutput>, RenderError> {
        let normalized = self.geometry.normalize(source)?;
        let Some(indices) = self
            .palette
            .exact_indices(&normalized, PaletteSource::Theoretical)
        else {
            return Ok(None);
        };

        let (width, height) = (normalized.width(), normalized.height());
        let frame = FramePacker::new(self.palette.colorants()).pack(&indices, width, height)?;
        tracing::debug!(width, height, "packed pre-rendered frame");

        Ok(Some(RenderOutput {
            frame,
            adjusted: normalized,
            dithered: DitheredImage::new(indices, width, height),
        }))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::dither::DitherAlgorithm;
    use crate::params::Preset;

    fn gradient(width: u32, height: u32) -> Raster {
        let mut raster = Raster::filled(width, height, Rgb::BLACK);
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y) * 255 / (width + height - 2).max(1)) as u8;
                raster.set(x, y, Rgb::new(v, 255 - v, v / 2));
            }
        }
        raster
    }

    #[test]
    fn test_defaults() {
        let renderer = Renderer::default();
        assert_eq!(renderer.geometry().target(), (PANEL_WIDTH, PANEL_HEIGHT));
        assert_eq!(renderer.parameters(), &ProcessingParameters::default());
        assert_eq!(renderer.palette(), &Palette::spectra6());
    }

    #[test]
    fn test_params_are_sanitized() {
        let renderer = Renderer::default().params(ProcessingParameters::new().exposure(9.0));
        assert_eq!(renderer.parameters().exposure, 4.0);
    }

    #[test]
    fn test_target_keeps_skip_rotation() {
        let renderer = Renderer::default().skip_rotation(true).target(6, 10);
        assert!(!renderer.geometry().plan(10, 6).unwrap().rotate);
        let renderer = Renderer::default().target(6, 10);
        assert!(renderer.geometry().plan(10, 6).unwrap().rotate);
    }

    #[test]
    fn test_render_output_shapes() {
        let renderer = Renderer::default().target(9, 5);
        let out = renderer.render(&gradient(40, 30)).unwrap();
        assert_eq!(out.frame.len(), 23);
        assert_eq!((out.frame.width(), out.frame.height()), (9, 5));
        assert_eq!(out.dithered.indices().len(), 45);
        for (i, &index) in out.dithered.indices().iter().enumerate() {
            assert_eq!(out.frame.index_at(i), Some(index));
        }
    }

    #[test]
    fn test_render_is_reusable_and_deterministic() {
        let renderer = Renderer::default()
            .target(16, 12)
            .params(ProcessingParameters::new().dither_algorithm(DitherAlgorithm::Stucki));
        let src = gradient(20, 20);
        assert_eq!(renderer.render(&src).unwrap(), renderer.render(&src).unwrap());
    }

    #[test]
    fn test_render_exact_passes_palette_images_through() {
        let renderer = Renderer::default()
            .target(3, 2)
            .params(ProcessingParameters::preset(Preset::Stock));
        let src = Raster::new(
            3,
            2,
            vec![
                Rgb::BLACK,
                Rgb::WHITE,
                Rgb::new(255, 255, 0),
                Rgb::new(255, 0, 0),
                Rgb::new(0, 0, 255),
                Rgb::new(0, 255, 0),
            ],
        )
        .unwrap();
        let out = renderer.render_exact(&src).unwrap().unwrap();
        assert_eq!(out.dithered.indices(), &[0, 1, 2, 3, 5, 6]);
        assert_eq!(out.frame.bytes(), &[0x01, 0x23, 0x56]);

        assert_eq!(renderer.render_exact(&gradient(3, 2)).unwrap(), None);

        // Rendering against measured colors still recognizes theoretical input
        let measured = Renderer::default().target(3, 2);
        assert!(measured.parameters().render_measured);
        let out = measured.render_exact(&src).unwrap().unwrap();
        assert_eq!(out.frame.bytes(), &[0x01, 0x23, 0x56]);
        let calibrated = Raster::filled(3, 2, Rgb::new(190, 190, 190));
        assert_eq!(measured.render_exact(&calibrated).unwrap(), None);
    }
}
