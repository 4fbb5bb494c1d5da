use std::path::{Path, PathBuf};

use epaper_dither::{PaletteSource, Raster, RenderOutput, Renderer};

use crate::error::ToolError;
use crate::rendering::{read_image, write_png};

/// Where to write the optional by-products of a render
#[derive(Debug, Clone, Default)]
pub struct RenderTargets {
    /// Dithered frame as the panel will show it (measured colors)
    pub preview: Option<PathBuf>,
    /// Tone-mapped image before dithering
    pub adjusted: Option<PathBuf>,
}

/// Summary of one rendered file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub bytes: usize,
    /// Input was already drawn in palette colors and was packed unchanged
    pub exact: bool,
    /// Pixels per colorant index
    pub histogram: [usize; 16],
}

/// Renders image files into packed frames
#[derive(Debug, Clone)]
pub struct RenderService {
    renderer: Renderer,
}

impl RenderService {
    pub fn new(renderer: Renderer) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Render a decoded raster. Images already made of theoretical palette
    /// colors are packed directly; everything else goes through the full
    /// pipeline.
    pub fn render_raster(&self, raster: &Raster) -> Result<(RenderOutput, bool), ToolError> {
        if let Some(output) = self.renderer.render_exact(raster)? {
            tracing::info!("Input already uses palette colors, skipping processing");
            return Ok((output, true));
        }
        Ok((self.renderer.render(raster)?, false))
    }

    /// Render `input` into the packed frame file `output`
    pub fn render_file(
        &self,
        input: &Path,
        output: &Path,
        targets: &RenderTargets,
    ) -> Result<RenderReport, ToolError> {
        let raster = read_image(input)?;
        let (rendered, exact) = self.render_raster(&raster)?;

        // By-products first: a frame file on disk means the render succeeded
        if let Some(path) = &targets.preview {
            let preview = rendered
                .dithered
                .preview(self.renderer.palette(), PaletteSource::Measured);
            write_png(path, &preview)?;
        }
        if let Some(path) = &targets.adjusted {
            write_png(path, &rendered.adjusted)?;
        }

        std::fs::write(output, rendered.frame.bytes()).map_err(|e| ToolError::io(output, e))?;

        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            bytes = rendered.frame.len(),
            exact,
            "Rendered"
        );

        Ok(RenderReport {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            bytes: rendered.frame.len(),
            exact,
            histogram: rendered.dithered.histogram(),
        })
    }
}
