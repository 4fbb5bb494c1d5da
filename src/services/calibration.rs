use std::path::Path;

use epaper_dither::{calibrate, CalibrationLayout, Palette, PatchSample};

use crate::error::ToolError;
use crate::rendering::{read_image, write_png};

/// Test pattern output and palette calibration from a photo of it
#[derive(Debug, Clone, Default)]
pub struct CalibrationService {
    layout: CalibrationLayout,
}

impl CalibrationService {
    pub fn new(layout: CalibrationLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &CalibrationLayout {
        &self.layout
    }

    /// Write the pattern to show on the panel before taking the photo
    pub fn write_pattern(
        &self,
        palette: &Palette,
        width: u32,
        height: u32,
        path: &Path,
    ) -> Result<(), ToolError> {
        let pattern = self.layout.render_pattern(palette, width, height)?;
        write_png(path, &pattern)?;
        tracing::info!(path = %path.display(), width, height, "Wrote calibration pattern");
        Ok(())
    }

    /// Sample the photographed pattern at `capture` into `palette`
    pub fn calibrate_file(
        &self,
        palette: &mut Palette,
        capture: &Path,
    ) -> Result<Vec<PatchSample>, ToolError> {
        let raster = read_image(capture)?;
        Ok(calibrate(palette, &raster, &self.layout)?)
    }
}
