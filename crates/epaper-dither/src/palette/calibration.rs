//! Calibration against a photographed test pattern.
//!
//! The pattern is a grid of solid patches, one per colorant. Displaying it,
//! photographing the panel and feeding the photo to [`calibrate`] yields the
//! measured color of every colorant.

use super::error::{CalibrationError, PaletteError};
use super::palette::Palette;
use crate::color::Rgb;
use crate::raster::Raster;

/// Fraction of a patch trimmed from each side before sampling, so that
/// bleed between neighbouring patches and framing errors do not leak in.
const PATCH_INSET_DIVISOR: u32 = 4;

/// Grid arrangement of the calibration patches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibrationLayout {
    columns: u32,
    rows: u32,
    order: Vec<u8>,
}

/// Measured color of one patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchSample {
    pub index: u8,
    pub rgb: Rgb,
    /// Pixels averaged.
    pub pixels: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl CalibrationLayout {
    /// `order` lists colorant indices row by row, left to right.
    ///
    /// # Errors
    ///
    /// [`CalibrationError::EmptyLayout`] for a zero dimension,
    /// [`CalibrationError::LayoutMismatch`] if `order` does not fill the grid.
    pub fn new(columns: u32, rows: u32, order: Vec<u8>) -> Result<Self, CalibrationError> {
        if columns == 0 || rows == 0 {
            return Err(CalibrationError::EmptyLayout);
        }
        let cells = (columns * rows) as usize;
        if order.len() != cells {
            return Err(CalibrationError::LayoutMismatch {
                patches: order.len(),
                cells,
            });
        }
        Ok(Self {
            columns,
            rows,
            order,
        })
    }

    #[inline]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline]
    pub fn order(&self) -> &[u8] {
        &self.order
    }

    /// Bounds of grid slot `slot`; the last column and row absorb the
    /// division remainder.
    fn cell(&self, slot: usize, width: u32, height: u32) -> Cell {
        let col = slot as u32 % self.columns;
        let row = slot as u32 / self.columns;
        let cell_w = width / self.columns;
        let cell_h = height / self.rows;

        let x0 = col * cell_w;
        let y0 = row * cell_h;
        let x1 = if col == self.columns - 1 { width } else { x0 + cell_w };
        let y1 = if row == self.rows - 1 { height } else { y0 + cell_h };
        Cell { x0, y0, x1, y1 }
    }

    fn check_indices(&self, palette: &Palette) -> Result<(), CalibrationError> {
        match self.order.iter().find(|&&i| palette.entry(i).is_none()) {
            Some(&index) => Err(PaletteError::UnknownIndex { index }.into()),
            None => Ok(()),
        }
    }

    /// Draw the test pattern using each colorant's theoretical color.
    ///
    /// # Errors
    ///
    /// [`CalibrationError::Palette`] if the layout names an index the palette
    /// lacks, [`CalibrationError::CaptureTooSmall`] if the grid does not fit.
    pub fn render_pattern(
        &self,
        palette: &Palette,
        width: u32,
        height: u32,
    ) -> Result<Raster, CalibrationError> {
        self.check_indices(palette)?;
        self.check_fits(width, height, 1)?;

        let mut raster = Raster::filled(width, height, Rgb::BLACK);
        for (slot, &index) in self.order.iter().enumerate() {
            let color = palette
                .entry(index)
                .map(|e| e.theoretical_rgb)
                .unwrap_or_default();
            let cell = self.cell(slot, width, height);
            for y in cell.y0..cell.y1 {
                for x in cell.x0..cell.x1 {
                    raster.set(x, y, color);
                }
            }
        }
        Ok(raster)
    }

    fn check_fits(&self, width: u32, height: u32, min_cell: u32) -> Result<(), CalibrationError> {
        if width / self.columns < min_cell || height / self.rows < min_cell {
            return Err(CalibrationError::CaptureTooSmall {
                width,
                height,
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(())
    }

    fn sample(&self, capture: &Raster, slot: usize) -> PatchSample {
        let cell = self.cell(slot, capture.width(), capture.height());
        let inset_x = (cell.x1 - cell.x0) / PATCH_INSET_DIVISOR;
        let inset_y = (cell.y1 - cell.y0) / PATCH_INSET_DIVISOR;

        let mut sum = [0u64; 3];
        let mut count = 0u32;
        for y in (cell.y0 + inset_y)..(cell.y1 - inset_y) {
            for x in (cell.x0 + inset_x)..(cell.x1 - inset_x) {
                let px = capture.get(x, y);
                sum[0] += px.r as u64;
                sum[1] += px.g as u64;
                sum[2] += px.b as u64;
                count += 1;
            }
        }

        let n = count.max(1) as u64;
        let avg = |s: u64| ((s + n / 2) / n).min(255) as u8;
        PatchSample {
            index: self.order[slot],
            rgb: Rgb::new(avg(sum[0]), avg(sum[1]), avg(sum[2])),
            pixels: count,
        }
    }
}

impl Default for CalibrationLayout {
    /// Two rows of three patches: black, white, yellow / red, blue, green.
    fn default() -> Self {
        Self {
            columns: 3,
            rows: 2,
            order: vec![0, 1, 2, 3, 5, 6],
        }
    }
}

/// Sample every patch of `capture` and store the averages as measured colors.
///
/// The palette is only modified once every patch has been sampled, so an
/// error leaves it untouched.
///
/// # Errors
///
/// [`CalibrationError::CaptureTooSmall`] if a patch would be smaller than
/// 4x4 pixels, [`CalibrationError::Palette`] if the layout names an index
/// the palette does not have.
pub fn calibrate(
    palette: &mut Palette,
    capture: &Raster,
    layout: &CalibrationLayout,
) -> Result<Vec<PatchSample>, CalibrationError> {
    layout.check_indices(palette)?;
    layout.check_fits(capture.width(), capture.height(), PATCH_INSET_DIVISOR)?;

    let samples: Vec<PatchSample> = (0..layout.order.len())
        .map(|slot| layout.sample(capture, slot))
        .collect();

    for sample in &samples {
        tracing::info!(index = sample.index, rgb = %sample.rgb, pixels = sample.pixels, "sampled patch");
        palette.set_measured(sample.index, Some(sample.rgb))?;
    }
    Ok(samples)
}
