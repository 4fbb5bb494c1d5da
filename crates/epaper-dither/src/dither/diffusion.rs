//! Raster-order quantize-and-diffuse loop.

use super::kernel::Kernel;
use super::Dither;
use crate::palette::{ActivePalette, ColorMethod};
use crate::raster::Raster;

/// Per-channel residual accumulator.
///
/// Holds only the `max_dy + 1` rows a kernel can reach: row 0 is the row
/// being dithered, row `k` the one `k` rows below. Cells are cleared when
/// their row scrolls out, so every pixel starts from zero error plus what
/// earlier pixels sent it.
#[derive(Debug, Clone)]
pub struct ErrorBuffer {
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    pub fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth.max(1)).map(|_| vec![[0.0; 3]; width]).collect(),
            width,
        }
    }

    /// Error accumulated so far for column `x` of the current row.
    #[inline]
    pub fn accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add `error` to column `x` of the row `row_offset` rows down.
    /// Taps outside the raster are dropped.
    #[inline]
    pub fn add(&mut self, x: isize, row_offset: usize, error: [f32; 3]) {
        if x < 0 || x as usize >= self.width || row_offset >= self.rows.len() {
            return;
        }
        let cell = &mut self.rows[row_offset][x as usize];
        for c in 0..3 {
            cell[c] += error[c];
        }
    }

    /// Scroll one row down; the new bottom row starts at zero.
    pub fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}

/// Error diffusion with a fixed kernel.
#[derive(Debug, Clone, Copy)]
pub struct ErrorDiffusion {
    kernel: &'static Kernel,
}

impl ErrorDiffusion {
    pub fn new(kernel: &'static Kernel) -> Self {
        Self { kernel }
    }

    #[inline]
    pub fn kernel(&self) -> &'static Kernel {
        self.kernel
    }
}

impl Dither for ErrorDiffusion {
    fn dither(&self, raster: &Raster, palette: &ActivePalette, method: ColorMethod) -> Vec<u8> {
        let width = raster.width() as usize;
        let height = raster.height() as usize;
        let kernel = self.kernel;
        let divisor = kernel.divisor as f32;

        let mut errors = ErrorBuffer::new(width, kernel.max_dy + 1);
        let mut indices = Vec::with_capacity(width * height);

        for row in raster.pixels().chunks_exact(width.max(1)).take(height) {
            for (x, &px) in row.iter().enumerate() {
                let acc = errors.accumulated(x);
                let src = px.to_f32();
                // Clamp so a run of same-signed residuals cannot push the
                // target outside the gamut and grow without bound.
                let adjusted = [
                    (src[0] + acc[0]).clamp(0.0, 255.0),
                    (src[1] + acc[1]).clamp(0.0, 255.0),
                    (src[2] + acc[2]).clamp(0.0, 255.0),
                ];

                let chosen = palette.find_nearest(adjusted, method);
                indices.push(chosen.index);

                let residual = [
                    adjusted[0] - chosen.channels[0],
                    adjusted[1] - chosen.channels[1],
                    adjusted[2] - chosen.channels[2],
                ];
                if residual == [0.0; 3] {
                    continue;
                }

                for &(dx, dy, weight) in kernel.entries {
                    let w = weight as f32 / divisor;
                    errors.add(
                        x as isize + dx as isize,
                        dy as usize,
                        [residual[0] * w, residual[1] * w, residual[2] * w],
                    );
                }
            }
            errors.advance_row();
        }

        indices
    }
}
