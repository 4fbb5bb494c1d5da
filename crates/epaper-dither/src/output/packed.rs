//! 4-bit frame packing.
//!
//! Two pixels per byte, row-major: the even-numbered pixel in the high
//! nibble, the following odd pixel in the low nibble. A trailing odd pixel
//! leaves the final low nibble zero.

use thiserror::Error;

use crate::palette::ColorantSet;

/// An index cannot be written to the panel. Fatal for the render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PackingRangeError {
    #[error("packing: pixel {position} has index {index}, which the panel does not accept")]
    InvalidIndex { position: usize, index: u8 },

    #[error("packing: {len} indices cannot fill a {width}x{height} frame")]
    LengthMismatch { len: usize, width: u32, height: u32 },
}

/// A packed frame buffer, ready for the panel controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedFrame {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl PackedFrame {
    /// Bytes needed for `width * height` pixels.
    #[inline]
    pub fn byte_len(width: u32, height: u32) -> usize {
        (width as usize * height as usize).div_ceil(2)
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Index stored for pixel number `pixel` (row-major), if in range.
    pub fn index_at(&self, pixel: usize) -> Option<u8> {
        if pixel >= self.width as usize * self.height as usize {
            return None;
        }
        let byte = self.bytes[pixel / 2];
        Some(if pixel % 2 == 0 { byte >> 4 } else { byte & 0x0F })
    }
}

/// Packs index rasters, rejecting indices outside the panel's colorant set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePacker {
    colorants: ColorantSet,
}

impl FramePacker {
    pub fn new(colorants: ColorantSet) -> Self {
        Self { colorants }
    }

    /// # Errors
    ///
    /// [`PackingRangeError::LengthMismatch`] if `indices.len() != width *
    /// height`, [`PackingRangeError::InvalidIndex`] for the first index the
    /// colorant set does not contain.
    pub fn pack(
        &self,
        indices: &[u8],
        width: u32,
        height: u32,
    ) -> Result<PackedFrame, PackingRangeError> {
        if indices.len() != width as usize * height as usize {
            return Err(PackingRangeError::LengthMismatch {
                len: indices.len(),
                width,
                height,
            });
        }
        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|(_, &i)| !self.colorants.contains(i))
        {
            return Err(PackingRangeError::InvalidIndex { position, index });
        }

        let bytes = indices
            .chunks(2)
            .map(|pair| match *pair {
                [even, odd] => (even << 4) | odd,
                [even] => even << 4,
                _ => 0,
            })
            .collect();

        Ok(PackedFrame {
            bytes,
            width,
            height,
        })
    }
}
