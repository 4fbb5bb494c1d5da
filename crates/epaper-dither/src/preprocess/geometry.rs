//! Geometry normalization: cover scaling, centered crop, rotation.
//!
//! Scaling is nearest-neighbour with an exact rational scale factor, so the
//! same source always maps to the same pixels on every platform.

use thiserror::Error;

use crate::color::Rgb;
use crate::raster::Raster;

/// The source cannot be mapped onto the target frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("geometry: source image is {width}x{height}, both dimensions must be non-zero")]
    ZeroArea { width: u32, height: u32 },

    #[error("geometry: target frame is {width}x{height}, both dimensions must be non-zero")]
    ZeroTarget { width: u32, height: u32 },

    #[error("geometry: {len} elements cannot back a {width}x{height} raster")]
    BufferSize { width: u32, height: u32, len: usize },
}

/// Aspect class of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
}

impl Orientation {
    pub fn of(width: u32, height: u32) -> Self {
        match height.cmp(&width) {
            std::cmp::Ordering::Greater => Self::Portrait,
            std::cmp::Ordering::Less => Self::Landscape,
            std::cmp::Ordering::Equal => Self::Square,
        }
    }

    /// Only a strict portrait/landscape mismatch calls for rotation.
    fn mismatches(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Portrait, Self::Landscape) | (Self::Landscape, Self::Portrait)
        )
    }
}

/// What [`GeometryNormalizer::normalize`] will do with a given source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryPlan {
    /// Rotate 90° clockwise after scaling.
    pub rotate: bool,
    /// Frame the source is cover-scaled into (pre-rotation target).
    pub frame_width: u32,
    pub frame_height: u32,
    /// Size of the scaled source before cropping.
    pub scaled_width: u32,
    pub scaled_height: u32,
    /// Pixels trimmed from the left and top edges of the scaled source.
    pub crop_x: u32,
    pub crop_y: u32,
}

/// Maps arbitrary sources onto an exact target frame without letterboxing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryNormalizer {
    target_width: u32,
    target_height: u32,
    skip_rotation: bool,
}

impl GeometryNormalizer {
    pub fn new(target_width: u32, target_height: u32) -> Self {
        Self {
            target_width,
            target_height,
            skip_rotation: false,
        }
    }

    /// Never rotate, even when source and target orientation disagree.
    pub fn skip_rotation(mut self, skip: bool) -> Self {
        self.skip_rotation = skip;
        self
    }

    #[inline]
    pub fn target(&self) -> (u32, u32) {
        (self.target_width, self.target_height)
    }

    #[inline]
    pub fn skips_rotation(&self) -> bool {
        self.skip_rotation
    }

    /// Decide rotation, scale and crop for a `width` x `height` source.
    ///
    /// # Errors
    ///
    /// [`GeometryError::ZeroArea`] or [`GeometryError::ZeroTarget`] when
    /// either side of the source or target is zero.
    pub fn plan(&self, width: u32, height: u32) -> Result<GeometryPlan, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::ZeroArea { width, height });
        }
        if self.target_width == 0 || self.target_height == 0 {
            return Err(GeometryError::ZeroTarget {
                width: self.target_width,
                height: self.target_height,
            });
        }

        let rotate = !self.skip_rotation
            && Orientation::of(width, height)
                .mismatches(Orientation::of(self.target_width, self.target_height));
        let (frame_width, frame_height) = if rotate {
            (self.target_height, self.target_width)
        } else {
            (self.target_width, self.target_height)
        };

        let scale = CoverScale::new(width, height, frame_width, frame_height);
        let scaled_width = scale.apply(width);
        let scaled_height = scale.apply(height);

        Ok(GeometryPlan {
            rotate,
            frame_width,
            frame_height,
            scaled_width,
            scaled_height,
            crop_x: (scaled_width - frame_width) / 2,
            crop_y: (scaled_height - frame_height) / 2,
        })
    }

    /// Produce a raster of exactly the target size.
    ///
    /// # Errors
    ///
    /// See [`GeometryNormalizer::plan`].
    pub fn normalize(&self, source: &Raster) -> Result<Raster, GeometryError> {
        let plan = self.plan(source.width(), source.height())?;
        tracing::debug!(
            src_width = source.width(),
            src_height = source.height(),
            scaled_width = plan.scaled_width,
            scaled_height = plan.scaled_height,
            crop_x = plan.crop_x,
            crop_y = plan.crop_y,
            rotate = plan.rotate,
            "geometry"
        );

        let covered = cover(source, &plan);
        Ok(if plan.rotate {
            rotate_clockwise(&covered)
        } else {
            covered
        })
    }
}

/// Exact rational scale `num / den` = max(frame_w / src_w, frame_h / src_h).
#[derive(Debug, Clone, Copy)]
struct CoverScale {
    num: u64,
    den: u64,
}

impl CoverScale {
    fn new(src_w: u32, src_h: u32, frame_w: u32, frame_h: u32) -> Self {
        let (sw, sh, fw, fh) = (src_w as u64, src_h as u64, frame_w as u64, frame_h as u64);
        // fw/sw >= fh/sh  <=>  fw*sh >= fh*sw
        if fw * sh >= fh * sw {
            Self { num: fw, den: sw }
        } else {
            Self { num: fh, den: sh }
        }
    }

    /// Scaled length, never smaller than the frame on the fitted axis.
    fn apply(self, len: u32) -> u32 {
        (len as u64 * self.num / self.den) as u32
    }

    /// Source coordinate sampled for scaled coordinate `x`.
    fn source(self, x: u32, src_len: u32) -> u32 {
        ((x as u64 * self.den / self.num) as u32).min(src_len - 1)
    }
}

fn cover(source: &Raster, plan: &GeometryPlan) -> Raster {
    let scale = CoverScale::new(
        source.width(),
        source.height(),
        plan.frame_width,
        plan.frame_height,
    );

    let xs: Vec<u32> = (0..plan.frame_width)
        .map(|x| scale.source(x + plan.crop_x, source.width()))
        .collect();

    let mut pixels: Vec<Rgb> =
        Vec::with_capacity(plan.frame_width as usize * plan.frame_height as usize);
    for y in 0..plan.frame_height {
        let sy = scale.source(y + plan.crop_y, source.height());
        pixels.extend(xs.iter().map(|&sx| source.get(sx, sy)));
    }

    Raster::from_parts(plan.frame_width, plan.frame_height, pixels)
}

/// Rotate 90° clockwise: source `(x, y)` lands at `(height - 1 - y, x)`.
pub fn rotate_clockwise(source: &Raster) -> Raster {
    let (w, h) = (source.width(), source.height());
    let mut rotated = Raster::filled(h, w, Rgb::BLACK);
    for y in 0..h {
        for x in 0..w {
            rotated.set(h - 1 - y, x, source.get(x, y));
        }
    }
    rotated
}
