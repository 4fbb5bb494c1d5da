//! Pipeline outputs.
//!
//! - [`DitheredImage`]: one palette index per pixel, with RGB previews
//! - [`PackedFrame`]: the 4-bit panel buffer built by [`FramePacker`]

mod dithered_image;
mod packed;

pub use dithered_image::DitheredImage;
pub use packed::{FramePacker, PackedFrame, PackingRangeError};
