//! Table-driven sRGB decoding.
//!
//! The table is generated by build.rs; interpolation between entries keeps
//! fractional (error-adjusted) channel values smooth.

include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

const LAST: usize = SRGB_TO_LINEAR.len() - 1;

/// Decode an sRGB value (0.0..=1.0) to linear light. Out-of-range input is clamped.
#[inline]
pub fn srgb_to_linear(srgb: f32) -> f32 {
    let scaled = srgb.clamp(0.0, 1.0) * LAST as f32;
    let index = scaled as usize;
    if index >= LAST {
        return SRGB_TO_LINEAR[LAST];
    }

    let frac = scaled - index as f32;
    let a = SRGB_TO_LINEAR[index];
    let b = SRGB_TO_LINEAR[index + 1];
    a + (b - a) * frac
}
