//! Test images and constants.

use epaper_dither::{Raster, Rgb};

/// Colorant indices of the built-in palette
pub mod indices {
    pub const BLACK: u8 = 0;
    pub const WHITE: u8 = 1;
    pub const YELLOW: u8 = 2;
    pub const RED: u8 = 3;
    pub const BLUE: u8 = 5;
    pub const GREEN: u8 = 6;
}

/// Smooth gradient through the RGB cube
pub fn gradient(width: u32, height: u32) -> Raster {
    let mut raster = Raster::filled(width, height, Rgb::BLACK);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            raster.set(x, y, Rgb::new(r, g, 255 - r / 2 - g / 2));
        }
    }
    raster
}

/// Portrait image with a red top half and blue bottom half
pub fn portrait_red_over_blue(width: u32, height: u32) -> Raster {
    let mut raster = Raster::filled(width, height, Rgb::new(0, 0, 255));
    for y in 0..height / 2 {
        for x in 0..width {
            raster.set(x, y, Rgb::new(255, 0, 0));
        }
    }
    raster
}

/// 2x2 image of pure red, green, blue and white
pub fn primaries() -> Raster {
    Raster::new(
        2,
        2,
        vec![
            Rgb::new(255, 0, 0),
            Rgb::new(0, 255, 0),
            Rgb::new(0, 0, 255),
            Rgb::new(255, 255, 255),
        ],
    )
    .expect("2x2 primaries")
}

/// Minimal JPEG header, enough for format sniffing
pub const JPEG_HEADER: [u8; 12] = [
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01,
];
