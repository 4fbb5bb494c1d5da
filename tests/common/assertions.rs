//! Assertion helpers for tests.

use pretty_assertions::assert_eq;

/// Index of pixel `pixel` in a packed frame
pub fn frame_index(frame: &[u8], pixel: usize) -> u8 {
    let byte = frame[pixel / 2];
    if pixel % 2 == 0 {
        byte >> 4
    } else {
        byte & 0x0F
    }
}

/// Assert a frame has the packed size of a `width` x `height` panel
pub fn assert_frame_size(frame: &[u8], width: u32, height: u32) {
    let expected = (width as usize * height as usize).div_ceil(2);
    assert_eq!(
        frame.len(),
        expected,
        "Expected {expected} bytes for {width}x{height}, got {}",
        frame.len()
    );
}

/// Assert every pixel of a frame uses a colorant of the built-in palette
pub fn assert_valid_indices(frame: &[u8], width: u32, height: u32) {
    assert_frame_size(frame, width, height);
    let pixels = width as usize * height as usize;
    for pixel in 0..pixels {
        let index = frame_index(frame, pixel);
        assert!(
            matches!(index, 0 | 1 | 2 | 3 | 5 | 6),
            "Pixel {pixel} has index {index}, which is not a colorant"
        );
    }
    if pixels % 2 == 1 {
        assert_eq!(
            frame[pixels / 2] & 0x0F,
            0,
            "Padding nibble of odd-sized frame must be zero"
        );
    }
}

/// Assert the file at `path` is a PNG of the given size
pub fn assert_png_size(path: &std::path::Path, width: u32, height: u32) {
    let raster = photoframe::rendering::read_image(path)
        .unwrap_or_else(|e| panic!("{} is not a readable PNG: {e}", path.display()));
    assert_eq!(
        (raster.width(), raster.height()),
        (width, height),
        "Unexpected size of {}",
        path.display()
    );
}
