//! Image file I/O: format sniffing, PNG decode and encode.

use std::io::Cursor;
use std::path::Path;

use epaper_dither::Raster;

use crate::error::ToolError;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Container format detected from the leading bytes of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Bmp,
}

impl ImageFormat {
    /// Detect the format from magic bytes. Inputs shorter than 8 bytes are
    /// never recognized.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < PNG_MAGIC.len() {
            return None;
        }
        if bytes.starts_with(&PNG_MAGIC) {
            Some(Self::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(b"BM") {
            Some(Self::Bmp)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Bmp => "BMP",
        }
    }
}

/// Decode any supported image into an RGB raster
pub fn decode_image(bytes: &[u8]) -> Result<Raster, ToolError> {
    match ImageFormat::sniff(bytes) {
        Some(ImageFormat::Png) => decode_png(bytes),
        Some(other) => Err(ToolError::UnsupportedFormat(other.name())),
        None => Err(ToolError::UnknownFormat),
    }
}

/// Decode a PNG of any color type to 8-bit RGB.
///
/// Palette and low-bit images are expanded, 16-bit channels stripped, gray
/// replicated to three channels and alpha dropped.
pub fn decode_png(bytes: &[u8]) -> Result<Raster, ToolError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| ToolError::PngDecode(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| ToolError::PngDecode(e.to_string()))?;
    let data = &buf[..info.buffer_size()];

    let rgb: Vec<u8> = match info.color_type {
        png::ColorType::Rgb => data.to_vec(),
        png::ColorType::Rgba => data
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect(),
        png::ColorType::Grayscale => data.iter().flat_map(|&v| [v, v, v]).collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0]])
            .collect(),
        png::ColorType::Indexed => {
            return Err(ToolError::PngDecode(
                "indexed image was not expanded".to_string(),
            ))
        }
    };

    tracing::debug!(
        width = info.width,
        height = info.height,
        color_type = ?info.color_type,
        "Decoded PNG"
    );
    Ok(Raster::from_rgb_bytes(info.width, info.height, &rgb)?)
}

/// Encode a raster as an 8-bit RGB PNG
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>, ToolError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, raster.width(), raster.height());
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ToolError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&raster.to_rgb_bytes())
            .map_err(|e| ToolError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Read and decode an image file
pub fn read_image(path: &Path) -> Result<Raster, ToolError> {
    let bytes = std::fs::read(path).map_err(|e| ToolError::io(path, e))?;
    decode_image(&bytes)
}

/// Encode and write a PNG file
pub fn write_png(path: &Path, raster: &Raster) -> Result<(), ToolError> {
    let bytes = encode_png(raster)?;
    std::fs::write(path, bytes).map_err(|e| ToolError::io(path, e))
}
