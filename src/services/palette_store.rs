//! Palette JSON files.

use std::path::Path;

use epaper_dither::{Palette, PaletteError};

use crate::error::ToolError;

/// Load and validate a palette document
pub fn read_palette(path: &Path) -> Result<Palette, ToolError> {
    let json = std::fs::read_to_string(path).map_err(|e| ToolError::io(path, e))?;
    Ok(Palette::from_json(&json)?)
}

/// Pretty-printed palette document
pub fn to_json(palette: &Palette) -> Result<String, ToolError> {
    serde_json::to_string_pretty(palette)
        .map_err(|e| ToolError::Palette(PaletteError::Format(e.to_string())))
}

/// Write a palette document, replacing any existing file
pub fn write_palette(path: &Path, palette: &Palette) -> Result<(), ToolError> {
    let mut json = to_json(palette)?;
    json.push('\n');
    std::fs::write(path, json).map_err(|e| ToolError::io(path, e))
}
