use epaper_dither::{
    Palette, PackedFrame, ProcessingParameters, Renderer, PANEL_HEIGHT, PANEL_WIDTH,
};
use serde::{Deserialize, Serialize};

/// Physical panel the frames are rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplaySpec {
    pub width: u32,
    pub height: u32,
    /// Crop instead of rotating sources whose orientation differs
    pub skip_rotation: bool,
}

impl DisplaySpec {
    /// 7.3" Spectra-6 panel: 800x480, landscape
    pub const SPECTRA6_7IN3: Self = Self {
        width: PANEL_WIDTH,
        height: PANEL_HEIGHT,
        skip_rotation: false,
    };

    /// Override the panel size, keeping the rotation policy
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Size of one packed frame in bytes
    pub fn frame_bytes(&self) -> usize {
        PackedFrame::byte_len(self.width, self.height)
    }

    /// Pipeline configured for this panel
    pub fn renderer(&self, palette: Palette, params: ProcessingParameters) -> Renderer {
        Renderer::new(palette)
            .target(self.width, self.height)
            .skip_rotation(self.skip_rotation)
            .params(params)
    }
}

impl Default for DisplaySpec {
    fn default() -> Self {
        Self::SPECTRA6_7IN3
    }
}
