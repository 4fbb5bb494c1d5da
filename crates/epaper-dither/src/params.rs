//! Per-render processing parameters.
//!
//! [`ProcessingParameters`] is the typed form of the settings API. Field names
//! serialize in camelCase (`toneMode`, `shadowBoost`, ...) and every key is
//! optional on input. Values outside their documented range never abort a
//! render: [`ProcessingParameters::sanitize`] clamps them and reports a
//! [`ParameterRangeError`] for each one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dither::DitherAlgorithm;
use crate::palette::{ColorMethod, PaletteSource};

/// Tone curve applied after exposure, saturation and range compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneMode {
    /// Linear contrast around mid-gray.
    #[default]
    Contrast,
    /// Two-segment power curve around `midpoint`.
    #[serde(alias = "s-curve")]
    Scurve,
}

impl FromStr for ToneMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contrast" => Ok(Self::Contrast),
            "scurve" | "s-curve" => Ok(Self::Scurve),
            other => Err(format!("unknown tone mode {other:?}")),
        }
    }
}

/// A configuration value fell outside its documented range and was clamped.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("parameter {name} = {value} is outside [{min}, {max}], using {clamped_to}")]
pub struct ParameterRangeError {
    pub name: &'static str,
    pub value: f32,
    pub min: f32,
    pub max: f32,
    pub clamped_to: f32,
}

/// Everything a single render needs besides the image and the palette.
///
/// | field               | range        | default           |
/// |---------------------|--------------|-------------------|
/// | `exposure`          | 0.0 – 4.0    | 1.0               |
/// | `saturation`        | 0.0 – 3.0    | 1.0               |
/// | `contrast`          | 0.5 – 2.0    | 1.0               |
/// | `strength`          | 0.0 – 3.0    | 0.5               |
/// | `shadow_boost`      | 0.0 – 3.0    | 0.0               |
/// | `highlight_compress`| 0.0 – 3.0    | 0.0               |
/// | `midpoint`          | 0.01 – 0.99  | 0.5               |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessingParameters {
    /// Linear gain on all channels.
    pub exposure: f32,
    /// Chroma scale around Rec.601 luma.
    pub saturation: f32,
    pub tone_mode: ToneMode,
    /// Multiplier around mid-gray, used by [`ToneMode::Contrast`].
    pub contrast: f32,
    /// Overall S-curve strength; 0 makes the curve an identity.
    pub strength: f32,
    pub shadow_boost: f32,
    pub highlight_compress: f32,
    /// S-curve pivot, exclusive of 0 and 1.
    pub midpoint: f32,
    pub color_method: ColorMethod,
    pub dither_algorithm: DitherAlgorithm,
    pub compress_dynamic_range: bool,
    /// Quantize against measured rather than theoretical colors.
    pub render_measured: bool,
}

/// Accepted range and fallback of one numeric field.
struct Bound {
    name: &'static str,
    min: f32,
    max: f32,
    default: f32,
}

const EXPOSURE: Bound = Bound {
    name: "exposure",
    min: 0.0,
    max: 4.0,
    default: 1.0,
};
const SATURATION: Bound = Bound {
    name: "saturation",
    min: 0.0,
    max: 3.0,
    default: 1.0,
};
const CONTRAST: Bound = Bound {
    name: "contrast",
    min: 0.5,
    max: 2.0,
    default: 1.0,
};
const STRENGTH: Bound = Bound {
    name: "strength",
    min: 0.0,
    max: 3.0,
    default: 0.5,
};
const SHADOW_BOOST: Bound = Bound {
    name: "shadowBoost",
    min: 0.0,
    max: 3.0,
    default: 0.0,
};
const HIGHLIGHT_COMPRESS: Bound = Bound {
    name: "highlightCompress",
    min: 0.0,
    max: 3.0,
    default: 0.0,
};
const MIDPOINT: Bound = Bound {
    name: "midpoint",
    min: 0.01,
    max: 0.99,
    default: 0.5,
};

impl Bound {
    fn apply(&self, value: &mut f32, errors: &mut Vec<ParameterRangeError>) {
        let clamped = if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        };
        if clamped != *value || value.is_nan() {
            errors.push(ParameterRangeError {
                name: self.name,
                value: *value,
                min: self.min,
                max: self.max,
                clamped_to: clamped,
            });
            *value = clamped;
        }
    }
}

impl ProcessingParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters of a named preset.
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Default => Self::default(),
            Preset::Stock => Self {
                tone_mode: ToneMode::Contrast,
                contrast: 1.0,
                compress_dynamic_range: false,
                render_measured: false,
                ..Self::default()
            },
        }
    }

    /// Clamp every numeric field into its range, returning one error per
    /// adjusted field. NaN is replaced by the field's default.
    pub fn sanitize(&mut self) -> Vec<ParameterRangeError> {
        let mut errors = Vec::new();
        EXPOSURE.apply(&mut self.exposure, &mut errors);
        SATURATION.apply(&mut self.saturation, &mut errors);
        CONTRAST.apply(&mut self.contrast, &mut errors);
        STRENGTH.apply(&mut self.strength, &mut errors);
        SHADOW_BOOST.apply(&mut self.shadow_boost, &mut errors);
        HIGHLIGHT_COMPRESS.apply(&mut self.highlight_compress, &mut errors);
        MIDPOINT.apply(&mut self.midpoint, &mut errors);
        errors
    }

    /// [`sanitize`](Self::sanitize), logging each adjustment as a warning.
    pub fn sanitized(mut self) -> Self {
        for err in self.sanitize() {
            tracing::warn!(%err, "parameter clamped");
        }
        self
    }

    /// Palette colors this render quantizes against.
    pub fn palette_source(&self) -> PaletteSource {
        PaletteSource::from_render_measured(self.render_measured)
    }

    pub fn exposure(mut self, exposure: f32) -> Self {
        self.exposure = exposure;
        self
    }

    pub fn saturation(mut self, saturation: f32) -> Self {
        self.saturation = saturation;
        self
    }

    pub fn tone_mode(mut self, tone_mode: ToneMode) -> Self {
        self.tone_mode = tone_mode;
        self
    }

    pub fn contrast(mut self, contrast: f32) -> Self {
        self.contrast = contrast;
        self
    }

    /// Set the S-curve shape in one call.
    pub fn scurve(
        mut self,
        strength: f32,
        shadow_boost: f32,
        highlight_compress: f32,
        midpoint: f32,
    ) -> Self {
        self.tone_mode = ToneMode::Scurve;
        self.strength = strength;
        self.shadow_boost = shadow_boost;
        self.highlight_compress = highlight_compress;
        self.midpoint = midpoint;
        self
    }

    pub fn color_method(mut self, color_method: ColorMethod) -> Self {
        self.color_method = color_method;
        self
    }

    pub fn dither_algorithm(mut self, algorithm: DitherAlgorithm) -> Self {
        self.dither_algorithm = algorithm;
        self
    }

    pub fn compress_dynamic_range(mut self, enabled: bool) -> Self {
        self.compress_dynamic_range = enabled;
        self
    }

    pub fn render_measured(mut self, enabled: bool) -> Self {
        self.render_measured = enabled;
        self
    }
}

impl Default for ProcessingParameters {
    fn default() -> Self {
        Self {
            exposure: EXPOSURE.default,
            saturation: SATURATION.default,
            tone_mode: ToneMode::Contrast,
            contrast: CONTRAST.default,
            strength: STRENGTH.default,
            shadow_boost: SHADOW_BOOST.default,
            highlight_compress: HIGHLIGHT_COMPRESS.default,
            midpoint: MIDPOINT.default,
            color_method: ColorMethod::Rgb,
            dither_algorithm: DitherAlgorithm::FloydSteinberg,
            compress_dynamic_range: true,
            render_measured: true,
        }
    }
}

/// Named parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Calibrated rendering with dynamic-range compression.
    #[default]
    Default,
    /// Theoretical palette, no compression; matches the vendor converter.
    Stock,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Default, Preset::Stock];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::Stock => "stock",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown preset {s:?} (expected default or stock)"))
    }
}
