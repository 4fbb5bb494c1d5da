use std::path::{Path, PathBuf};

use epaper_dither::{DitherAlgorithm, Palette, Preset, ProcessingParameters};
use serde::{Deserialize, Serialize};

use crate::error::ToolError;
use crate::models::DisplaySpec;
use crate::services::palette_store;

/// Tool configuration loaded from config.yaml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Target panel
    pub display: DisplaySpec,

    /// Rendering parameters, same keys as the settings API
    pub processing: ProcessingParameters,

    /// Palette JSON; relative paths are resolved against the config file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette: Option<PathBuf>,
}

impl AppConfig {
    /// Parse YAML without any fallback
    pub fn from_yaml(yaml: &str) -> Result<Self, ToolError> {
        serde_yaml::from_str(yaml).map_err(|e| ToolError::Settings(e.to_string()))
    }

    /// Load configuration from a file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), %e, "Failed to read config, using defaults");
                return Self::default();
            }
        };

        match Self::from_yaml(&content) {
            Ok(mut config) => {
                if let (Some(palette), Some(dir)) = (&config.palette, path.parent()) {
                    if palette.is_relative() {
                        config.palette = Some(dir.join(palette));
                    }
                }
                tracing::info!(
                    path = %path.display(),
                    width = config.display.width,
                    height = config.display.height,
                    "Loaded configuration"
                );
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), %e, "Failed to parse config, using defaults");
                Self::default()
            }
        }
    }

    /// [`AppConfig::load`] when a path is given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Self {
        path.map(Self::load).unwrap_or_default()
    }

    /// The configured palette, or the built-in Spectra-6 palette if none is
    /// configured or it cannot be loaded
    pub fn load_palette(&self) -> Palette {
        let Some(path) = &self.palette else {
            return Palette::spectra6();
        };
        match palette_store::read_palette(path) {
            Ok(palette) => palette,
            Err(e) => {
                tracing::warn!(%e, "Failed to load palette, using built-in");
                Palette::spectra6()
            }
        }
    }

    /// Processing parameters with command-line overrides applied. A preset
    /// replaces the configured parameters as a whole; the dither algorithm
    /// is then set on top.
    pub fn parameters(
        &self,
        preset: Option<Preset>,
        dither: Option<DitherAlgorithm>,
    ) -> ProcessingParameters {
        let params = preset.map_or(self.processing, ProcessingParameters::preset);
        match dither {
            Some(algorithm) => params.dither_algorithm(algorithm),
            None => params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epaper_dither::{ColorMethod, PaletteSource, ToneMode};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.display, DisplaySpec::SPECTRA6_7IN3);
        assert_eq!(config.processing, ProcessingParameters::default());
        assert_eq!(config.palette, None);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
display:
  width: 480
  height: 800
  skipRotation: true
processing:
  toneMode: scurve
  strength: 1.2
  colorMethod: lab
  ditherAlgorithm: jjn
  renderMeasured: false
palette: panel.json
"#;

        let config = AppConfig::from_yaml(yaml).unwrap();

        assert_eq!((config.display.width, config.display.height), (480, 800));
        assert!(config.display.skip_rotation);
        assert_eq!(config.processing.tone_mode, ToneMode::Scurve);
        assert_eq!(config.processing.strength, 1.2);
        assert_eq!(config.processing.color_method, ColorMethod::Perceptual);
        assert_eq!(
            config.processing.dither_algorithm,
            DitherAlgorithm::JarvisJudiceNinke
        );
        assert!(!config.processing.render_measured);
        // Untouched keys keep their defaults
        assert_eq!(config.processing.exposure, 1.0);
        assert!(config.processing.compress_dynamic_range);
        assert_eq!(config.palette, Some(PathBuf::from("panel.json")));
    }

    #[test]
    fn test_invalid_yaml_is_settings_error() {
        let result = AppConfig::from_yaml("display: [1, 2");
        assert!(matches!(result, Err(ToolError::Settings(_))));
    }

    #[test]
    fn test_load_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let missing = AppConfig::load(&dir.path().join("missing.yaml"));
        assert_eq!(missing, AppConfig::default());

        let broken = dir.path().join("broken.yaml");
        std::fs::write(&broken, "processing: {exposure: [").unwrap();
        assert_eq!(AppConfig::load(&broken), AppConfig::default());
    }

    #[test]
    fn test_relative_palette_resolved_against_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "palette: panel.json\n").unwrap();

        let config = AppConfig::load(&path);
        assert_eq!(config.palette, Some(dir.path().join("panel.json")));
    }

    #[test]
    fn test_unreadable_palette_falls_back() {
        let config = AppConfig {
            palette: Some(PathBuf::from("/nonexistent/palette.json")),
            ..Default::default()
        };
        assert_eq!(config.load_palette(), Palette::spectra6());
    }

    #[test]
    fn test_parameter_overrides() {
        let config = AppConfig::from_yaml("processing: {exposure: 1.5}").unwrap();

        assert_eq!(config.parameters(None, None).exposure, 1.5);

        let stock = config.parameters(Some(Preset::Stock), Some(DitherAlgorithm::Atkinson));
        assert_eq!(stock.exposure, 1.0);
        assert_eq!(stock.palette_source(), PaletteSource::Theoretical);
        assert_eq!(stock.dither_algorithm, DitherAlgorithm::Atkinson);
    }
}
