//! Tests for loading config files and deriving the render setup from them.

mod common;

use common::TestWorkspace;
use epaper_dither::{DitherAlgorithm, Palette, PaletteSource, Preset, Rgb};
use photoframe::models::{AppConfig, DisplaySpec};
use photoframe::services::palette_store;
use pretty_assertions::assert_eq;

#[test]
fn test_config_with_palette_file() {
    let ws = TestWorkspace::new();
    let mut panel = Palette::spectra6();
    panel.set_measured(2, Some(Rgb::new(220, 210, 10))).unwrap();
    palette_store::write_palette(&ws.path("panel.json"), &panel).unwrap();

    let config_path = ws.write(
        "config.yaml",
        r#"
display:
  width: 480
  height: 800
processing:
  exposure: 1.2
  ditherAlgorithm: atkinson
palette: panel.json
"#,
    );

    let config = AppConfig::load(&config_path);

    assert_eq!(config.display.width, 480);
    assert_eq!(config.display.height, 800);
    assert_eq!(config.processing.exposure, 1.2);
    assert_eq!(config.processing.dither_algorithm, DitherAlgorithm::Atkinson);
    assert_eq!(config.load_palette(), panel);

    let renderer = config
        .display
        .renderer(config.load_palette(), config.processing);
    assert_eq!(renderer.geometry().target(), (480, 800));
}

#[test]
fn test_settings_are_sanitized() {
    let ws = TestWorkspace::new();
    let config_path = ws.write(
        "config.yaml",
        "processing: {exposure: 9.0, midpoint: 0.0, contrast: 1.5}\n",
    );

    let params = AppConfig::load(&config_path)
        .parameters(None, None)
        .sanitized();

    assert_eq!(params.exposure, 4.0);
    assert_eq!(params.midpoint, 0.01);
    assert_eq!(params.contrast, 1.5);
}

#[test]
fn test_settings_json_uses_camel_case() {
    let params = AppConfig::default().parameters(Some(Preset::Stock), None);
    let json = serde_json::to_value(params).unwrap();

    assert_eq!(json["toneMode"], "contrast");
    assert_eq!(json["ditherAlgorithm"], "floyd-steinberg");
    assert_eq!(json["compressDynamicRange"], false);
    assert_eq!(json["renderMeasured"], false);
    assert_eq!(params.palette_source(), PaletteSource::Theoretical);
}

#[test]
fn test_missing_config_uses_panel_defaults() {
    let ws = TestWorkspace::new();
    let config = AppConfig::load_or_default(Some(&ws.path("missing.yaml")));

    assert_eq!(config.display, DisplaySpec::SPECTRA6_7IN3);
    assert_eq!(config.display.frame_bytes(), 192_000);
    assert_eq!(config.load_palette(), Palette::spectra6());
}
