//! Domain-critical regression tests for epaper-dither.
//!
//! These tests are designed to catch specific classes of bugs, not just
//! confirm happy paths. Each test documents the regression it guards against.

#[cfg(test)]
mod domain_tests {
    use crate::api::Renderer;
    use crate::color::Rgb;
    use crate::dither::{Dither, DitherAlgorithm};
    use crate::output::{FramePacker, PackedFrame};
    use crate::palette::{ActivePalette, CalibrationLayout, ColorMethod, Palette, PaletteSource};
    use crate::params::{Preset, ProcessingParameters, ToneMode};
    use crate::preprocess::{scurve, GeometryNormalizer, ToneAdjuster};
    use crate::raster::Raster;

    fn black_white() -> ActivePalette {
        Palette::from_theoretical(&[Rgb::BLACK, Rgb::WHITE])
            .unwrap()
            .resolve(PaletteSource::Theoretical)
    }

    /// Varied, deterministic test image.
    fn swatch(width: u32, height: u32) -> Raster {
        let mut raster = Raster::filled(width, height, Rgb::BLACK);
        for (i, px) in raster.pixels_mut().iter_mut().enumerate() {
            *px = Rgb::new(
                (i * 37 % 256) as u8,
                (i * 11 % 256) as u8,
                (255 - i * 5 % 256) as u8,
            );
        }
        raster
    }

    // ========================================================================
    // GAP 1: Tone curve shape
    // ========================================================================

    /// If this breaks, it means: a zero-strength S-curve is no longer a true
    /// identity, so "S-curve off" silently alters every image.
    #[test]
    fn test_zero_strength_scurve_is_bit_identical() {
        let params = ProcessingParameters::new()
            .tone_mode(ToneMode::Scurve)
            .scurve(0.0, 1.5, 1.5, 0.4)
            .compress_dynamic_range(false);
        let src = swatch(64, 48);
        let out = ToneAdjuster::new(&params).apply(&src);
        assert_eq!(
            out, src,
            "REGRESSION: strength=0 with neutral exposure/saturation changed pixels"
        );
    }

    /// If this breaks, it means: the shadow and highlight branches disagree
    /// at the pivot, producing a visible band at mid-tones.
    #[test]
    fn test_scurve_continuous_at_midpoint() {
        for i in 1..100 {
            let m = i as f32 / 100.0;
            let y = scurve(m, 1.7, 0.8, 1.2, m);
            assert_eq!(
                y, m,
                "REGRESSION: S-curve at midpoint {m} evaluated to {y}, expected exactly {m}"
            );
        }
    }

    /// If this breaks, it means: some parameter combination makes the tone
    /// curve fold back on itself, inverting gradients.
    #[test]
    fn test_scurve_monotone_over_parameter_grid() {
        let values = [0.0, 0.5, 1.0, 2.0, 3.0];
        for &s in &values {
            for &sb in &values {
                for &hc in &values {
                    for &m in &[0.01, 0.3, 0.5, 0.99] {
                        let mut prev = scurve(0.0, s, sb, hc, m);
                        for i in 1..=256 {
                            let curr = scurve(i as f32 / 256.0, s, sb, hc, m);
                            assert!(
                                curr >= prev,
                                "REGRESSION: S-curve decreases at x={} for strength={s} \
                                 shadowBoost={sb} highlightCompress={hc} midpoint={m}",
                                i as f32 / 256.0
                            );
                            prev = curr;
                        }
                    }
                }
            }
        }
    }

    // ========================================================================
    // GAP 2: Dithering boundedness and tone preservation
    // ========================================================================

    /// If this breaks, it means: error diffusion no longer preserves average
    /// tone (wrong weights, dropped residual, or runaway accumulation).
    #[test]
    fn test_mid_gray_black_white_ratio() {
        let palette = black_white();
        let raster = Raster::filled(100, 100, Rgb::new(128, 128, 128));
        for algorithm in DitherAlgorithm::ALL {
            if algorithm == DitherAlgorithm::Atkinson {
                // Discards a quarter of the error by construction.
                continue;
            }
            let indices = algorithm.dither(&raster, &palette, ColorMethod::Rgb);
            let white = indices.iter().filter(|&&i| i == 1).count();
            let ratio = white as f64 / indices.len() as f64;
            assert!(
                (ratio - 128.0 / 255.0).abs() < 0.03,
                "REGRESSION: {algorithm} rendered gray 128 with white ratio {ratio:.3}, \
                 expected ~0.502"
            );
        }
    }

    /// If this breaks, it means: quantization is no longer done against the
    /// measured colors, so a calibrated panel reproduces gray too dark.
    #[test]
    fn test_measured_palette_shifts_tone_target() {
        let mut palette = Palette::from_theoretical(&[Rgb::BLACK, Rgb::WHITE]).unwrap();
        palette.set_measured(0, Some(Rgb::new(2, 2, 2))).unwrap();
        palette.set_measured(1, Some(Rgb::new(190, 190, 190))).unwrap();
        let active = palette.resolve(PaletteSource::Measured);

        // 96 sits halfway between measured black and white.
        let raster = Raster::filled(100, 100, Rgb::new(96, 96, 96));
        let indices = DitherAlgorithm::FloydSteinberg.dither(&raster, &active, ColorMethod::Rgb);
        let ratio = indices.iter().filter(|&&i| i == 1).count() as f64 / 10_000.0;
        assert!(
            (ratio - 0.5).abs() < 0.03,
            "REGRESSION: gray 96 against measured 2/190 gave white ratio {ratio:.3}, expected ~0.5"
        );
    }

    /// If this breaks, it means: out-of-gamut targets let error grow without
    /// bound and long runs of one colorant appear.
    #[test]
    fn test_saturated_input_stays_bounded() {
        let active = Palette::spectra6().resolve(PaletteSource::Measured);
        // Pure white is far outside what the measured palette can show.
        let raster = Raster::filled(200, 50, Rgb::WHITE);
        let indices = DitherAlgorithm::FloydSteinberg.dither(&raster, &active, ColorMethod::Rgb);
        assert!(
            indices.iter().all(|&i| i == 1),
            "REGRESSION: saturated white produced non-white indices, error is accumulating"
        );
    }

    // ========================================================================
    // GAP 3: Palette index set consistency
    // ========================================================================

    /// If this breaks, it means: the quantizer can emit the reserved index 4
    /// (or any index the packer rejects) for some input.
    #[test]
    fn test_no_reserved_index_from_any_algorithm() {
        let palette = Palette::spectra6();
        let colorants = palette.colorants();
        let src = swatch(48, 32);
        for source in [PaletteSource::Theoretical, PaletteSource::Measured] {
            let active = palette.resolve(source);
            assert_eq!(active.colorants(), colorants);
            for method in [ColorMethod::Rgb, ColorMethod::Perceptual] {
                for algorithm in DitherAlgorithm::ALL {
                    let indices = algorithm.dither(&src, &active, method);
                    assert!(
                        indices.iter().all(|&i| colorants.contains(i)),
                        "REGRESSION: {algorithm}/{method:?}/{source:?} emitted an index outside {colorants:?}"
                    );
                    assert!(FramePacker::new(colorants).pack(&indices, 48, 32).is_ok());
                }
            }
        }
    }

    /// If this breaks, it means: nearest-color ties depend on iteration
    /// order or float noise instead of resolving to the lowest index.
    #[test]
    fn test_ties_go_to_lowest_index() {
        let active = black_white();
        let entry = active.find_nearest([127.5, 127.5, 127.5], ColorMethod::Rgb);
        assert_eq!(entry.index, 0, "REGRESSION: equidistant gray did not pick index 0");

        let duplicated = Palette::from_theoretical(&[Rgb::WHITE, Rgb::BLACK, Rgb::BLACK])
            .unwrap()
            .resolve(PaletteSource::Theoretical);
        for method in [ColorMethod::Rgb, ColorMethod::Perceptual] {
            let entry = duplicated.find_nearest([10.0, 10.0, 10.0], method);
            assert_eq!(
                entry.index, 1,
                "REGRESSION: duplicate colors did not resolve to the lower index ({method:?})"
            );
        }
    }

    /// If this breaks, it means: one missing measurement throws away the
    /// whole calibration instead of falling back for that entry only.
    #[test]
    fn test_partial_calibration_falls_back_per_entry() {
        let mut palette = Palette::spectra6();
        palette.set_measured(3, None).unwrap();
        let active = palette.resolve(PaletteSource::Measured);
        assert_eq!(active.color_of(3), Some(Rgb::new(255, 0, 0)));
        assert_eq!(
            active.color_of(1),
            Some(Rgb::new(190, 190, 190)),
            "REGRESSION: calibrated entries lost their measured value"
        );
    }

    // ========================================================================
    // GAP 4: Geometry
    // ========================================================================

    /// If this breaks, it means: cover scaling leaves borders or the crop
    /// drifts off-center for some aspect ratio.
    #[test]
    fn test_cover_output_is_exact_and_centered() {
        let sources = [(1, 1), (3, 7), (800, 480), (1920, 1080), (1000, 1000), (17, 5)];
        let targets = [(800, 480), (480, 800), (13, 13), (1, 9)];
        for &(tw, th) in &targets {
            let normalizer = GeometryNormalizer::new(tw, th);
            for &(sw, sh) in &sources {
                let plan = normalizer.plan(sw, sh).unwrap();
                let excess_x = plan.scaled_width - plan.frame_width;
                let excess_y = plan.scaled_height - plan.frame_height;
                assert!(
                    excess_x == 0 || excess_y == 0,
                    "REGRESSION: {sw}x{sh} -> {tw}x{th} overflows both axes"
                );
                assert!(
                    excess_x - 2 * plan.crop_x <= 1 && excess_y - 2 * plan.crop_y <= 1,
                    "REGRESSION: {sw}x{sh} -> {tw}x{th} crop is not centered: {plan:?}"
                );

                let out = normalizer.normalize(&Raster::filled(sw, sh, Rgb::WHITE)).unwrap();
                assert_eq!((out.width(), out.height()), (tw, th));
            }
        }
    }

    // ========================================================================
    // GAP 5: Packing and end-to-end determinism
    // ========================================================================

    /// If this breaks, it means: the nibble order or padding changed and the
    /// panel would show pixels swapped in pairs.
    #[test]
    fn test_packing_layout() {
        let colorants = Palette::spectra6().colorants();
        let valid = [0u8, 1, 2, 3, 5, 6];
        for (w, h) in [(1, 1), (3, 1), (2, 2), (5, 3), (8, 8)] {
            let indices: Vec<u8> = (0..w * h).map(|i| valid[i % 6]).collect();
            let frame = FramePacker::new(colorants)
                .pack(&indices, w as u32, h as u32)
                .unwrap();
            assert_eq!(frame.len(), PackedFrame::byte_len(w as u32, h as u32));
            for (i, &byte) in frame.bytes().iter().enumerate() {
                assert_eq!(byte >> 4, indices[2 * i], "REGRESSION: high nibble of byte {i}");
                let low = indices.get(2 * i + 1).copied().unwrap_or(0);
                assert_eq!(byte & 0x0F, low, "REGRESSION: low nibble of byte {i}");
            }
        }
    }

    /// If this breaks, it means: pixels already equal to palette primaries
    /// are no longer reproduced exactly (the reference regression fixture).
    #[test]
    fn test_primaries_scenario() {
        let src = Raster::new(
            2,
            2,
            vec![
                Rgb::new(255, 0, 0),
                Rgb::new(0, 255, 0),
                Rgb::new(0, 0, 255),
                Rgb::new(255, 255, 255),
            ],
        )
        .unwrap();
        let params = ProcessingParameters::preset(Preset::Stock)
            .dither_algorithm(DitherAlgorithm::FloydSteinberg)
            .tone_mode(ToneMode::Contrast)
            .contrast(1.0);
        let out = Renderer::new(Palette::spectra6())
            .target(2, 2)
            .params(params)
            .render(&src)
            .unwrap();

        assert_eq!(out.adjusted, src, "REGRESSION: neutral tone settings changed pixels");
        assert_eq!(out.dithered.indices(), &[3, 6, 5, 1]);
        assert_eq!(out.frame.bytes(), &[0x36, 0x51]);
    }

    /// If this breaks, it means: output depends on hidden state (thread,
    /// previous render, allocation) rather than only on the inputs.
    #[test]
    fn test_parallel_renders_are_identical() {
        let renderer = Renderer::new(Palette::spectra6())
            .target(40, 24)
            .params(
                ProcessingParameters::new()
                    .tone_mode(ToneMode::Scurve)
                    .scurve(1.2, 0.4, 0.6, 0.45)
                    .color_method(ColorMethod::Perceptual),
            );
        let src = swatch(64, 64);
        let baseline = renderer.render(&src).unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let renderer = renderer.clone();
                    let src = &src;
                    scope.spawn(move || renderer.render(src).unwrap())
                })
                .collect();
            for handle in handles {
                assert_eq!(
                    handle.join().unwrap(),
                    baseline,
                    "REGRESSION: concurrent render produced a different frame"
                );
            }
        });
    }

    /// If this breaks, it means: an out-of-range setting aborts the render
    /// instead of being clamped.
    #[test]
    fn test_out_of_range_parameters_still_render() {
        let params = ProcessingParameters {
            exposure: -3.0,
            saturation: f32::NAN,
            contrast: 40.0,
            midpoint: 1.0,
            ..ProcessingParameters::default()
        };
        let out = Renderer::default().target(10, 6).params(params).render(&swatch(20, 12));
        assert!(out.is_ok(), "REGRESSION: clamped parameters failed the render");
    }

    // ========================================================================
    // GAP 6: Calibration feeding back into rendering
    // ========================================================================

    /// If this breaks, it means: dynamic-range compression no longer targets
    /// the calibrated white, so a panel measured brighter than the reference
    /// renders pure white as colored noise.
    #[test]
    fn test_white_stays_white_after_calibration() {
        let mut palette = Palette::spectra6();
        palette.set_measured(0, Some(Rgb::new(20, 20, 20))).unwrap();
        palette.set_measured(1, Some(Rgb::new(230, 230, 230))).unwrap();

        let out = Renderer::new(palette)
            .target(40, 40)
            .params(ProcessingParameters::default())
            .render(&Raster::filled(40, 40, Rgb::WHITE))
            .unwrap();

        assert_eq!(out.adjusted.get(0, 0), Rgb::new(230, 230, 230));
        let histogram = out.dithered.histogram();
        assert_eq!(
            histogram[1], 1600,
            "REGRESSION: calibrated white rendered with histogram {histogram:?}"
        );
    }

    /// If this breaks, it means: the calibration pattern is dithered like a
    /// photo, and the next calibration samples contaminated patches.
    #[test]
    fn test_calibration_pattern_renders_as_solid_patches() {
        let palette = Palette::spectra6();
        let layout = CalibrationLayout::default();
        let pattern = layout.render_pattern(&palette, 60, 40).unwrap();

        let renderer = Renderer::new(palette).target(60, 40);
        assert_eq!(renderer.parameters(), &ProcessingParameters::default());
        let out = renderer
            .render_exact(&pattern)
            .unwrap()
            .expect("REGRESSION: pattern in theoretical colors was not packed as-is");

        // 3x2 grid of 20x20 patches in layout order
        for (i, &index) in out.dithered.indices().iter().enumerate() {
            let (x, y) = (i % 60, i / 60);
            let slot = (y / 20) * 3 + x / 20;
            assert_eq!(
                index,
                layout.order()[slot],
                "REGRESSION: pixel ({x}, {y}) of patch {slot} is not a single colorant"
            );
        }
    }
}
