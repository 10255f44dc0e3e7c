//! End-to-end tests for the FFCC pipeline.
//!
//! Uses synthetic models (identity, Gaussian filter with a neutral prior)
//! since trained models are not shipped with the crate.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use ffcc_core::chroma::bin_index;
use ffcc_core::{Chromaticity, Error, GRID_SIZE, Grid, Image, Model};
use ffcc_ops::{Enhancer, build_histogram, enhance, estimate};

// ============================================================================
// Fixtures
// ============================================================================

/// Circular Gaussian filter centered at the origin plus a shallow bowl
/// around neutral as bias.
fn gaussian_model(sigma: f32) -> Model {
    let wrap = |i: usize| {
        let d = i.min(GRID_SIZE - i) as f32;
        d * d
    };
    let mut filter = Grid::from_fn(|r, c| (-(wrap(r) + wrap(c)) / (2.0 * sigma * sigma)).exp());
    let total = filter.sum() as f32;
    for v in filter.as_mut_slice() {
        *v /= total;
    }
    let bias = Grid::from_fn(|r, c| {
        let dr = r as f32 - 90.0;
        let dc = c as f32 - 90.0;
        -1e-6 * (dr * dr + dc * dc)
    });
    Model::new(filter, bias).unwrap()
}

/// Scene lit by an illuminant with the given log-chrominance: every surface
/// is a gray level multiplied by the illuminant color.
fn lit_scene(width: u32, height: u32, illum: Chromaticity) -> Image<f32> {
    let r = (-illum.u).exp() as f32;
    let b = (-illum.v).exp() as f32;
    let pixels = (0..width * height)
        .map(|i| {
            let level = 10.0 + (i % 17) as f32 * 5.0;
            [level * b, level, level * r]
        })
        .collect();
    Image::from_pixels(width, height, pixels).unwrap()
}

// ============================================================================
// Histogram properties
// ============================================================================

#[test]
fn histogram_is_a_probability_mass() {
    let img = lit_scene(32, 24, Chromaticity::new(0.3, -0.2));
    let hist = build_histogram(&img).unwrap();
    assert!(hist.grid().as_slice().iter().all(|&v| v >= 0.0));
    assert_relative_eq!(hist.grid().sum(), 1.0, epsilon = 1e-5);
}

#[test]
fn gray_image_mass_at_90_90() {
    let hist = build_histogram(&Image::filled(10, 10, [0.42f32, 0.42, 0.42])).unwrap();
    assert_abs_diff_eq!(hist.grid().get(90, 90), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(hist.grid().sum() - 1.0, 0.0, epsilon = 1e-6);
}

#[test]
fn shuffled_pixels_give_identical_histogram() {
    let img = lit_scene(16, 16, Chromaticity::new(-0.1, 0.25));
    let mut pixels: Vec<[f32; 3]> = img.pixels().map(|p| [p[0], p[1], p[2]]).collect();
    // deterministic shuffle
    for i in (1..pixels.len()).rev() {
        let j = (i * 7919 + 13) % (i + 1);
        pixels.swap(i, j);
    }
    let shuffled = Image::from_pixels(8, 32, pixels).unwrap();

    let model = gaussian_model(2.0);
    let a = estimate(&img, &model).unwrap();
    let b = estimate(&shuffled, &model).unwrap();
    assert_eq!(build_histogram(&img).unwrap(), build_histogram(&shuffled).unwrap());
    assert_eq!(a.illuminant, b.illuminant);
}

#[test]
fn zero_channels_are_skipped() {
    let mut pixels = vec![[0.0f32, 5.0, 5.0]; 10];
    pixels.push([5.0, 5.0, 5.0]);
    pixels.push([5.0, 0.0, 5.0]);
    let hist = build_histogram(&Image::from_pixels(12, 1, pixels).unwrap()).unwrap();
    assert_eq!(hist.samples(), 1);
    assert_abs_diff_eq!(hist.grid().get(90, 90), 1.0, epsilon = 1e-6);
}

// ============================================================================
// Estimation
// ============================================================================

#[test]
fn recovers_illuminant_of_lit_scene() {
    let illum = Chromaticity::new(0.35, -0.4);
    let est = estimate(&lit_scene(40, 30, illum), &gaussian_model(1.5)).unwrap();
    assert_eq!(est.illuminant.peak.row, bin_index(illum.u as f32));
    assert_eq!(est.illuminant.peak.col, bin_index(illum.v as f32));
    assert_abs_diff_eq!(est.chromaticity().u, illum.u, epsilon = 1.0 / 64.0);
    assert_abs_diff_eq!(est.chromaticity().v, illum.v, epsilon = 1.0 / 64.0);
}

#[test]
fn neutral_scene_gives_equal_gains() {
    let est = estimate(&Image::filled(5, 5, [200u8, 200, 200]), &Model::identity()).unwrap();
    let expected = 1.0 / 3f64.sqrt();
    assert_relative_eq!(est.gains.r, expected, epsilon = 1e-12);
    assert_relative_eq!(est.gains.g, expected, epsilon = 1e-12);
    assert_relative_eq!(est.gains.b, expected, epsilon = 1e-12);
}

#[test]
fn degenerate_image_falls_back_to_bias() {
    let est = estimate(&Image::filled(4, 4, [0u8, 0, 0]), &gaussian_model(2.0)).unwrap();
    assert!(est.is_degenerate());
    // bias bowl peaks at neutral
    assert_eq!((est.illuminant.peak.row, est.illuminant.peak.col), (90, 90));
}

// ============================================================================
// Full pipeline
// ============================================================================

#[test]
fn output_shape_matches_input() {
    let model = Model::identity();
    for (w, h) in [(1, 1), (13, 7), (64, 3)] {
        let img = lit_scene(w, h, Chromaticity::new(0.1, 0.1));
        let out = enhance(&img, &model).unwrap();
        assert_eq!((out.width(), out.height(), out.channels()), (w, h, 3));
    }
}

#[test]
fn repeated_runs_are_bit_identical() {
    let model = gaussian_model(2.0);
    let img = lit_scene(50, 20, Chromaticity::new(-0.3, 0.2));
    let first = enhance(&img, &model).unwrap();
    let second = enhance(&img, &model).unwrap();
    assert_eq!(first.data(), second.data());
}

#[test]
fn corrected_scene_is_neutral() {
    let model = gaussian_model(1.5);
    let out = enhance(&lit_scene(34, 10, Chromaticity::new(0.5, -0.3)), &model).unwrap();
    for px in out.pixels() {
        let spread = px.iter().max().unwrap() - px.iter().min().unwrap();
        assert!(spread <= 6, "pixel {px:?} keeps a color cast");
    }
}

#[test]
fn shared_enhancer_across_threads() {
    let enhancer = Enhancer::new(&gaussian_model(2.0));
    let scenes: Vec<Image<f32>> = [(0.2, 0.1), (-0.4, 0.3), (0.0, -0.5), (0.6, 0.6)]
        .into_iter()
        .map(|(u, v)| lit_scene(24, 24, Chromaticity::new(u, v)))
        .collect();

    let serial: Vec<Image<u8>> = scenes.iter().map(|s| enhancer.enhance(s).unwrap()).collect();
    let shared = &enhancer;
    let threaded: Vec<Image<u8>> = std::thread::scope(|scope| {
        let handles: Vec<_> = scenes
            .iter()
            .map(|s| scope.spawn(move || shared.enhance(s).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(serial, threaded);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn malformed_model_json_rejected() {
    let json = serde_json_like(255);
    let err = Model::from_json_str(&json).unwrap_err();
    assert!(matches!(err, Error::InvalidModel { .. }));
}

#[test]
fn well_formed_model_json_drives_pipeline() {
    let model = Model::from_json_str(&serde_json_like(256)).unwrap();
    let out = enhance(&Image::filled(3, 3, [10u8, 20, 30]), &model).unwrap();
    assert_eq!(out.width(), 3);
}

#[test]
fn wrong_channel_count_rejected() {
    let rgba = Image::<u8>::from_data(2, 2, 4, vec![100; 16]).unwrap();
    assert!(matches!(enhance(&rgba, &Model::identity()), Err(Error::InvalidImage { .. })));
}

/// Builds a `{"f": ..., "b": ...}` document with `n` x 256 matrices.
fn serde_json_like(n: usize) -> String {
    let row = format!("[{}]", vec!["0.0"; 256].join(","));
    let matrix = format!("[{}]", vec![row.as_str(); n].join(","));
    format!(r#"{{"f": {matrix}, "b": {matrix}}}"#)
}
