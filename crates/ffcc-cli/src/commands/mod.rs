//! CLI command implementations

pub mod batch;
pub mod enhance;
pub mod estimate;

use anyhow::{Context, Result};
use ffcc_core::{Grid, Image, Model};
use ffcc_ops::{Enhancer, Estimate};
use image::{ColorType, DynamicImage, GrayImage, RgbImage};
use std::path::Path;
use tracing::debug;

/// Decoded input in the depth the pipeline should see.
///
/// 8-bit files stay 8-bit; anything deeper is widened to `f32`.
#[derive(Debug)]
pub enum LoadedImage {
    /// 8 bits per channel
    U8(Image<u8>),
    /// 16-bit or floating-point source
    F32(Image<f32>),
}

impl LoadedImage {
    pub fn width(&self) -> u32 {
        match self {
            Self::U8(img) => img.width(),
            Self::F32(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::U8(img) => img.height(),
            Self::F32(img) => img.height(),
        }
    }

    pub fn estimate(&self, enhancer: &Enhancer) -> ffcc_core::Result<Estimate> {
        match self {
            Self::U8(img) => enhancer.estimate(img),
            Self::F32(img) => enhancer.estimate(img),
        }
    }

    pub fn enhance(&self, enhancer: &Enhancer) -> ffcc_core::Result<Image<u8>> {
        match self {
            Self::U8(img) => enhancer.enhance(img),
            Self::F32(img) => enhancer.enhance(img),
        }
    }

    pub fn correct(&self, enhancer: &Enhancer, estimate: &Estimate) -> ffcc_core::Result<Image<u8>> {
        match self {
            Self::U8(img) => enhancer.correct(img, estimate),
            Self::F32(img) => enhancer.correct(img, estimate),
        }
    }
}

/// Swaps the first and third channel of every pixel in place.
fn swap_rb<T>(data: &mut [T]) {
    for px in data.chunks_exact_mut(3) {
        px.swap(0, 2);
    }
}

fn to_bgr(decoded: DynamicImage) -> Result<LoadedImage> {
    let eight_bit = matches!(
        decoded.color(),
        ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8
    );
    let loaded = if eight_bit {
        let rgb = decoded.to_rgb8();
        let (w, h) = rgb.dimensions();
        let mut data = rgb.into_raw();
        swap_rb(&mut data);
        LoadedImage::U8(Image::from_data(w, h, 3, data)?)
    } else {
        let rgb = decoded.to_rgb32f();
        let (w, h) = rgb.dimensions();
        let mut data = rgb.into_raw();
        swap_rb(&mut data);
        LoadedImage::F32(Image::from_data(w, h, 3, data)?)
    };
    Ok(loaded)
}

/// Load image from path as BGR
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let decoded = image::open(path).with_context(|| format!("Failed to load: {}", path.display()))?;
    debug!(path = %path.display(), color = ?decoded.color(), "Decoded image");
    to_bgr(decoded).with_context(|| format!("Unsupported image: {}", path.display()))
}

/// Save 8-bit BGR image to path
pub fn save_image(path: &Path, image: &Image<u8>) -> Result<()> {
    let mut data = image.data().to_vec();
    swap_rb(&mut data);
    let rgb = RgbImage::from_raw(image.width(), image.height(), data)
        .context("Image buffer does not match its dimensions")?;
    rgb.save(path).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Load model from a JSON file
pub fn load_model(path: &Path) -> Result<Model> {
    Model::from_json_file(path).with_context(|| format!("Failed to load model: {}", path.display()))
}

/// Min-max stretch of a response grid to 8-bit gray, row `u`, column `v`.
pub fn response_image(grid: &Grid) -> GrayImage {
    let (lo, hi) = grid.min_max().unwrap_or((0.0, 0.0));
    let range = hi - lo;
    GrayImage::from_fn(ffcc_core::GRID_SIZE as u32, ffcc_core::GRID_SIZE as u32, |x, y| {
        let v = grid.get(y as usize, x as usize);
        let unit = if range > 0.0 && v.is_finite() { (v - lo) / range } else { 0.0 };
        image::Luma([(unit * 255.0).round().clamp(0.0, 255.0) as u8])
    })
}

/// Save the filter response as a grayscale image
pub fn save_response(path: &Path, grid: &Grid) -> Result<()> {
    response_image(grid)
        .save(path)
        .with_context(|| format!("Failed to save response: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_keeps_bgr_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("px.png");
        let img = Image::from_pixels(2, 1, vec![[10u8, 20, 30], [200, 100, 0]]).unwrap();
        save_image(&path, &img).unwrap();

        let reread = image::open(&path).unwrap().to_rgb8();
        assert_eq!(reread.get_pixel(0, 0).0, [30, 20, 10]);

        match load_image(&path).unwrap() {
            LoadedImage::U8(back) => assert_eq!(back, img),
            LoadedImage::F32(_) => panic!("8-bit png decoded as float"),
        }
    }

    #[test]
    fn test_sixteen_bit_loads_as_float() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep.png");
        let deep = image::ImageBuffer::<image::Rgb<u16>, _>::from_pixel(3, 2, image::Rgb([0, 32768, 65535]));
        deep.save(&path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (3, 2));
        match loaded {
            LoadedImage::F32(img) => {
                let px = img.pixel(0, 0);
                // blue first
                assert!((px[0] - 1.0).abs() < 1e-4);
                assert!(px[2].abs() < 1e-6);
            }
            LoadedImage::U8(_) => panic!("16-bit png decoded as u8"),
        }
    }

    #[test]
    fn test_correct_matches_enhance() {
        let pixels = (0..12u8).map(|i| [10 + i, 30 + 2 * i, 60 + 3 * i]).collect();
        let loaded = LoadedImage::U8(Image::from_pixels(4, 3, pixels).unwrap());
        let enhancer = Enhancer::new(&Model::identity());
        let est = loaded.estimate(&enhancer).unwrap();
        assert_eq!(loaded.correct(&enhancer, &est).unwrap(), loaded.enhance(&enhancer).unwrap());
    }

    #[test]
    fn test_response_image_stretches() {
        let mut grid = Grid::zeros();
        grid.set(3, 7, 2.0);
        grid.set(0, 0, -2.0);
        let img = response_image(&grid);
        assert_eq!(img.get_pixel(7, 3).0, [255]);
        assert_eq!(img.get_pixel(0, 0).0, [0]);
        assert_eq!(img.get_pixel(1, 1).0, [128]);
    }

    #[test]
    fn test_missing_model_has_context() {
        let err = load_model(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to load model"));
    }
}
