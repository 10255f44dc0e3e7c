//! White balance correction.
//!
//! Given an illuminant chromaticity `(u, v)`, the image is divided
//! channel-wise by the unit-norm illuminant [`CorrectionGains`], then the
//! whole image is min-max stretched to `[0, 1]` and quantized to 8 bits.
//!
//! The final stretch is global across all three channels, so it can change
//! overall brightness and contrast in addition to color. Results are
//! expected to match that behavior.
//!
//! # Example
//!
//! ```rust
//! use ffcc_core::{Chromaticity, Image};
//! use ffcc_ops::balance::apply_white_balance;
//!
//! let img = Image::from_pixels(2, 1, vec![[10u8, 20, 30], [40, 50, 60]]).unwrap();
//! let out = apply_white_balance(&img, Chromaticity::NEUTRAL).unwrap();
//! assert_eq!(out.pixel(0, 0), &[0, 51, 102]);
//! assert_eq!(out.pixel(1, 0), &[153, 204, 255]);
//! ```

use ffcc_core::{Chromaticity, CorrectionGains, Image, Result, Sample};
use tracing::debug;

/// Divides each channel by its gain, without renormalizing.
///
/// # Errors
///
/// Returns [`ffcc_core::Error::InvalidImage`] if the image is empty or not
/// 3-channel.
pub fn apply_gains<T: Sample>(image: &Image<T>, gains: CorrectionGains) -> Result<Image<f32>> {
    image.ensure_bgr()?;
    let bgr = gains.bgr().map(|g| g as f32);
    Ok(image.map_channels(|c, s| s.to_f32() / bgr[c]))
}

/// Min-max stretches the whole image to `[0, 255]` and rounds to `u8`.
///
/// Minimum and maximum are taken over finite samples of all channels
/// together. A flat image (range not above `f64::EPSILON`) maps to 0, NaN
/// maps to 0 and infinities saturate.
pub fn normalize_to_u8(image: &Image<f32>) -> Image<u8> {
    let range = image
        .data()
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f32, f32)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        });
    let (lo, hi) = range.map_or((0.0, 0.0), |(lo, hi)| (lo as f64, hi as f64));
    let scale = if hi - lo > f64::EPSILON { 1.0 / (hi - lo) } else { 0.0 };

    image.map_channels(|_, v| {
        let unit = (v as f64 - lo) * scale;
        let out = (unit * 255.0).round_ties_even();
        if out.is_nan() { 0 } else { out.clamp(0.0, 255.0) as u8 }
    })
}

/// Corrects the white balance of `image` for the given illuminant.
///
/// Returns an 8-bit BGR image of the same size.
///
/// # Errors
///
/// Returns [`ffcc_core::Error::InvalidImage`] if the image is empty or not
/// 3-channel.
pub fn apply_white_balance<T: Sample>(image: &Image<T>, illuminant: Chromaticity) -> Result<Image<u8>> {
    let gains = CorrectionGains::from_chromaticity(illuminant);
    debug!(r = gains.r, g = gains.g, b = gains.b, "Applying white balance gains");
    let balanced = apply_gains(image, gains)?;
    Ok(normalize_to_u8(&balanced))
}
