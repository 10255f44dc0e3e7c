//! End-to-end FFCC pipeline.
//!
//! ```text
//! Image -> Histogram -> ResponseMap (with Model) -> (u, v) -> Image<u8>
//! ```
//!
//! [`Enhancer`] keeps the model's spectra between calls and is `Send + Sync`,
//! so one instance can serve many images on many threads. The free
//! functions [`enhance`] and [`estimate`] are one-shot conveniences.
//!
//! # Example
//!
//! ```rust
//! use ffcc_core::{Image, Model};
//! use ffcc_ops::pipeline::Enhancer;
//!
//! let enhancer = Enhancer::new(&Model::identity());
//! let img = Image::from_pixels(2, 1, vec![[20u8, 40, 80], [20, 40, 80]]).unwrap();
//! let out = enhancer.enhance(&img).unwrap();
//! assert_eq!((out.width(), out.height(), out.channels()), (2, 1, 3));
//! ```

use crate::balance::apply_white_balance;
use crate::estimate::{IlluminantEstimate, estimate_illuminant};
use crate::histogram::{self, Histogram};
use crate::matcher::{ResponseMap, SpectralModel};
use ffcc_core::{Chromaticity, CorrectionGains, Image, Model, Result, Sample};
use tracing::{debug, trace};

/// Everything the estimation half of the pipeline produces for one image.
#[derive(Debug, Clone)]
pub struct Estimate {
    /// Pixels that contributed to the histogram
    pub samples: u64,
    /// Filter response over the log-chrominance grid, on the convolution
    /// scale described on [`ResponseMap`]
    pub response: ResponseMap,
    /// Peak location and illuminant chromaticity
    pub illuminant: IlluminantEstimate,
    /// Gains derived from the chromaticity
    pub gains: CorrectionGains,
}

impl Estimate {
    /// Illuminant chromaticity.
    #[inline]
    pub fn chromaticity(&self) -> Chromaticity {
        self.illuminant.chromaticity
    }

    /// Returns `true` if no pixel contributed, so the estimate comes from
    /// the bias alone.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.samples == 0
    }
}

/// Reusable pipeline bound to one model.
#[derive(Debug, Clone)]
pub struct Enhancer {
    spectral: SpectralModel,
    parallel: bool,
}

impl Enhancer {
    /// Prepares the model for repeated use.
    pub fn new(model: &Model) -> Self {
        Self {
            spectral: SpectralModel::new(model),
            parallel: false,
        }
    }

    /// Enables or disables parallel histogram accumulation.
    ///
    /// Has no effect unless the `parallel` feature is enabled. Results are
    /// identical either way.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builds the log-chrominance histogram of `image`.
    pub fn histogram<T: Sample>(&self, image: &Image<T>) -> Result<Histogram> {
        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                return crate::parallel::build_histogram(image);
            }
        }
        histogram::build_histogram(image)
    }

    /// Estimates the illuminant of `image`.
    ///
    /// # Errors
    ///
    /// Returns [`ffcc_core::Error::InvalidImage`] if the image is empty or
    /// not 3-channel.
    pub fn estimate<T: Sample>(&self, image: &Image<T>) -> Result<Estimate> {
        trace!(width = image.width(), height = image.height(), "Enhancer::estimate");
        let hist = self.histogram(image)?;
        let response = self.spectral.apply(&hist);
        let illuminant = estimate_illuminant(&response);
        Ok(Estimate {
            samples: hist.samples(),
            response,
            gains: CorrectionGains::from_chromaticity(illuminant.chromaticity),
            illuminant,
        })
    }

    /// Estimates the illuminant and returns the white-balanced 8-bit image.
    ///
    /// # Errors
    ///
    /// Returns [`ffcc_core::Error::InvalidImage`] if the image is empty or
    /// not 3-channel.
    pub fn enhance<T: Sample>(&self, image: &Image<T>) -> Result<Image<u8>> {
        let estimate = self.estimate(image)?;
        self.correct(image, &estimate)
    }

    /// Applies an estimate already computed for `image`.
    ///
    /// Lets a caller report the estimate and write the corrected image
    /// without running the histogram and transforms twice.
    ///
    /// # Errors
    ///
    /// Returns [`ffcc_core::Error::InvalidImage`] if the image is empty or
    /// not 3-channel.
    pub fn correct<T: Sample>(&self, image: &Image<T>, estimate: &Estimate) -> Result<Image<u8>> {
        let out = apply_white_balance(image, estimate.chromaticity())?;
        debug!(
            width = out.width(),
            height = out.height(),
            u = estimate.chromaticity().u,
            v = estimate.chromaticity().v,
            "Enhanced image"
        );
        Ok(out)
    }
}

/// One-shot illuminant estimation.
pub fn estimate<T: Sample>(image: &Image<T>, model: &Model) -> Result<Estimate> {
    image.ensure_bgr()?;
    Enhancer::new(model).estimate(image)
}

/// One-shot white balance: `enhance(image, model) -> image`.
///
/// The image is validated before the model is transformed.
pub fn enhance<T: Sample>(image: &Image<T>, model: &Model) -> Result<Image<u8>> {
    image.ensure_bgr()?;
    Enhancer::new(model).enhance(image)
}
