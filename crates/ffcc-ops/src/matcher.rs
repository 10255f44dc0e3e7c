//! Frequency-domain matching of a histogram against the model.
//!
//! The response surface is the histogram convolved with the learned filter
//! plus the bias term, evaluated in the frequency domain:
//!
//! ```text
//! response = Re( IDFT( DFT(H) * DFT(F) + DFT(B) / 2 ) )
//! ```
//!
//! The halving of the bias spectrum is part of how the model was trained
//! and must stay exactly as is.
//!
//! The two model spectra do not depend on the image, so [`SpectralModel`]
//! computes them once and can then score any number of histograms. It holds
//! no mutable state and can be shared between threads.
//!
//! # Example
//!
//! ```rust
//! use ffcc_core::{Image, Model};
//! use ffcc_ops::histogram::build_histogram;
//! use ffcc_ops::matcher::SpectralModel;
//!
//! let spectral = SpectralModel::new(&Model::identity());
//! let hist = build_histogram(&Image::filled(4, 4, [9u8, 9, 9])).unwrap();
//! let response = spectral.apply(&hist);
//! let peak = response.peak();
//! assert_eq!((peak.row, peak.col), (90, 90));
//! ```

use crate::fft::{Fft2d, Spectrum};
use crate::histogram::Histogram;
use ffcc_core::{Grid, Model, Peak};
use tracing::trace;

/// Spatial response of the matched filter. Higher is more likely.
///
/// # Scale
///
/// Values are on the circular-convolution scale: the inverse transform
/// divides by [`GRID_CELLS`](ffcc_core::GRID_CELLS), so an identity filter
/// reproduces the histogram (peak at most 1 plus half the bias). An
/// implementation with an unscaled inverse DFT reports every value
/// `GRID_CELLS` (65536) times larger. The peak location, and so the
/// estimate and the corrected image, are the same under either scale.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMap {
    grid: Grid,
}

impl ResponseMap {
    /// Response values, rows indexing `u` and columns indexing `v`.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Global maximum, first occurrence in row-major order on ties.
    #[inline]
    pub fn peak(&self) -> Peak {
        self.grid.argmax()
    }

    /// Consumes the map and returns its grid.
    #[inline]
    pub fn into_grid(self) -> Grid {
        self.grid
    }
}

impl From<Grid> for ResponseMap {
    fn from(grid: Grid) -> Self {
        Self { grid }
    }
}

/// Model transformed into the frequency domain.
#[derive(Debug, Clone)]
pub struct SpectralModel {
    fft: Fft2d,
    filter: Spectrum,
    half_bias: Spectrum,
}

impl SpectralModel {
    /// Transforms the filter and bias of `model`.
    pub fn new(model: &Model) -> Self {
        let fft = Fft2d::new();
        let filter = fft.forward(model.filter());
        let half_bias = fft.forward(model.bias()).scale(0.5);
        Self {
            fft,
            filter,
            half_bias,
        }
    }

    /// Filter spectrum `DFT(F)`.
    #[inline]
    pub fn filter(&self) -> &Spectrum {
        &self.filter
    }

    /// Halved bias spectrum `DFT(B) / 2`.
    #[inline]
    pub fn half_bias(&self) -> &Spectrum {
        &self.half_bias
    }

    /// Scores a histogram against the model.
    pub fn apply(&self, hist: &Histogram) -> ResponseMap {
        let hist_spectrum = self.fft.forward(hist.grid());
        let combined = hist_spectrum.mul_add(&self.filter, &self.half_bias);
        let response = ResponseMap {
            grid: self.fft.inverse(combined),
        };
        trace!(peak = ?response.peak(), "Computed response map");
        response
    }
}

/// One-shot matching: transforms the model and scores `hist`.
///
/// Prefer [`SpectralModel`] when scoring more than one histogram.
pub fn apply_model(hist: &Histogram, model: &Model) -> ResponseMap {
    SpectralModel::new(model).apply(hist)
}
