//! Log-chrominance histogram.
//!
//! Every pixel with a finite log-chrominance `(u, v)` adds one count to the
//! grid cell `(bin_index(u), bin_index(v))`. The counts are then divided by
//! `max(EPSILON, total)` so that the histogram is a probability mass.
//!
//! Pixels with a zero or negative channel produce a non-finite log and are
//! skipped. An image where *no* pixel survives is degenerate: the result is
//! an all-zero grid and a warning is logged, but it is not an error.
//!
//! Counts are accumulated as integers, which makes the result independent
//! of pixel order and lets [`crate::parallel`] split the work freely.
//!
//! # Example
//!
//! ```rust
//! use ffcc_core::Image;
//! use ffcc_ops::histogram::build_histogram;
//!
//! let gray = Image::filled(8, 8, [128u8, 128, 128]);
//! let hist = build_histogram(&gray).unwrap();
//! assert_eq!(hist.samples(), 64);
//! assert!((hist.grid().get(90, 90) - 1.0).abs() < 1e-6);
//! ```

use ffcc_core::chroma::{EPSILON, bin_index};
use ffcc_core::{BLUE, GREEN, GRID_CELLS, GRID_SIZE, Grid, Image, RED, Result, Sample};
use tracing::{debug, warn};

/// Normalized 2D log-chrominance histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    grid: Grid,
    samples: u64,
}

impl Histogram {
    /// Normalizes raw per-cell counts.
    ///
    /// # Panics
    ///
    /// Panics if `counts` is not [`GRID_CELLS`] long.
    pub fn from_counts(counts: &[u64]) -> Self {
        assert_eq!(counts.len(), GRID_CELLS, "histogram counts must cover the grid");
        let samples: u64 = counts.iter().sum();
        let denom = EPSILON.max(samples as f64);
        let mut grid = Grid::zeros();
        for (cell, &count) in grid.as_mut_slice().iter_mut().zip(counts) {
            *cell = (count as f64 / denom) as f32;
        }
        Self { grid, samples }
    }

    /// Normalized cell values.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of pixels that contributed a finite log-chrominance.
    #[inline]
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Returns `true` if no pixel contributed.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.samples == 0
    }

    /// Consumes the histogram and returns its grid.
    #[inline]
    pub fn into_grid(self) -> Grid {
        self.grid
    }
}

/// Grid cell of one BGR pixel, or `None` if its log-chrominance is not finite.
#[inline]
pub(crate) fn chroma_cell<T: Sample>(px: &[T]) -> Option<usize> {
    let log_b = px[BLUE].to_f32().ln();
    let log_g = px[GREEN].to_f32().ln();
    let log_r = px[RED].to_f32().ln();
    let u = log_g - log_r;
    let v = log_g - log_b;
    if !(u.is_finite() && v.is_finite()) {
        return None;
    }
    Some(bin_index(u) * GRID_SIZE + bin_index(v))
}

/// Adds the counts of a run of BGR samples to `counts`.
pub(crate) fn accumulate<T: Sample>(samples: &[T], counts: &mut [u64]) {
    for px in samples.chunks_exact(3) {
        if let Some(cell) = chroma_cell(px) {
            counts[cell] += 1;
        }
    }
}

/// Logs the outcome of a histogram build.
pub(crate) fn report(hist: &Histogram, width: u32, height: u32) {
    if hist.is_degenerate() {
        warn!(width, height, "No pixel has a finite log-chrominance; histogram is empty");
    } else {
        debug!(width, height, samples = hist.samples, "Built log-chrominance histogram");
    }
}

/// Builds the normalized log-chrominance histogram of a BGR image.
///
/// # Errors
///
/// Returns [`ffcc_core::Error::InvalidImage`] if the image is empty or not
/// 3-channel.
pub fn build_histogram<T: Sample>(image: &Image<T>) -> Result<Histogram> {
    image.ensure_bgr()?;
    let mut counts = vec![0u64; GRID_CELLS];
    accumulate(image.data(), &mut counts);
    let hist = Histogram::from_counts(&counts);
    report(&hist, image.width(), image.height());
    Ok(hist)
}
