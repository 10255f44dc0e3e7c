//! Log-chrominance coordinates, binning and correction gains.
//!
//! A pixel's log-chrominance is the pair
//!
//! ```text
//! u = log(G) - log(R)      (rows of the grid)
//! v = log(G) - log(B)      (columns of the grid)
//! ```
//!
//! Both axes are discretized into [`BIN_COUNT`] bins of width [`BIN_SIZE`]
//! starting at [`UV0`]. These constants are baked into the trained model and
//! must not change: [`bin_index`] and [`bin_value`] are exact inverses of
//! the conventions the filter was fitted with.
//!
//! # Example
//!
//! ```rust
//! use ffcc_core::chroma::{bin_index, Chromaticity};
//!
//! // Neutral gray has u = v = 0, which lands in bin 90.
//! assert_eq!(bin_index(0.0), 90);
//! let c = Chromaticity::from_bin(90, 90);
//! assert!((c.u - 0.0).abs() < 1e-12);
//! ```

use crate::grid::GRID_SIZE;

/// Log-chrominance value at the lower edge of the grid.
pub const UV0: f64 = -1.421875;

/// Width of one histogram bin in log-chrominance units.
pub const BIN_SIZE: f64 = 1.0 / 64.0;

/// Number of bins per axis.
pub const BIN_COUNT: usize = GRID_SIZE;

/// Floor for the histogram normalization denominator.
pub const EPSILON: f64 = 1e-7;

/// Maps a finite log-chrominance value to a 0-based bin index.
///
/// `clamp(round((value - UV0) / BIN_SIZE), 1, BIN_COUNT) - 1`, so values
/// outside the grid pile up in the first or last bin.
#[inline]
pub fn bin_index(value: f32) -> usize {
    let pos = ((value as f64 - UV0) / BIN_SIZE).round();
    pos.clamp(1.0, BIN_COUNT as f64) as usize - 1
}

/// Maps a 0-based bin index back to a log-chrominance value.
#[inline]
pub fn bin_value(index: usize) -> f64 {
    (index + 1) as f64 * BIN_SIZE + UV0
}

/// Illuminant chromaticity in log-chrominance space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chromaticity {
    /// log(G / R)
    pub u: f64,
    /// log(G / B)
    pub v: f64,
}

impl Chromaticity {
    /// Neutral illuminant (R = G = B).
    pub const NEUTRAL: Self = Self { u: 0.0, v: 0.0 };

    /// Creates a chromaticity from its two log-ratios.
    #[inline]
    pub fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }

    /// Chromaticity at the center of grid cell `(row, col)`.
    ///
    /// The row recovers `u`, the column recovers `v`.
    #[inline]
    pub fn from_bin(row: usize, col: usize) -> Self {
        Self {
            u: bin_value(row),
            v: bin_value(col),
        }
    }

    /// Grid cell `(row, col)` this chromaticity falls into.
    #[inline]
    pub fn to_bin(self) -> (usize, usize) {
        (bin_index(self.u as f32), bin_index(self.v as f32))
    }
}

/// Unit-norm RGB illuminant used to rebalance an image.
///
/// Green is the implicit reference channel: `r = e^-u / z`, `g = 1 / z`,
/// `b = e^-v / z` with `z` chosen so that `r² + g² + b² = 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionGains {
    /// Red gain
    pub r: f64,
    /// Green gain
    pub g: f64,
    /// Blue gain
    pub b: f64,
}

impl CorrectionGains {
    /// Derives the gains for an illuminant chromaticity.
    pub fn from_chromaticity(c: Chromaticity) -> Self {
        let exp_neg_u = (-c.u).exp();
        let exp_neg_v = (-c.v).exp();
        let z = (exp_neg_u * exp_neg_u + exp_neg_v * exp_neg_v + 1.0).sqrt();
        Self {
            r: exp_neg_u / z,
            g: 1.0 / z,
            b: exp_neg_v / z,
        }
    }

    /// Gains in BGR channel order.
    #[inline]
    pub fn bgr(&self) -> [f64; 3] {
        [self.b, self.g, self.r]
    }

    /// Euclidean norm of `(r, g, b)`.
    #[inline]
    pub fn norm(&self) -> f64 {
        (self.r * self.r + self.g * self.g + self.b * self.b).sqrt()
    }
}

impl From<Chromaticity> for CorrectionGains {
    fn from(c: Chromaticity) -> Self {
        Self::from_chromaticity(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gray_bin_is_90() {
        // round((0 + 1.421875) * 64) = 91, minus one
        assert_eq!(bin_index(0.0), 90);
    }

    #[test]
    fn test_bin_clamping() {
        assert_eq!(bin_index(-100.0), 0);
        assert_eq!(bin_index(100.0), BIN_COUNT - 1);
        assert_eq!(bin_index(UV0 as f32), 0);
    }

    #[test]
    fn test_bin_round_trip() {
        for idx in [0usize, 1, 90, 128, 254, 255] {
            assert_eq!(bin_index(bin_value(idx) as f32), idx);
        }
    }

    #[test]
    fn test_from_bin_axes() {
        let c = Chromaticity::from_bin(90, 154);
        assert_relative_eq!(c.u, 0.0, epsilon = 1e-12);
        assert_relative_eq!(c.v, 1.0, epsilon = 1e-12);
        assert_eq!(c.to_bin(), (90, 154));
    }

    #[test]
    fn test_neutral_gains() {
        let g = CorrectionGains::from(Chromaticity::NEUTRAL);
        let expected = 1.0 / 3f64.sqrt();
        assert_relative_eq!(g.r, expected, epsilon = 1e-12);
        assert_relative_eq!(g.g, expected, epsilon = 1e-12);
        assert_relative_eq!(g.b, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_gains_unit_norm() {
        for (u, v) in [(0.5, -0.3), (-1.2, 0.9), (2.0, 2.0)] {
            let g = CorrectionGains::from_chromaticity(Chromaticity::new(u, v));
            assert_relative_eq!(g.norm(), 1.0, epsilon = 1e-12);
            assert!(g.r > 0.0 && g.g > 0.0 && g.b > 0.0);
            assert_relative_eq!(g.g / g.r, u.exp(), epsilon = 1e-9);
            assert_relative_eq!(g.g / g.b, v.exp(), epsilon = 1e-9);
        }
    }
}
