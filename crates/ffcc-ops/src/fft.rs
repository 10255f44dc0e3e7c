//! 2D discrete Fourier transform on log-chrominance grids.
//!
//! [`Fft2d`] runs a separable 2D DFT over a [`Grid`]: a 1D FFT over every
//! row, then over every column. Plans are built once and reused, so one
//! `Fft2d` can transform any number of grids.
//!
//! # Conventions
//!
//! - Forward: unnormalized, `X[k] = Σ x[n] e^{-2πi kn/N}` per axis.
//! - Inverse: scaled by `1 / N²`, so `inverse(forward(g)) == g` up to
//!   rounding.
//! - Products of spectra are circular convolutions on the 256x256 torus.
//!
//! # Example
//!
//! ```rust
//! use ffcc_core::Grid;
//! use ffcc_ops::fft::Fft2d;
//!
//! let fft = Fft2d::new();
//! let g = Grid::from_fn(|r, c| (r * 3 + c) as f32 % 7.0);
//! let back = fft.inverse(fft.forward(&g));
//! assert!((back.get(5, 9) - g.get(5, 9)).abs() < 1e-2);
//! ```

use ffcc_core::{GRID_CELLS, GRID_SIZE, Grid};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Complex 256x256 spectrum, row-major.
#[derive(Clone, PartialEq)]
pub struct Spectrum {
    data: Vec<Complex<f32>>,
}

impl Spectrum {
    /// Spectrum of all zeros.
    pub fn zeros() -> Self {
        Self {
            data: vec![Complex::new(0.0, 0.0); GRID_CELLS],
        }
    }

    /// Row-major coefficients.
    #[inline]
    pub fn as_slice(&self) -> &[Complex<f32>] {
        &self.data
    }

    /// Coefficient at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex<f32> {
        self.data[row * GRID_SIZE + col]
    }

    /// Multiplies every coefficient by a real factor.
    pub fn scale(mut self, factor: f32) -> Self {
        for c in &mut self.data {
            *c *= factor;
        }
        self
    }

    /// Computes `self * rhs + addend` element-wise (complex multiply, no
    /// conjugation).
    pub fn mul_add(&self, rhs: &Spectrum, addend: &Spectrum) -> Spectrum {
        let data = self
            .data
            .iter()
            .zip(&rhs.data)
            .zip(&addend.data)
            .map(|((a, b), c)| a * b + c)
            .collect();
        Spectrum { data }
    }
}

impl std::fmt::Debug for Spectrum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spectrum")
            .field("size", &GRID_SIZE)
            .field("dc", &self.data[0])
            .finish()
    }
}

/// Planned forward/inverse 2D FFT for [`GRID_SIZE`] x [`GRID_SIZE`] grids.
#[derive(Clone)]
pub struct Fft2d {
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
}

impl Fft2d {
    /// Plans the row and column transforms.
    pub fn new() -> Self {
        let mut planner = FftPlanner::new();
        Self {
            forward: planner.plan_fft_forward(GRID_SIZE),
            inverse: planner.plan_fft_inverse(GRID_SIZE),
        }
    }

    /// Forward 2D DFT of a real grid.
    pub fn forward(&self, grid: &Grid) -> Spectrum {
        let mut data: Vec<Complex<f32>> = grid
            .as_slice()
            .iter()
            .map(|&v| Complex::new(v, 0.0))
            .collect();
        transform_2d(&mut data, self.forward.as_ref());
        Spectrum { data }
    }

    /// Inverse 2D DFT, keeping only the real part.
    pub fn inverse(&self, spectrum: Spectrum) -> Grid {
        let mut data = spectrum.data;
        transform_2d(&mut data, self.inverse.as_ref());

        let scale = 1.0 / GRID_CELLS as f32;
        let mut out = Grid::zeros();
        for (dst, c) in out.as_mut_slice().iter_mut().zip(&data) {
            *dst = c.re * scale;
        }
        out
    }
}

impl std::fmt::Debug for Fft2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fft2d").field("size", &GRID_SIZE).finish()
    }
}

impl Default for Fft2d {
    fn default() -> Self {
        Self::new()
    }
}

/// Row pass then column pass, in place.
fn transform_2d(data: &mut [Complex<f32>], fft: &dyn Fft<f32>) {
    // Row-wise FFT
    fft.process(data);

    // Column-wise FFT
    let mut col_buf = vec![Complex::new(0.0f32, 0.0); GRID_SIZE];
    for x in 0..GRID_SIZE {
        for y in 0..GRID_SIZE {
            col_buf[y] = data[y * GRID_SIZE + x];
        }
        fft.process(&mut col_buf);
        for y in 0..GRID_SIZE {
            data[y * GRID_SIZE + x] = col_buf[y];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_round_trip() {
        let fft = Fft2d::new();
        let g = Grid::from_fn(|r, c| ((r * 31 + c * 17) % 23) as f32 / 23.0);
        let back = fft.inverse(fft.forward(&g));
        for (a, b) in g.as_slice().iter().zip(back.as_slice()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_dc_is_sum() {
        let fft = Fft2d::new();
        let g = Grid::from_fn(|r, _| if r < 2 { 1.0 } else { 0.0 });
        let s = fft.forward(&g);
        assert_abs_diff_eq!(s.get(0, 0).re, 512.0, epsilon = 1e-2);
        assert_abs_diff_eq!(s.get(0, 0).im, 0.0, epsilon = 1e-2);
    }

    #[test]
    fn test_delta_is_flat_spectrum() {
        let fft = Fft2d::new();
        let mut g = Grid::zeros();
        g.set(0, 0, 1.0);
        let s = fft.forward(&g);
        for c in s.as_slice() {
            assert_abs_diff_eq!(c.re, 1.0, epsilon = 1e-6);
            assert_abs_diff_eq!(c.im, 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_product_is_circular_convolution() {
        let fft = Fft2d::new();
        let mut a = Grid::zeros();
        a.set(10, 20, 2.0);
        let mut k = Grid::zeros();
        // shift by (-1, +3) with wrap-around
        k.set(GRID_SIZE - 1, 3, 1.0);
        let out = fft.inverse(fft.forward(&a).mul_add(&fft.forward(&k), &Spectrum::zeros()));
        assert_abs_diff_eq!(out.get(9, 23), 2.0, epsilon = 1e-3);
        assert_abs_diff_eq!(out.get(10, 20), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_scale() {
        let fft = Fft2d::new();
        let g = Grid::from_fn(|_, _| 1.0);
        let s = fft.forward(&g).scale(0.5);
        assert_abs_diff_eq!(s.get(0, 0).re, GRID_CELLS as f32 / 2.0, epsilon = 1.0);
    }
}
