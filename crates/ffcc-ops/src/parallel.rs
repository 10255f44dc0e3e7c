//! Parallel histogram accumulation using Rayon.
//!
//! Rows are distributed across the Rayon pool, each worker fills its own
//! count grid and the grids are merged by integer addition. Integer sums
//! are associative and commutative, so the result is bit-identical to
//! [`crate::histogram::build_histogram`] regardless of how rows are split.
//!
//! # Example
//!
//! ```rust
//! use ffcc_core::Image;
//! use ffcc_ops::{histogram, parallel};
//!
//! let img = Image::filled(64, 64, [40u8, 80, 120]);
//! assert_eq!(
//!     parallel::build_histogram(&img).unwrap(),
//!     histogram::build_histogram(&img).unwrap(),
//! );
//! ```

use crate::histogram::{Histogram, accumulate, report};
use ffcc_core::{GRID_CELLS, Image, Result, Sample};
use rayon::prelude::*;

/// Parallel version of [`crate::histogram::build_histogram`].
///
/// # Errors
///
/// Returns [`ffcc_core::Error::InvalidImage`] if the image is empty or not
/// 3-channel.
pub fn build_histogram<T: Sample>(image: &Image<T>) -> Result<Histogram> {
    image.ensure_bgr()?;
    let stride = image.width() as usize * image.channels();

    let counts = image
        .data()
        .par_chunks(stride)
        .fold(
            || vec![0u64; GRID_CELLS],
            |mut counts, row| {
                accumulate(row, &mut counts);
                counts
            },
        )
        .reduce(
            || vec![0u64; GRID_CELLS],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(&b) {
                    *x += y;
                }
                a
            },
        );

    let hist = Histogram::from_counts(&counts);
    report(&hist, image.width(), image.height());
    Ok(hist)
}
