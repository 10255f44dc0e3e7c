//! # ffcc-ops
//!
//! Fast Fourier Color Constancy: illuminant estimation and white balance.
//!
//! The pipeline is a straight composition of pure stages, one module each:
//!
//! - [`histogram`] - Log-chrominance histogram of an image
//! - [`matcher`] - Histogram x filter + bias, evaluated via [`fft`]
//! - [`estimate`] - Response peak to illuminant chromaticity
//! - [`balance`] - Chromaticity to gains, gains to corrected 8-bit image
//! - [`pipeline`] - [`Enhancer`] and the one-shot [`enhance`] entry point
//!
//! With the `parallel` feature (default), [`parallel`] provides a Rayon
//! histogram that is bit-identical to the serial one.
//!
//! # Example
//!
//! ```rust,no_run
//! use ffcc_core::{Image, Model};
//! use std::path::Path;
//!
//! let model = Model::from_json_file(Path::new("model.json"))?;
//! let image = Image::filled(640, 480, [90u8, 120, 160]);
//! let corrected = ffcc_ops::enhance(&image, &model)?;
//! assert_eq!(corrected.width(), 640);
//! # Ok::<(), ffcc_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod balance;
pub mod estimate;
pub mod fft;
pub mod histogram;
pub mod matcher;
pub mod pipeline;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use balance::apply_white_balance;
pub use estimate::{IlluminantEstimate, estimate_illuminant};
pub use histogram::{Histogram, build_histogram};
pub use matcher::{ResponseMap, SpectralModel, apply_model};
pub use pipeline::{Enhancer, Estimate, enhance, estimate};
