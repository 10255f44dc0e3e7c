//! # ffcc-core
//!
//! Core types for Fast Fourier Color Constancy.
//!
//! This crate provides the data shared by every stage of the white-balance
//! pipeline:
//!
//! - [`Image`] - Interleaved BGR buffer in any [`Sample`] depth
//! - [`Grid`] - 256x256 real grid in log-chrominance space
//! - [`Model`] - Pretrained filter/bias pair, validated on construction
//! - [`Chromaticity`], [`CorrectionGains`] - Illuminant estimate and the
//!   per-channel gains derived from it
//! - [`chroma`] - Binning constants and the forward/inverse bin mapping
//!
//! The algorithms live in `ffcc-ops`; this crate has no numeric
//! dependencies of its own.
//!
//! ## Crate Structure
//!
//! ```text
//! ffcc-core (this crate)
//!    ^
//!    |
//!    +-- ffcc-ops (histogram, FFT matching, estimation, correction)
//!           ^
//!           +-- ffcc-cli
//!           +-- ffcc-bench
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod chroma;
pub mod error;
pub mod grid;
pub mod image;
pub mod model;
pub mod sample;

pub use chroma::{BIN_COUNT, BIN_SIZE, Chromaticity, CorrectionGains, EPSILON, UV0};
pub use error::{Error, Result};
pub use grid::{GRID_CELLS, GRID_SIZE, Grid, Peak};
pub use image::{BGR_CHANNELS, BLUE, GREEN, Image, RED};
pub use model::{Model, ModelFile};
pub use sample::Sample;

/// Prelude module for convenient imports.
///
/// ```
/// use ffcc_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::chroma::{Chromaticity, CorrectionGains};
    pub use crate::error::{Error, Result};
    pub use crate::grid::Grid;
    pub use crate::image::Image;
    pub use crate::model::Model;
    pub use crate::sample::Sample;
}
