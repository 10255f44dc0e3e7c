//! Error types for ffcc-core operations.
//!
//! The [`Error`] enum covers the structural failures the pipeline detects
//! at its boundary:
//! - Malformed images (zero size, wrong channel count, short buffers)
//! - Malformed models (wrong matrix dimensions, non-finite entries)
//! - Model file I/O and parsing
//!
//! Degenerate images (no pixel with a finite log-chrominance) are not an
//! error. The histogram stage logs a warning and continues.
//!
//! # Usage
//!
//! ```rust
//! use ffcc_core::{Error, Result};
//!
//! fn check_channels(channels: usize) -> Result<()> {
//!     if channels != 3 {
//!         return Err(Error::invalid_image(format!("expected 3 channels, got {channels}")));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_channels(4).is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating inputs or loading a model.
#[derive(Debug, Error)]
pub enum Error {
    /// Image is not a non-empty 3-channel buffer.
    ///
    /// Returned before histogram accumulation begins.
    #[error("invalid image: {reason}")]
    InvalidImage {
        /// Why the image was rejected
        reason: String,
    },

    /// Filter or bias matrix is not a finite 256x256 matrix.
    ///
    /// Returned when the [`Model`](crate::Model) is constructed, so a
    /// malformed model never reaches a transform.
    #[error("invalid model: {reason}")]
    InvalidModel {
        /// Why the model was rejected
        reason: String,
    },

    /// Model file is not syntactically valid JSON.
    ///
    /// Well-formed JSON with a missing or mistyped `f`/`b` is
    /// [`Error::InvalidModel`].
    #[error("model format error: {0}")]
    ModelFormat(#[from] serde_json::Error),

    /// I/O error while reading a model file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates an [`Error::InvalidImage`] error.
    #[inline]
    pub fn invalid_image(reason: impl Into<String>) -> Self {
        Self::InvalidImage {
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::InvalidModel`] error.
    #[inline]
    pub fn invalid_model(reason: impl Into<String>) -> Self {
        Self::InvalidModel {
            reason: reason.into(),
        }
    }

    /// Returns `true` if the error came from input validation rather than I/O.
    #[inline]
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::InvalidImage { .. } | Self::InvalidModel { .. })
    }
}
