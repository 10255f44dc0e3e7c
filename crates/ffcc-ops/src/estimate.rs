//! Illuminant estimation from a response surface.
//!
//! The illuminant is the bin with the highest response, mapped back to
//! continuous log-chrominance with the inverse of the histogram binning:
//!
//! ```text
//! u = (row + 1) * BIN_SIZE + UV0
//! v = (col + 1) * BIN_SIZE + UV0
//! ```
//!
//! Rows recover `u` (green/red) and columns recover `v` (green/blue), the
//! same axes the histogram was built on.

use crate::matcher::ResponseMap;
use ffcc_core::{Chromaticity, Peak};
use tracing::debug;

/// Estimated illuminant and where it was found on the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IlluminantEstimate {
    /// Illuminant chromaticity
    pub chromaticity: Chromaticity,
    /// Winning grid cell and its response
    pub peak: Peak,
}

/// Locates the response peak and converts it to a chromaticity.
///
/// Ties resolve to the first cell in row-major order.
pub fn estimate_illuminant(response: &ResponseMap) -> IlluminantEstimate {
    let peak = response.peak();
    let chromaticity = Chromaticity::from_bin(peak.row, peak.col);
    debug!(
        row = peak.row,
        col = peak.col,
        u = chromaticity.u,
        v = chromaticity.v,
        "Estimated illuminant"
    );
    IlluminantEstimate { chromaticity, peak }
}
