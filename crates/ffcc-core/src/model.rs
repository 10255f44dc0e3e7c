//! Pretrained FFCC model.
//!
//! A [`Model`] is the pair of matrices produced by offline training:
//!
//! - `F` - the filter convolved with the log-chrominance histogram
//! - `B` - an additive bias surface
//!
//! Both are exactly [`GRID_SIZE`] x [`GRID_SIZE`] and finite. The checks run
//! when the model is constructed, so any `Model` value that exists is valid
//! and no transform ever sees a malformed matrix.
//!
//! The model is immutable and `Send + Sync`; load it once and pass it by
//! reference to every pipeline call.
//!
//! # File Format
//!
//! Models are stored as JSON with two row-major matrices:
//!
//! ```json
//! { "f": [[...256 numbers...], ...256 rows...],
//!   "b": [[...256 numbers...], ...256 rows...] }
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use ffcc_core::Model;
//! use std::path::Path;
//!
//! let model = Model::from_json_file(Path::new("model.json"))?;
//! # Ok::<(), ffcc_core::Error>(())
//! ```

use crate::grid::{GRID_CELLS, GRID_SIZE, Grid};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use std::path::Path;
use tracing::debug;

/// Immutable filter/bias pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    filter: Grid,
    bias: Grid,
}

/// On-disk layout of a model file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    /// Filter matrix, row-major
    pub f: Vec<Vec<f64>>,
    /// Bias matrix, row-major
    pub b: Vec<Vec<f64>>,
}

impl Model {
    /// Creates a model from two grids.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidModel`] if either grid has a non-finite cell.
    pub fn new(filter: Grid, bias: Grid) -> Result<Self> {
        ensure_finite("filter", &filter)?;
        ensure_finite("bias", &bias)?;
        Ok(Self { filter, bias })
    }

    /// Creates a model from flat row-major buffers with explicit shapes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidModel`] if a shape is not
    /// [`GRID_SIZE`] x [`GRID_SIZE`], a buffer does not match its shape, or
    /// a value is not finite.
    pub fn from_flat(
        filter_shape: (usize, usize),
        filter: Vec<f32>,
        bias_shape: (usize, usize),
        bias: Vec<f32>,
    ) -> Result<Self> {
        let filter = flat_to_grid("filter", filter_shape, filter)?;
        let bias = flat_to_grid("bias", bias_shape, bias)?;
        Self::new(filter, bias)
    }

    /// Creates a model from nested rows, as stored in a model file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidModel`] on ragged or wrongly sized matrices
    /// and on non-finite values.
    pub fn from_rows<R: AsRef<[f64]>>(filter: &[R], bias: &[R]) -> Result<Self> {
        let filter = rows_to_grid("filter", filter)?;
        let bias = rows_to_grid("bias", bias)?;
        Self::new(filter, bias)
    }

    /// Parses a model from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelFormat`] if the text is not valid JSON, and
    /// [`Error::InvalidModel`] if it is valid JSON but `f` or `b` is missing,
    /// not a matrix, holds a non-numeric entry or is not 256x256.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: ModelFile = serde_json::from_str(json).map_err(|e| match e.classify() {
            Category::Data => Error::invalid_model(e.to_string()),
            _ => Error::ModelFormat(e),
        })?;
        Self::try_from(file)
    }

    /// Reads and parses a model file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), bytes = content.len(), "Loading model");
        Self::from_json_str(&content)
    }

    /// Identity filter (a delta at the origin) with zero bias.
    ///
    /// Filtering with it leaves a histogram unchanged, which makes it a
    /// convenient synthetic model.
    pub fn identity() -> Self {
        let mut filter = Grid::zeros();
        filter.set(0, 0, 1.0);
        Self {
            filter,
            bias: Grid::zeros(),
        }
    }

    /// Filter matrix `F`.
    #[inline]
    pub fn filter(&self) -> &Grid {
        &self.filter
    }

    /// Bias matrix `B`.
    #[inline]
    pub fn bias(&self) -> &Grid {
        &self.bias
    }

    /// Converts the model back to its file layout.
    pub fn to_file(&self) -> ModelFile {
        let rows = |g: &Grid| {
            g.as_slice()
                .chunks_exact(GRID_SIZE)
                .map(|row| row.iter().map(|&v| v as f64).collect())
                .collect()
        };
        ModelFile {
            f: rows(&self.filter),
            b: rows(&self.bias),
        }
    }

    /// Serializes the model as JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_file())?)
    }
}

impl TryFrom<ModelFile> for Model {
    type Error = Error;

    fn try_from(file: ModelFile) -> Result<Self> {
        Self::from_rows(&file.f, &file.b)
    }
}

fn ensure_finite(name: &str, grid: &Grid) -> Result<()> {
    match grid.as_slice().iter().position(|v| !v.is_finite()) {
        None => Ok(()),
        Some(i) => Err(Error::invalid_model(format!(
            "{} has non-finite value at ({}, {})",
            name,
            i / GRID_SIZE,
            i % GRID_SIZE
        ))),
    }
}

fn flat_to_grid(name: &str, shape: (usize, usize), data: Vec<f32>) -> Result<Grid> {
    if shape != (GRID_SIZE, GRID_SIZE) {
        return Err(Error::invalid_model(format!(
            "{} must be {}x{}, got {}x{}",
            name, GRID_SIZE, GRID_SIZE, shape.0, shape.1
        )));
    }
    let len = data.len();
    Grid::from_vec(data).ok_or_else(|| {
        Error::invalid_model(format!("{} has {} values, expected {}", name, len, GRID_CELLS))
    })
}

fn rows_to_grid<R: AsRef<[f64]>>(name: &str, rows: &[R]) -> Result<Grid> {
    if rows.len() != GRID_SIZE {
        return Err(Error::invalid_model(format!(
            "{} must have {} rows, got {}",
            name,
            GRID_SIZE,
            rows.len()
        )));
    }
    let mut data = Vec::with_capacity(GRID_CELLS);
    for (i, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != GRID_SIZE {
            return Err(Error::invalid_model(format!(
                "{} row {} has {} columns, expected {}",
                name,
                i,
                row.len(),
                GRID_SIZE
            )));
        }
        data.extend(row.iter().map(|&v| v as f32));
    }
    Grid::from_vec(data)
        .ok_or_else(|| Error::invalid_model(format!("{name} has the wrong number of values")))
}
