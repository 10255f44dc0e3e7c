//! Fixed-size 2D grid of real values.
//!
//! Every matrix the pipeline handles (histogram, model filter, model bias,
//! response surface) is a square [`GRID_SIZE`] x [`GRID_SIZE`] grid in
//! log-chrominance space. [`Grid`] stores one in row-major order:
//! rows index `u` (green/red), columns index `v` (green/blue).
//!
//! The operations here are the small numeric capability the pipeline needs
//! from a matrix type: element access, global sum, global argmax with a
//! deterministic tie-break and min/max.

/// Side length of every grid.
pub const GRID_SIZE: usize = 256;

/// Number of cells in a grid.
pub const GRID_CELLS: usize = GRID_SIZE * GRID_SIZE;

/// A [`GRID_SIZE`] x [`GRID_SIZE`] row-major grid of `f32`.
#[derive(Clone, PartialEq)]
pub struct Grid {
    data: Vec<f32>,
}

/// Location and value of a grid maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Row index (0-based)
    pub row: usize,
    /// Column index (0-based)
    pub col: usize,
    /// Value at `(row, col)`
    pub value: f32,
}

impl Grid {
    /// Creates a grid filled with zeros.
    pub fn zeros() -> Self {
        Self {
            data: vec![0.0; GRID_CELLS],
        }
    }

    /// Wraps a row-major buffer, or returns `None` if it is not exactly
    /// [`GRID_CELLS`] long.
    pub fn from_vec(data: Vec<f32>) -> Option<Self> {
        (data.len() == GRID_CELLS).then_some(Self { data })
    }

    /// Builds a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(GRID_CELLS);
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                data.push(f(row, col));
            }
        }
        Self { data }
    }

    /// Value at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * GRID_SIZE + col]
    }

    /// Sets the value at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row * GRID_SIZE + col] = value;
    }

    /// Row-major cell values.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Mutable row-major cell values.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Sum of all cells, accumulated in `f64`.
    pub fn sum(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum()
    }

    /// Global maximum.
    ///
    /// Ties resolve to the first occurrence in row-major order (top to
    /// bottom, then left to right). NaN cells never win. A grid with no
    /// value above negative infinity reports `(0, 0)`.
    pub fn argmax(&self) -> Peak {
        let mut best = 0usize;
        let mut best_value = f32::NEG_INFINITY;
        for (i, &v) in self.data.iter().enumerate() {
            if v > best_value {
                best_value = v;
                best = i;
            }
        }
        Peak {
            row: best / GRID_SIZE,
            col: best % GRID_SIZE,
            value: self.data[best],
        }
    }

    /// Minimum and maximum over finite cells, or `None` if there are none.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Returns `true` if every cell is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let peak = self.argmax();
        f.debug_struct("Grid")
            .field("size", &GRID_SIZE)
            .field("sum", &self.sum())
            .field("peak", &(peak.row, peak.col, peak.value))
            .finish()
    }
}
