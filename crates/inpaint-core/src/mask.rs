//! Owned per-pixel fidelity weights in row-major layout.
//!
//! A mask entry of `1.0` anchors the pixel to its known value, `0.0` leaves it
//! free. Any real value is accepted and enters the Hessian additively.

use crate::error::{InpaintError, InpaintResult};
use crate::grid::{GridIndexer, ImageShape};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mask {
    rows: usize,
    cols: usize,
    /// Backing storage, `data[row * cols + col]`
    data: Vec<f64>,
}

impl Mask {
    /// All-zero mask: pure smoothness, no pixel anchored.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Wrap row-major data. Fails when `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> InpaintResult<Self> {
        if data.len() != rows * cols {
            return Err(InpaintError::DimensionMismatch {
                what: "mask data",
                expected: rows * cols,
                found: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Build from nested rows. All rows must have the same length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> InpaintResult<Self> {
        let cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(InpaintError::DimensionMismatch {
                    what: "mask row",
                    expected: cols,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(f(row, col));
            }
        }
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Checked read.
    pub fn get(&self, row: usize, col: usize) -> InpaintResult<f64> {
        if row >= self.rows || col >= self.cols {
            return Err(InpaintError::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.data[row * self.cols + col])
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> InpaintResult<()> {
        if row >= self.rows || col >= self.cols {
            return Err(InpaintError::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.data[row * self.cols + col] = value;
        Ok(())
    }

    /// Row-major view of the weights.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Fail unless the mask covers exactly `shape`'s rows and columns.
    pub fn check_shape(&self, shape: ImageShape) -> InpaintResult<()> {
        if self.dims() != shape.dims() {
            return Err(InpaintError::MaskShapeMismatch {
                expected: shape.dims(),
                found: self.dims(),
            });
        }
        Ok(())
    }

    /// Weights flattened in the indexer's pixel ordering.
    pub fn flatten(&self, grid: &GridIndexer) -> InpaintResult<Vec<f64>> {
        grid.pixels().map(|(row, col)| self.get(row, col)).collect()
    }

    /// Number of entries with a non-zero weight.
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&w| w != 0.0).count()
    }
}
