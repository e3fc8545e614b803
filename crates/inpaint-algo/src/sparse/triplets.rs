//! Coordinate (COO) buffer for Hessian assembly.
//!
//! Entries are appended per pixel and per stencil direction, then handed to
//! sprs, which sums duplicate `(row, col)` pairs while compressing to CSR.

use super::stencil::{BoundaryClass, Stencil};
use inpaint_core::{Direction, GridIndexer};
use sprs::{CsMat, TriMat};

/// Parallel row / column / value arrays for an `n × n` matrix.
#[derive(Debug, Clone)]
pub struct StencilTriplets {
    dim: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    vals: Vec<f64>,
}

impl StencilTriplets {
    pub fn new(dim: usize) -> Self {
        Self::with_capacity(dim, 0)
    }

    /// Reserve room for `slots_per_row` entries per matrix row.
    pub fn with_capacity(dim: usize, slots_per_row: usize) -> Self {
        let cap = dim * slots_per_row;
        Self {
            dim,
            rows: Vec::with_capacity(cap),
            cols: Vec::with_capacity(cap),
            vals: Vec::with_capacity(cap),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vals.is_empty()
    }

    pub fn push(&mut self, row: usize, col: usize, val: f64) {
        debug_assert!(row < self.dim && col < self.dim);
        self.rows.push(row);
        self.cols.push(col);
        self.vals.push(val);
    }

    /// Append one Hessian row for pixel `(row, col)`.
    ///
    /// The centre is always written. Axis neighbours are written when they
    /// lie inside the grid; diagonal neighbours only when `diagonals` is set,
    /// as explicit zeros.
    pub fn push_stencil(
        &mut self,
        grid: &GridIndexer,
        row: usize,
        col: usize,
        class: &BoundaryClass,
        stencil: &Stencil,
        diagonals: bool,
    ) {
        let p = grid.index(row, col);
        self.push(p, p, stencil.center());

        for dir in Direction::AXIS {
            if !class.has_neighbor(dir) {
                continue;
            }
            if let Some(q) = grid.neighbor_index(row, col, dir) {
                self.push(p, q, stencil.get(dir));
            }
        }

        if diagonals {
            for dir in Direction::DIAGONAL {
                if let Some(q) = grid.neighbor_index(row, col, dir) {
                    self.push(p, q, stencil.get(dir));
                }
            }
        }
    }

    /// Compress to CSR, summing duplicate coordinates.
    pub fn into_csr(self) -> CsMat<f64> {
        TriMat::from_triplets((self.dim, self.dim), self.rows, self.cols, self.vals).to_csr()
    }
}
