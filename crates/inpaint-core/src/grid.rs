//! Pixel grid geometry: image shape, linear pixel ordering and neighbour lookup.
//!
//! The Hessian is an operator over the flattened pixel space, so every pixel
//! `(row, col)` needs exactly one linear index. [`GridIndexer`] owns that
//! mapping for a given [`ImageShape`] and [`PixelOrdering`].
//!
//! ```text
//!   ColumnMajor (default)        RowMajor
//!   idx = col * rows + row       idx = row * cols + col
//!
//!   0  3  6                      0  1  2
//!   1  4  7                      3  4  5
//!   2  5  8                      6  7  8
//! ```

use crate::error::{InpaintError, InpaintResult};
use serde::{Deserialize, Serialize};

/// Image dimensions. The channel count is carried for callers that hold
/// multi-channel images but is ignored by every grid computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageShape {
    pub rows: usize,
    pub cols: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<usize>,
}

impl ImageShape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            channels: None,
        }
    }

    pub fn with_channels(rows: usize, cols: usize, channels: usize) -> Self {
        Self {
            rows,
            cols,
            channels: Some(channels),
        }
    }

    /// Build a shape from an array dimension list `(rows, cols, ..)`.
    ///
    /// A third dimension becomes the channel count; anything beyond it is
    /// dropped.
    pub fn from_dims(dims: &[usize]) -> InpaintResult<Self> {
        match dims {
            [rows, cols] => Ok(Self::new(*rows, *cols)),
            [rows, cols, channels, ..] => Ok(Self::with_channels(*rows, *cols, *channels)),
            _ => Err(InpaintError::DimensionMismatch {
                what: "image dimensions",
                expected: 2,
                found: dims.len(),
            }),
        }
    }

    /// `(rows, cols)`
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of pixels (matrix dimension of the Hessian).
    pub fn num_pixels(&self) -> usize {
        self.rows * self.cols
    }

    /// Reject grids without pixels.
    pub fn validate(&self) -> InpaintResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(InpaintError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }
}

/// Convention used to flatten `(row, col)` into a linear pixel index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelOrdering {
    /// `idx = col * rows + row`: columns are contiguous.
    #[default]
    ColumnMajor,
    /// `idx = row * cols + col`: rows are contiguous.
    RowMajor,
}

impl std::fmt::Display for PixelOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PixelOrdering::ColumnMajor => write!(f, "column-major"),
            PixelOrdering::RowMajor => write!(f, "row-major"),
        }
    }
}

/// One of the nine positions of a 3×3 stencil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Direction {
    /// Stencil slot order: centre, four axis neighbours, four diagonals.
    pub const ALL: [Direction; 9] = [
        Direction::Center,
        Direction::Top,
        Direction::Bottom,
        Direction::Left,
        Direction::Right,
        Direction::TopLeft,
        Direction::TopRight,
        Direction::BottomLeft,
        Direction::BottomRight,
    ];

    pub const AXIS: [Direction; 4] = [
        Direction::Top,
        Direction::Bottom,
        Direction::Left,
        Direction::Right,
    ];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::TopLeft,
        Direction::TopRight,
        Direction::BottomLeft,
        Direction::BottomRight,
    ];

    /// `(d_row, d_col)` offset of this direction.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Center => (0, 0),
            Direction::Top => (-1, 0),
            Direction::Bottom => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::TopLeft => (-1, -1),
            Direction::TopRight => (-1, 1),
            Direction::BottomLeft => (1, -1),
            Direction::BottomRight => (1, 1),
        }
    }

    pub fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::TopLeft
                | Direction::TopRight
                | Direction::BottomLeft
                | Direction::BottomRight
        )
    }

    /// Slot number in [`Direction::ALL`].
    pub fn slot(self) -> usize {
        match self {
            Direction::Center => 0,
            Direction::Top => 1,
            Direction::Bottom => 2,
            Direction::Left => 3,
            Direction::Right => 4,
            Direction::TopLeft => 5,
            Direction::TopRight => 6,
            Direction::BottomLeft => 7,
            Direction::BottomRight => 8,
        }
    }
}

/// Bijection between `(row, col)` and linear pixel index for one grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridIndexer {
    rows: usize,
    cols: usize,
    ordering: PixelOrdering,
}

impl GridIndexer {
    /// Build an indexer. Fails on grids with zero rows or columns.
    pub fn new(shape: ImageShape, ordering: PixelOrdering) -> InpaintResult<Self> {
        shape.validate()?;
        Ok(Self {
            rows: shape.rows,
            cols: shape.cols,
            ordering,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn ordering(&self) -> PixelOrdering {
        self.ordering
    }

    pub fn num_pixels(&self) -> usize {
        self.rows * self.cols
    }

    /// Linear index of an in-grid pixel.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        match self.ordering {
            PixelOrdering::ColumnMajor => col * self.rows + row,
            PixelOrdering::RowMajor => row * self.cols + col,
        }
    }

    /// Linear index with bounds checking.
    pub fn checked_index(&self, row: usize, col: usize) -> InpaintResult<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(InpaintError::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.index(row, col))
    }

    /// `(row, col)` of a linear index.
    #[inline]
    pub fn position(&self, idx: usize) -> (usize, usize) {
        match self.ordering {
            PixelOrdering::ColumnMajor => (idx % self.rows, idx / self.rows),
            PixelOrdering::RowMajor => (idx / self.cols, idx % self.cols),
        }
    }

    /// Neighbour of `(row, col)` in `dir`, or `None` when it falls off the grid.
    pub fn neighbor(&self, row: usize, col: usize, dir: Direction) -> Option<(usize, usize)> {
        let (dr, dc) = dir.offset();
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        (r < self.rows && c < self.cols).then_some((r, c))
    }

    pub fn neighbor_index(&self, row: usize, col: usize, dir: Direction) -> Option<usize> {
        self.neighbor(row, col, dir)
            .map(|(r, c)| self.index(r, c))
    }

    /// All pixels in increasing linear-index order.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.num_pixels()).map(move |idx| self.position(idx))
    }
}
