//! Sparse Hessian of the inpainting energy.
//!
//! ```text
//! H = reg · L  +  2 · diag(mask)
//!
//! where:
//!   L[p,p] = 2 · (number of axis neighbours of p)
//!   L[p,q] = −2                for axis-adjacent p, q
//! ```
//!
//! Assembly walks the grid once, derives each pixel's [`Stencil`] from its
//! boundary class, appends the stencil to a [`StencilTriplets`] buffer and
//! compresses it to CSR. Work is O(rows · cols).

use super::stencil::{BoundaryClass, Region, Stencil};
use super::triplets::StencilTriplets;
use inpaint_core::{
    BoundaryScheme, GridIndexer, HessianConfig, ImageShape, InpaintError, InpaintResult, Mask,
    PixelOrdering,
};
use sprs::{CsMat, CsMatView};
use std::borrow::Cow;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors from Hessian assembly
#[derive(Debug, Error)]
pub enum HessianError {
    #[error("Regularization weight must be finite, got {value}")]
    NonFiniteWeight { value: f64 },

    #[error("Mask weight at ({row}, {col}) must be finite, got {value}")]
    NonFiniteMask { row: usize, col: usize, value: f64 },

    #[error(transparent)]
    Core(#[from] InpaintError),
}

/// Raw CSR arrays, the layout handed to external solvers.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrParts {
    pub nrows: usize,
    pub ncols: usize,
    /// Row pointers, length `nrows + 1`
    pub indptr: Vec<usize>,
    /// Column index of each stored entry
    pub indices: Vec<usize>,
    /// Value of each stored entry
    pub data: Vec<f64>,
}

/// Assembled Hessian in CSR format.
///
/// Rows and columns follow the pixel ordering it was built with.
#[derive(Debug, Clone)]
pub struct SparseHessian {
    matrix: CsMat<f64>,
    shape: ImageShape,
    grid: GridIndexer,
}

impl SparseHessian {
    /// Matrix dimension (`rows · cols`).
    pub fn dim(&self) -> usize {
        self.matrix.rows()
    }

    /// Image shape the matrix was assembled for.
    pub fn image_shape(&self) -> ImageShape {
        self.shape
    }

    pub fn ordering(&self) -> PixelOrdering {
        self.grid.ordering()
    }

    /// Pixel indexer matching the matrix layout.
    pub fn grid(&self) -> &GridIndexer {
        &self.grid
    }

    /// Get matrix view for linear algebra operations.
    pub fn view(&self) -> CsMatView<'_, f64> {
        self.matrix.view()
    }

    /// Get H[p,q] by linear pixel index; absent entries read as zero.
    pub fn get(&self, p: usize, q: usize) -> f64 {
        self.matrix.get(p, q).copied().unwrap_or(0.0)
    }

    /// Get the entry coupling pixel `a = (row, col)` with pixel `b`.
    pub fn get_pixel(&self, a: (usize, usize), b: (usize, usize)) -> InpaintResult<f64> {
        let p = self.grid.checked_index(a.0, a.1)?;
        let q = self.grid.checked_index(b.0, b.1)?;
        Ok(self.get(p, q))
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.matrix.nnz()
    }

    /// Matrix density (nnz / n²).
    pub fn density(&self) -> f64 {
        let n = self.dim();
        if n == 0 {
            return 0.0;
        }
        self.nnz() as f64 / (n * n) as f64
    }

    /// Memory usage in bytes (approximate).
    pub fn memory_bytes(&self) -> usize {
        // CSR: nnz values (f64) + nnz column indices (usize) + (n+1) row pointers (usize)
        let nnz = self.nnz();
        nnz * 8 + nnz * 8 + (self.dim() + 1) * 8
    }

    /// Iterate over stored entries in row `p` (zero-allocation).
    ///
    /// Rows past `dim()` are empty.
    pub fn row_iter(&self, p: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let indptr = self.matrix.indptr();
        let (start, end) = if p < self.dim() {
            (indptr.index(p), indptr.index(p + 1))
        } else {
            (0, 0)
        };
        let indices = &self.matrix.indices()[start..end];
        let data = &self.matrix.data()[start..end];
        indices.iter().zip(data.iter()).map(|(&q, &v)| (q, v))
    }

    /// Main diagonal as a dense vector.
    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.dim()).map(|p| self.get(p, p)).collect()
    }

    /// Row pointers, length `dim() + 1`.
    pub fn indptr(&self) -> Cow<'_, [usize]> {
        self.matrix.proper_indptr()
    }

    pub fn indices(&self) -> &[usize] {
        self.matrix.indices()
    }

    pub fn data(&self) -> &[f64] {
        self.matrix.data()
    }

    /// Consume the matrix, returning its raw CSR arrays.
    pub fn into_csr_parts(self) -> CsrParts {
        let (nrows, ncols) = self.matrix.shape();
        let (indptr, indices, data) = self.matrix.into_raw_storage();
        CsrParts {
            nrows,
            ncols,
            indptr,
            indices,
            data,
        }
    }

    /// Consume the wrapper, returning the sprs matrix.
    pub fn into_inner(self) -> CsMat<f64> {
        self.matrix
    }

    /// `y = H · x`
    pub fn mul_vec(&self, x: &[f64]) -> InpaintResult<Vec<f64>> {
        if x.len() != self.dim() {
            return Err(InpaintError::DimensionMismatch {
                what: "Hessian operand",
                expected: self.dim(),
                found: x.len(),
            });
        }
        Ok((0..self.dim())
            .map(|p| self.row_iter(p).map(|(q, v)| v * x[q]).sum())
            .collect())
    }

    /// `|H[p,q] − H[q,p]| ≤ tol` for every stored entry.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        (0..self.dim()).all(|p| self.row_iter(p).all(|(q, v)| (v - self.get(q, p)).abs() <= tol))
    }
}

/// Builds [`SparseHessian`]s for a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct HessianAssembler {
    config: HessianConfig,
}

impl HessianAssembler {
    pub fn new(config: HessianConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HessianConfig {
        &self.config
    }

    /// Assemble smoothness plus fidelity for `mask`.
    ///
    /// `mask` must be exactly `shape.rows × shape.cols`; the channel count of
    /// `shape` is ignored.
    pub fn assemble(&self, shape: ImageShape, mask: &Mask) -> Result<SparseHessian, HessianError> {
        mask.check_shape(shape)?;
        self.build(shape, Some(mask))
    }

    /// Assemble the smoothness operator alone (all-zero mask).
    pub fn smoothness(&self, shape: ImageShape) -> Result<SparseHessian, HessianError> {
        self.build(shape, None)
    }

    /// Coefficients of the Hessian row for pixel `(row, col)`.
    pub fn stencil_at(
        &self,
        shape: ImageShape,
        mask: &Mask,
        row: usize,
        col: usize,
    ) -> Result<Stencil, HessianError> {
        self.check_reg()?;
        let grid = GridIndexer::new(shape, self.config.ordering)?;
        grid.checked_index(row, col)?;
        self.pixel_stencil(&grid, Some(mask), row, col)
    }

    fn check_reg(&self) -> Result<(), HessianError> {
        if !self.config.reg.is_finite() {
            return Err(HessianError::NonFiniteWeight {
                value: self.config.reg,
            });
        }
        Ok(())
    }

    fn pixel_stencil(
        &self,
        grid: &GridIndexer,
        mask: Option<&Mask>,
        row: usize,
        col: usize,
    ) -> Result<Stencil, HessianError> {
        let class = BoundaryClass::classify(row, col, grid.rows(), grid.cols());
        let stencil = Stencil::smoothness(self.config.scheme, &class, self.config.reg);
        let Some(mask) = mask else {
            return Ok(stencil);
        };
        let weight = mask.get(row, col)?;
        if !weight.is_finite() {
            return Err(HessianError::NonFiniteMask {
                row,
                col,
                value: weight,
            });
        }
        Ok(stencil.with_fidelity(weight))
    }

    #[cfg(not(feature = "parallel"))]
    fn stencils(
        &self,
        grid: &GridIndexer,
        mask: Option<&Mask>,
    ) -> Result<Vec<Stencil>, HessianError> {
        grid.pixels()
            .map(|(row, col)| self.pixel_stencil(grid, mask, row, col))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn stencils(
        &self,
        grid: &GridIndexer,
        mask: Option<&Mask>,
    ) -> Result<Vec<Stencil>, HessianError> {
        use rayon::prelude::*;

        (0..grid.num_pixels())
            .into_par_iter()
            .map(|idx| {
                let (row, col) = grid.position(idx);
                self.pixel_stencil(grid, mask, row, col)
            })
            .collect()
    }

    fn build(&self, shape: ImageShape, mask: Option<&Mask>) -> Result<SparseHessian, HessianError> {
        self.check_reg()?;
        let grid = GridIndexer::new(shape, self.config.ordering)?;
        let n = grid.num_pixels();

        debug!(
            rows = shape.rows,
            cols = shape.cols,
            reg = self.config.reg,
            scheme = %self.config.scheme,
            ordering = %self.config.ordering,
            anchored = mask.map(Mask::count_nonzero).unwrap_or(0),
            "assembling inpainting Hessian"
        );

        let stencils = self.stencils(&grid, mask)?;

        let slots = if self.config.emit_diagonal_slots { 9 } else { 5 };
        let mut triplets = StencilTriplets::with_capacity(n, slots);
        let mut region_counts: HashMap<Region, usize> = HashMap::new();

        for (idx, stencil) in stencils.iter().enumerate() {
            let (row, col) = grid.position(idx);
            let class = BoundaryClass::classify(row, col, grid.rows(), grid.cols());
            *region_counts.entry(class.region()).or_insert(0) += 1;
            triplets.push_stencil(
                &grid,
                row,
                col,
                &class,
                stencil,
                self.config.emit_diagonal_slots,
            );
        }

        for region in Region::ALL {
            if let Some(count) = region_counts.get(&region) {
                trace!(?region, pixels = count, "boundary region");
            }
        }

        let n_triplets = triplets.len();
        let matrix = triplets.into_csr();

        debug!(
            dim = n,
            triplets = n_triplets,
            nnz = matrix.nnz(),
            "Hessian assembled"
        );

        Ok(SparseHessian {
            matrix,
            shape,
            grid,
        })
    }
}

/// Assemble the Hessian with default settings and regularization `reg`.
///
/// `reg ≤ 0` is accepted as given; only non-finite weights are rejected.
pub fn assemble_hessian(
    image_shape: ImageShape,
    mask: &Mask,
    reg: f64,
) -> Result<SparseHessian, HessianError> {
    HessianAssembler::new(HessianConfig::new(reg)).assemble(image_shape, mask)
}

/// Assemble the Hessian under an explicit scheme.
pub fn assemble_hessian_with_scheme(
    image_shape: ImageShape,
    mask: &Mask,
    reg: f64,
    scheme: BoundaryScheme,
) -> Result<SparseHessian, HessianError> {
    HessianAssembler::new(HessianConfig::new(reg).with_scheme(scheme)).assemble(image_shape, mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inpaint_core::Direction;

    fn dense(h: &SparseHessian) -> Vec<Vec<f64>> {
        (0..h.dim())
            .map(|p| (0..h.dim()).map(|q| h.get(p, q)).collect())
            .collect()
    }

    #[test]
    fn test_single_pixel() {
        let mask = Mask::filled(1, 1, 1.0);
        let h = assemble_hessian(ImageShape::new(1, 1), &mask, 1.0).unwrap();
        assert_eq!(h.dim(), 1);
        assert_eq!(h.get(0, 0), 2.0);
    }

    #[test]
    fn test_3x3_center_stencil() {
        let shape = ImageShape::new(3, 3);
        let h = assemble_hessian(shape, &Mask::zeros(3, 3), 1.0).unwrap();

        assert_eq!(h.get_pixel((1, 1), (1, 1)).unwrap(), 8.0);
        for (r, c) in [(0, 1), (2, 1), (1, 0), (1, 2)] {
            assert_eq!(h.get_pixel((1, 1), (r, c)).unwrap(), -2.0);
        }
        for corner in [(0, 0), (0, 2), (2, 0), (2, 2)] {
            assert_eq!(h.get_pixel(corner, corner).unwrap(), 4.0);
            assert_eq!(h.get_pixel((1, 1), corner).unwrap(), 0.0);
        }
        for edge in [(0, 1), (1, 0), (1, 2), (2, 1)] {
            assert_eq!(h.get_pixel(edge, edge).unwrap(), 6.0);
        }
    }

    #[test]
    fn test_column_major_matches_reference_layout() {
        // 2 rows × 3 cols: pixel (row, col) -> col * 2 + row
        let h = assemble_hessian(ImageShape::new(2, 3), &Mask::zeros(2, 3), 1.0).unwrap();
        assert_eq!(h.get(0, 1), -2.0); // (0,0) - (1,0)
        assert_eq!(h.get(0, 2), -2.0); // (0,0) - (0,1)
        assert_eq!(h.get(1, 2), 0.0); // (1,0) - (0,1) diagonal
        assert_eq!(h.get(2, 2), 6.0); // (0,1): left, right, bottom
    }

    #[test]
    fn test_nnz_counts() {
        let h = assemble_hessian(ImageShape::new(3, 4), &Mask::zeros(3, 4), 1.0).unwrap();
        // 12 diagonal + 2 * (3*3 horizontal + 2*4 vertical) couplings
        assert_eq!(h.nnz(), 12 + 2 * (9 + 8));
        assert!((h.density() - h.nnz() as f64 / 144.0).abs() < 1e-15);
        assert_eq!(h.indptr().len(), 13);
        assert_eq!(h.indices().len(), h.nnz());
        assert_eq!(h.data().len(), h.nnz());
    }

    #[test]
    fn test_mask_shape_mismatch() {
        let err = assemble_hessian(ImageShape::new(2, 3), &Mask::zeros(3, 2), 1.0).unwrap_err();
        assert!(matches!(
            err,
            HessianError::Core(InpaintError::MaskShapeMismatch {
                expected: (2, 3),
                found: (3, 2)
            })
        ));
    }

    #[test]
    fn test_empty_grid() {
        let err = assemble_hessian(ImageShape::new(0, 0), &Mask::zeros(0, 0), 1.0).unwrap_err();
        assert!(matches!(
            err,
            HessianError::Core(InpaintError::EmptyGrid { .. })
        ));
    }

    #[test]
    fn test_non_finite_reg() {
        let err =
            assemble_hessian(ImageShape::new(2, 2), &Mask::zeros(2, 2), f64::NAN).unwrap_err();
        assert!(matches!(err, HessianError::NonFiniteWeight { .. }));
    }

    #[test]
    fn test_non_finite_mask_reports_pixel() {
        let mut mask = Mask::zeros(2, 2);
        mask.set(1, 0, f64::INFINITY).unwrap();
        let err = assemble_hessian(ImageShape::new(2, 2), &mask, 1.0).unwrap_err();
        assert!(matches!(
            err,
            HessianError::NonFiniteMask { row: 1, col: 0, .. }
        ));
    }

    #[test]
    fn test_non_positive_reg_is_accepted() {
        let h = assemble_hessian(ImageShape::new(2, 2), &Mask::zeros(2, 2), -1.0).unwrap();
        assert_eq!(h.get(0, 0), -4.0);
        assert_eq!(h.get(0, 1), 2.0);
    }

    #[test]
    fn test_stencil_at_matches_matrix_row() {
        let mask = Mask::from_fn(3, 4, |r, c| (r + c) as f64 * 0.5);
        let shape = ImageShape::new(3, 4);
        let assembler = HessianAssembler::new(HessianConfig::new(0.3));
        let h = assembler.assemble(shape, &mask).unwrap();

        let stencil = assembler.stencil_at(shape, &mask, 2, 1).unwrap();
        assert_eq!(h.get_pixel((2, 1), (2, 1)).unwrap(), stencil.center());
        assert_eq!(
            h.get_pixel((2, 1), (1, 1)).unwrap(),
            stencil.get(Direction::Top)
        );
        assert_eq!(
            h.get_pixel((2, 1), (2, 2)).unwrap(),
            stencil.get(Direction::Right)
        );

        assert!(assembler.stencil_at(shape, &mask, 3, 0).is_err());
    }

    #[test]
    fn test_mul_vec_matches_dense() {
        let mask = Mask::from_fn(3, 3, |r, c| if r == c { 1.0 } else { 0.0 });
        let h = assemble_hessian(ImageShape::new(3, 3), &mask, 0.5).unwrap();
        let x: Vec<f64> = (0..9).map(|i| i as f64 - 4.0).collect();

        let y = h.mul_vec(&x).unwrap();
        let d = dense(&h);
        for p in 0..9 {
            let expected: f64 = (0..9).map(|q| d[p][q] * x[q]).sum();
            assert!((y[p] - expected).abs() < 1e-12);
        }

        assert!(h.mul_vec(&x[..4]).is_err());
    }

    #[test]
    fn test_constant_vector_in_smoothness_kernel() {
        let h = HessianAssembler::default()
            .smoothness(ImageShape::new(4, 5))
            .unwrap();
        let y = h.mul_vec(&vec![3.0; 20]).unwrap();
        assert!(y.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_csr_parts() {
        let h = assemble_hessian(ImageShape::new(2, 2), &Mask::zeros(2, 2), 1.0).unwrap();
        let nnz = h.nnz();
        let parts = h.into_csr_parts();
        assert_eq!((parts.nrows, parts.ncols), (4, 4));
        assert_eq!(parts.indptr.len(), 5);
        assert_eq!(parts.indptr[4], nnz);
        // row 0 of a 2x2 grid: self, bottom (1), right (2)
        let row0: Vec<_> = (parts.indptr[0]..parts.indptr[1])
            .map(|k| (parts.indices[k], parts.data[k]))
            .collect();
        assert_eq!(row0, vec![(0, 4.0), (1, -2.0), (2, -2.0)]);
    }

    #[test]
    fn test_row_iter_past_end_is_empty() {
        let h = assemble_hessian(ImageShape::new(2, 2), &Mask::zeros(2, 2), 1.0).unwrap();
        assert_eq!(h.row_iter(3).count(), 3);
        assert_eq!(h.row_iter(4).count(), 0);
        assert_eq!(h.row_iter(usize::MAX).count(), 0);
        assert_eq!(h.get(4, 0), 0.0);
    }

    #[test]
    fn test_into_inner_keeps_matrix() {
        let h = assemble_hessian(ImageShape::new(2, 3), &Mask::filled(2, 3, 1.0), 1.0).unwrap();
        let indptr = h.indptr().into_owned();
        let nnz = h.nnz();
        let matrix = h.into_inner();
        assert_eq!(matrix.shape(), (6, 6));
        assert_eq!(matrix.nnz(), nnz);
        assert_eq!(matrix.indptr().raw_storage(), indptr.as_slice());
        assert_eq!(matrix.get(0, 0).copied(), Some(6.0));
    }

    #[test]
    fn test_diagonal_slots_store_zeros_only() {
        let shape = ImageShape::new(3, 3);
        let mask = Mask::zeros(3, 3);
        let plain = HessianAssembler::default().assemble(shape, &mask).unwrap();
        let padded = HessianAssembler::new(HessianConfig::default().with_diagonal_slots(true))
            .assemble(shape, &mask)
            .unwrap();

        // 4 corners with 1 diagonal neighbour, 4 edges with 2, centre with 4
        assert_eq!(padded.nnz(), plain.nnz() + 16);
        assert_eq!(padded.get(0, 4), 0.0);
        assert!(padded.row_iter(0).any(|(q, v)| q == 4 && v == 0.0));
        assert!(plain.row_iter(0).all(|(q, _)| q != 4));
        for p in 0..9 {
            for q in 0..9 {
                assert_eq!(plain.get(p, q), padded.get(p, q));
            }
        }
    }
}
