//! Inpainting energy and its gradient.
//!
//! ```text
//! E(u)  = reg · Σ_{p~q} (u_p − u_q)²  +  Σ_p mask_p · (u_p − f_p)²
//! ∇E(u) = H · u − b,     b = 2 · mask ∘ f
//! ```
//!
//! `u` and `f` are flattened in the same pixel ordering as the Hessian.
//! Evaluating `E` and `∇E` here lets callers drive their own solver on
//! `H u = b` and check convergence without rebuilding the matrix.

use inpaint_core::{
    Direction, GridIndexer, HessianConfig, ImageShape, InpaintError, InpaintResult, Mask,
    PixelOrdering,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InpaintingEnergy {
    reg: f64,
    ordering: PixelOrdering,
}

impl InpaintingEnergy {
    pub fn new(reg: f64) -> Self {
        Self {
            reg,
            ordering: PixelOrdering::default(),
        }
    }

    pub fn with_ordering(mut self, ordering: PixelOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Energy matching the matrices built from `config`.
    pub fn from_config(config: &HessianConfig) -> Self {
        Self {
            reg: config.reg,
            ordering: config.ordering,
        }
    }

    pub fn reg(&self) -> f64 {
        self.reg
    }

    /// `E(u)` for current image `u` and known image `known`.
    pub fn value(
        &self,
        shape: ImageShape,
        mask: &Mask,
        u: &[f64],
        known: &[f64],
    ) -> InpaintResult<f64> {
        let (grid, weights) = self.prepare(shape, mask, &[("image", u), ("known image", known)])?;

        let mut smooth = 0.0;
        let mut fidelity = 0.0;
        for (p, (row, col)) in grid.pixels().enumerate() {
            for dir in [Direction::Bottom, Direction::Right] {
                if let Some(q) = grid.neighbor_index(row, col, dir) {
                    let d = u[p] - u[q];
                    smooth += d * d;
                }
            }
            let r = u[p] - known[p];
            fidelity += weights[p] * r * r;
        }
        Ok(self.reg * smooth + fidelity)
    }

    /// `∇E(u)`, one entry per pixel.
    pub fn gradient(
        &self,
        shape: ImageShape,
        mask: &Mask,
        u: &[f64],
        known: &[f64],
    ) -> InpaintResult<Vec<f64>> {
        let (grid, weights) = self.prepare(shape, mask, &[("image", u), ("known image", known)])?;

        let mut grad = vec![0.0; grid.num_pixels()];
        for (p, (row, col)) in grid.pixels().enumerate() {
            for dir in [Direction::Bottom, Direction::Right] {
                if let Some(q) = grid.neighbor_index(row, col, dir) {
                    let g = 2.0 * self.reg * (u[p] - u[q]);
                    grad[p] += g;
                    grad[q] -= g;
                }
            }
            grad[p] += 2.0 * weights[p] * (u[p] - known[p]);
        }
        Ok(grad)
    }

    /// Right-hand side `b = 2 · mask ∘ f` of the stationarity system `H u = b`.
    pub fn rhs(&self, shape: ImageShape, mask: &Mask, known: &[f64]) -> InpaintResult<Vec<f64>> {
        let (_, weights) = self.prepare(shape, mask, &[("known image", known)])?;
        Ok(weights
            .iter()
            .zip(known)
            .map(|(w, f)| 2.0 * w * f)
            .collect())
    }

    fn prepare(
        &self,
        shape: ImageShape,
        mask: &Mask,
        vectors: &[(&'static str, &[f64])],
    ) -> InpaintResult<(GridIndexer, Vec<f64>)> {
        mask.check_shape(shape)?;
        let grid = GridIndexer::new(shape, self.ordering)?;
        for &(what, v) in vectors {
            if v.len() != grid.num_pixels() {
                return Err(InpaintError::DimensionMismatch {
                    what,
                    expected: grid.num_pixels(),
                    found: v.len(),
                });
            }
        }
        let weights = mask.flatten(&grid)?;
        Ok((grid, weights))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_image_matching_known_has_zero_energy() {
        let shape = ImageShape::new(3, 4);
        let mask = Mask::filled(3, 4, 1.0);
        let u = vec![0.25; 12];
        let energy = InpaintingEnergy::new(2.0);
        assert_eq!(energy.value(shape, &mask, &u, &u).unwrap(), 0.0);
        assert!(energy
            .gradient(shape, &mask, &u, &u)
            .unwrap()
            .iter()
            .all(|g| *g == 0.0));
    }

    #[test]
    fn test_value_by_hand_1x2() {
        // one pair: reg * (1 - 3)^2 = 4 reg; fidelity on pixel 0 only: (1 - 0)^2
        let shape = ImageShape::new(1, 2);
        let mask = Mask::from_rows(&[[1.0, 0.0]]).unwrap();
        let energy = InpaintingEnergy::new(0.5);
        let e = energy.value(shape, &mask, &[1.0, 3.0], &[0.0, 9.0]).unwrap();
        assert!((e - (0.5 * 4.0 + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rhs_only_on_masked_pixels() {
        let shape = ImageShape::new(2, 2);
        let mask = Mask::from_rows(&[[1.0, 0.0], [0.0, 3.0]]).unwrap();
        let energy = InpaintingEnergy::new(1.0).with_ordering(PixelOrdering::RowMajor);
        let b = energy.rhs(shape, &mask, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(b, vec![2.0, 0.0, 0.0, 24.0]);
    }

    #[test]
    fn test_from_config_carries_reg() {
        let config = HessianConfig::new(0.75).with_ordering(PixelOrdering::RowMajor);
        let energy = InpaintingEnergy::from_config(&config);
        assert_eq!(energy.reg(), 0.75);
        assert_eq!(energy.reg(), InpaintingEnergy::new(0.75).reg());
    }

    #[test]
    fn test_length_mismatch() {
        let shape = ImageShape::new(2, 2);
        let mask = Mask::zeros(2, 2);
        let err = InpaintingEnergy::new(1.0)
            .value(shape, &mask, &[0.0; 4], &[0.0; 3])
            .unwrap_err();
        assert!(matches!(
            err,
            InpaintError::DimensionMismatch {
                what: "known image",
                expected: 4,
                found: 3
            }
        ));
    }
}
