//! # inpaint-algo: Hessian assembly for image inpainting
//!
//! Builds the sparse Hessian of a quadratic inpainting energy (smoothness
//! over axis-adjacent pixels plus a mask-weighted data term) for an external
//! linear solver.
//!
//! - [`sparse`] - Boundary stencils, triplet buffer, CSR assembly
//! - [`energy`] - Energy value, gradient and solver right-hand side
//!
//! Enable the `parallel` feature to compute per-pixel stencils with rayon.

pub mod energy;
pub mod sparse;

pub use energy::InpaintingEnergy;
pub use sparse::{
    assemble_hessian, assemble_hessian_with_scheme, CsrParts, HessianAssembler, HessianError,
    SparseHessian,
};
