//! # Sparse Hessian assembly
//!
//! The Hessian of the inpainting energy couples each pixel only with its four
//! axis neighbours, so an `n`-pixel image yields an `n × n` matrix with at
//! most five entries per row.
//!
//! ## Module Organization
//!
//! - [`stencil`]: Boundary classification and per-pixel coefficients
//! - [`triplets`]: Coordinate buffer with duplicate summation
//! - [`hessian`]: Assembly driver and the CSR result type
//!
//! ## Usage
//!
//! ```ignore
//! use inpaint_algo::sparse::assemble_hessian;
//! use inpaint_core::{ImageShape, Mask};
//!
//! let shape = ImageShape::with_channels(480, 640, 3);
//! let mask = Mask::zeros(480, 640);
//! let h = assemble_hessian(shape, &mask, 0.1)?;
//! println!("nnz: {} ({:.4}% density)", h.nnz(), h.density() * 100.0);
//! let csr = h.into_csr_parts();
//! ```

pub mod hessian;
pub mod stencil;
pub mod triplets;

pub use hessian::{
    assemble_hessian, assemble_hessian_with_scheme, CsrParts, HessianAssembler, HessianError,
    SparseHessian,
};
pub use stencil::{AxisPosition, BoundaryClass, Region, Stencil};
pub use triplets::StencilTriplets;
