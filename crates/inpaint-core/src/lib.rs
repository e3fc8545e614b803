//! # inpaint-core: grid and mask types for inpainting Hessian assembly
//!
//! Shared building blocks for the quadratic inpainting energy
//!
//! ```text
//! E(u) = reg · Σ_{p~q} (u_p − u_q)²  +  Σ_p mask_p · (u_p − f_p)²
//! ```
//!
//! where `p~q` ranges over axis-adjacent pixel pairs.
//!
//! ## Modules
//!
//! - [`grid`] - Image shape, pixel ordering, neighbour lookup
//! - [`mask`] - Per-pixel fidelity weights
//! - [`config`] - Assembly settings (TOML loadable)
//! - [`error`] - Unified error type
//!
//! The Hessian itself is built in `inpaint-algo`.

pub mod config;
pub mod error;
pub mod grid;
pub mod mask;

pub use config::{BoundaryScheme, HessianConfig};
pub use error::{InpaintError, InpaintResult};
pub use grid::{Direction, GridIndexer, ImageShape, PixelOrdering};
pub use mask::Mask;
