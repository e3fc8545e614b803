//! Assembly configuration, loadable from TOML.
//!
//! ```toml
//! reg = 0.5
//! scheme = "partition"
//! ordering = "column_major"
//! emit_diagonal_slots = false
//! ```
//!
//! Every field is optional; missing fields take their defaults.

use crate::error::InpaintResult;
use crate::grid::PixelOrdering;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How boundary pixels derive their smoothness coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryScheme {
    /// Each pixel falls in exactly one region; the self coefficient is
    /// `2·reg` per in-grid axis neighbour.
    #[default]
    Partition,
    /// Twelve additive boundary predicates that may overlap. Agrees with
    /// `Partition` whenever both grid dimensions are at least 2.
    Overlapping,
}

impl std::fmt::Display for BoundaryScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryScheme::Partition => write!(f, "partition"),
            BoundaryScheme::Overlapping => write!(f, "overlapping"),
        }
    }
}

/// Hessian assembly settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HessianConfig {
    /// Regularization weight of the smoothness term
    #[serde(default = "default_reg")]
    pub reg: f64,
    /// Boundary coefficient scheme
    #[serde(default)]
    pub scheme: BoundaryScheme,
    /// Linear pixel index convention
    #[serde(default)]
    pub ordering: PixelOrdering,
    /// Store explicit zeros for in-grid diagonal neighbours
    #[serde(default)]
    pub emit_diagonal_slots: bool,
}

impl Default for HessianConfig {
    fn default() -> Self {
        Self {
            reg: default_reg(),
            scheme: BoundaryScheme::default(),
            ordering: PixelOrdering::default(),
            emit_diagonal_slots: false,
        }
    }
}

fn default_reg() -> f64 {
    1.0
}

impl HessianConfig {
    pub fn new(reg: f64) -> Self {
        Self {
            reg,
            ..Self::default()
        }
    }

    pub fn with_reg(mut self, reg: f64) -> Self {
        self.reg = reg;
        self
    }

    pub fn with_scheme(mut self, scheme: BoundaryScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_ordering(mut self, ordering: PixelOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_diagonal_slots(mut self, emit: bool) -> Self {
        self.emit_diagonal_slots = emit;
        self
    }

    pub fn from_toml_str(contents: &str) -> InpaintResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml_string(&self) -> InpaintResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> InpaintResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Write as TOML, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> InpaintResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}
