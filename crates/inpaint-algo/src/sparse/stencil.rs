//! Boundary classification and per-pixel stencil coefficients.
//!
//! Each pixel contributes one row of the Hessian. Its coefficients depend
//! only on where the pixel sits relative to the grid boundary:
//!
//! ```text
//!   TL ── TopEdge ── TR
//!   │                 │
//!   LeftEdge  Interior  RightEdge
//!   │                 │
//!   BL ─ BottomEdge ─ BR
//! ```
//!
//! With the smoothness energy `reg · Σ (u_p − u_q)²` over axis-adjacent pairs,
//! every in-grid axis neighbour gets `−2·reg` and the centre gets `2·reg` per
//! such neighbour:
//!
//! | Region   | centre | neighbours          |
//! |----------|--------|---------------------|
//! | Interior | 8·reg  | 4 × (−2·reg)        |
//! | Edge     | 6·reg  | 3 × (−2·reg)        |
//! | Corner   | 4·reg  | 2 × (−2·reg)        |
//!
//! Diagonal slots exist in the stencil but are always zero.

use inpaint_core::{BoundaryScheme, Direction};

/// Position of an index along one axis of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisPosition {
    /// Index 0 of an axis longer than 1
    First,
    /// Strictly between the first and last index
    Inner,
    /// Last index of an axis longer than 1
    Last,
    /// Only index of an axis of length 1
    Sole,
}

impl AxisPosition {
    pub fn classify(index: usize, len: usize) -> Self {
        debug_assert!(index < len);
        match (index == 0, index + 1 == len) {
            (true, true) => AxisPosition::Sole,
            (true, false) => AxisPosition::First,
            (false, true) => AxisPosition::Last,
            (false, false) => AxisPosition::Inner,
        }
    }

    /// A neighbour exists at `index - 1`.
    pub fn has_before(self) -> bool {
        matches!(self, AxisPosition::Inner | AxisPosition::Last)
    }

    /// A neighbour exists at `index + 1`.
    pub fn has_after(self) -> bool {
        matches!(self, AxisPosition::First | AxisPosition::Inner)
    }

    fn is_first(self) -> bool {
        matches!(self, AxisPosition::First | AxisPosition::Sole)
    }

    fn is_last(self) -> bool {
        matches!(self, AxisPosition::Last | AxisPosition::Sole)
    }
}

/// Named boundary region of a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Interior,
    TopEdge,
    BottomEdge,
    LeftEdge,
    RightEdge,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// Pixel of a grid that is a single row or column wide
    Strip,
}

impl Region {
    pub const ALL: [Region; 10] = [
        Region::Interior,
        Region::TopEdge,
        Region::BottomEdge,
        Region::LeftEdge,
        Region::RightEdge,
        Region::TopLeft,
        Region::TopRight,
        Region::BottomLeft,
        Region::BottomRight,
        Region::Strip,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Region::TopLeft | Region::TopRight | Region::BottomLeft | Region::BottomRight
        )
    }

    pub fn is_edge(self) -> bool {
        matches!(
            self,
            Region::TopEdge | Region::BottomEdge | Region::LeftEdge | Region::RightEdge
        )
    }
}

/// Row and column position of a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundaryClass {
    pub row: AxisPosition,
    pub col: AxisPosition,
}

impl BoundaryClass {
    pub fn classify(row: usize, col: usize, rows: usize, cols: usize) -> Self {
        Self {
            row: AxisPosition::classify(row, rows),
            col: AxisPosition::classify(col, cols),
        }
    }

    pub fn region(&self) -> Region {
        use AxisPosition::*;
        match (self.row, self.col) {
            (Sole, _) | (_, Sole) => Region::Strip,
            (Inner, Inner) => Region::Interior,
            (First, Inner) => Region::TopEdge,
            (Last, Inner) => Region::BottomEdge,
            (Inner, First) => Region::LeftEdge,
            (Inner, Last) => Region::RightEdge,
            (First, First) => Region::TopLeft,
            (First, Last) => Region::TopRight,
            (Last, First) => Region::BottomLeft,
            (Last, Last) => Region::BottomRight,
        }
    }

    /// Whether the neighbour in `dir` lies inside the grid.
    pub fn has_neighbor(&self, dir: Direction) -> bool {
        let up = self.row.has_before();
        let down = self.row.has_after();
        let left = self.col.has_before();
        let right = self.col.has_after();
        match dir {
            Direction::Center => true,
            Direction::Top => up,
            Direction::Bottom => down,
            Direction::Left => left,
            Direction::Right => right,
            Direction::TopLeft => up && left,
            Direction::TopRight => up && right,
            Direction::BottomLeft => down && left,
            Direction::BottomRight => down && right,
        }
    }

    /// Number of in-grid axis neighbours (0..=4).
    pub fn axis_degree(&self) -> usize {
        Direction::AXIS
            .iter()
            .filter(|&&dir| self.has_neighbor(dir))
            .count()
    }
}

/// Which indices along an axis a boundary predicate accepts.
#[derive(Debug, Clone, Copy)]
enum Span {
    First,
    Last,
    Inner,
    BeforeLast,
}

impl Span {
    fn holds(self, pos: AxisPosition) -> bool {
        match self {
            Span::First => pos.is_first(),
            Span::Last => pos.is_last(),
            Span::Inner => pos == AxisPosition::Inner,
            Span::BeforeLast => pos.has_after(),
        }
    }
}

/// One additive term of the overlapping scheme: when both spans hold, add
/// `center·reg` to the centre and `−2·reg` to each listed neighbour.
#[derive(Debug, Clone, Copy)]
struct BoundaryPredicate {
    row: Span,
    col: Span,
    center: f64,
    top: bool,
    bottom: bool,
    left: bool,
    right: bool,
}

const fn predicate(row: Span, col: Span, center: f64, neighbors: [bool; 4]) -> BoundaryPredicate {
    BoundaryPredicate {
        row,
        col,
        center,
        top: neighbors[0],
        bottom: neighbors[1],
        left: neighbors[2],
        right: neighbors[3],
    }
}

// Neighbour flags are [top, bottom, left, right].
const BOUNDARY_PREDICATES: [BoundaryPredicate; 12] = [
    predicate(Span::Inner, Span::Inner, 8.0, [true, true, true, true]),
    predicate(Span::First, Span::First, 4.0, [false, true, false, true]),
    predicate(Span::First, Span::Inner, 6.0, [false, true, true, true]),
    predicate(Span::Last, Span::BeforeLast, 2.0, [true, false, false, false]),
    predicate(Span::BeforeLast, Span::Last, 2.0, [false, false, true, false]),
    predicate(Span::Inner, Span::First, 6.0, [true, true, false, true]),
    predicate(Span::Inner, Span::Last, 4.0, [true, true, false, false]),
    predicate(Span::First, Span::Last, 2.0, [false, true, false, false]),
    predicate(Span::Last, Span::Last, 2.0, [true, false, false, false]),
    predicate(Span::Last, Span::Inner, 4.0, [false, false, true, true]),
    predicate(Span::Last, Span::First, 2.0, [false, false, false, true]),
    predicate(Span::Last, Span::Last, 2.0, [false, false, true, false]),
];

/// Coefficients of one Hessian row, indexed by [`Direction::slot`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stencil {
    coeffs: [f64; 9],
}

impl Stencil {
    pub fn zero() -> Self {
        Self { coeffs: [0.0; 9] }
    }

    /// Smoothness coefficients under `scheme`.
    pub fn smoothness(scheme: BoundaryScheme, class: &BoundaryClass, reg: f64) -> Self {
        match scheme {
            BoundaryScheme::Partition => Self::partition(class, reg),
            BoundaryScheme::Overlapping => Self::overlapping(class, reg),
        }
    }

    /// Mutually exclusive regions: `−2·reg` per in-grid axis neighbour,
    /// centre equal to the negated neighbour sum.
    pub fn partition(class: &BoundaryClass, reg: f64) -> Self {
        let mut stencil = Self::zero();
        for dir in Direction::AXIS {
            if class.has_neighbor(dir) {
                stencil.coeffs[dir.slot()] = -2.0 * reg;
                stencil.coeffs[Direction::Center.slot()] += 2.0 * reg;
            }
        }
        stencil
    }

    /// Sum of every boundary predicate the pixel satisfies. Terms for
    /// off-grid neighbours are dropped since they never reach the matrix.
    pub fn overlapping(class: &BoundaryClass, reg: f64) -> Self {
        let mut stencil = Self::zero();
        for p in BOUNDARY_PREDICATES
            .iter()
            .filter(|p| p.row.holds(class.row) && p.col.holds(class.col))
        {
            stencil.coeffs[Direction::Center.slot()] += p.center * reg;
            for (dir, active) in [
                (Direction::Top, p.top),
                (Direction::Bottom, p.bottom),
                (Direction::Left, p.left),
                (Direction::Right, p.right),
            ] {
                if active && class.has_neighbor(dir) {
                    stencil.coeffs[dir.slot()] -= 2.0 * reg;
                }
            }
        }
        stencil
    }

    /// Add the data-fidelity curvature `2·weight` to the centre.
    pub fn with_fidelity(mut self, weight: f64) -> Self {
        self.coeffs[Direction::Center.slot()] += 2.0 * weight;
        self
    }

    pub fn get(&self, dir: Direction) -> f64 {
        self.coeffs[dir.slot()]
    }

    pub fn center(&self) -> f64 {
        self.get(Direction::Center)
    }

    /// Sum of all non-centre coefficients.
    pub fn neighbor_sum(&self) -> f64 {
        self.coeffs[1..].iter().sum()
    }
}
