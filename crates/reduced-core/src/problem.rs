//! Validated problem dimensions
//!
//! Every benchmark is constructed from one of these shapes; zero-sized
//! problems are rejected here so no kernel ever sees an empty range.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A positive element count `N`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProblemSize(usize);

impl ProblemSize {
    /// Validate `n >= 1`.
    ///
    /// ```rust
    /// use reduced_core::ProblemSize;
    ///
    /// assert_eq!(ProblemSize::new(1024).unwrap().get(), 1024);
    /// assert!(ProblemSize::new(0).is_err());
    /// ```
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::InvalidProblemSize(n));
        }
        Ok(Self(n))
    }

    pub const fn get(self) -> usize {
        self.0
    }

    /// `N` as a float, the form every generator and closed form uses
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    pub const fn is_even(self) -> bool {
        self.0 % 2 == 0
    }
}

impl fmt::Display for ProblemSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProblemSize {
    type Err = Error;

    /// Parse a size literal with optional SI or binary suffix (`1.5k`, `64Mi`).
    fn from_str(s: &str) -> Result<Self> {
        Self::new(crate::size::parse_size(s)?)
    }
}

impl TryFrom<usize> for ProblemSize {
    type Error = Error;

    fn try_from(n: usize) -> Result<Self> {
        Self::new(n)
    }
}

/// Row-major `rows × cols` matrix dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatrixShape {
    rows: ProblemSize,
    cols: ProblemSize,
}

impl MatrixShape {
    /// Validate both dimensions and that `rows · cols` is addressable.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let shape = Self {
            rows: ProblemSize::new(rows)?,
            cols: ProblemSize::new(cols)?,
        };
        rows.checked_mul(cols)
            .ok_or_else(|| Error::InvalidConfig(format!("matrix {rows}x{cols} exceeds addressable memory")))?;
        Ok(shape)
    }

    pub fn from_sizes(rows: ProblemSize, cols: ProblemSize) -> Result<Self> {
        Self::new(rows.get(), cols.get())
    }

    /// Number of rows `N`
    pub const fn rows(&self) -> usize {
        self.rows.get()
    }

    /// Number of columns `M`
    pub const fn cols(&self) -> usize {
        self.cols.get()
    }

    /// Total element count `N · M`
    pub const fn len(&self) -> usize {
        self.rows.get() * self.cols.get()
    }

    /// Always false; shapes are validated non-empty
    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for MatrixShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Cell dimensions of a 2D grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridShape {
    pub nx: usize,
    pub ny: usize,
}

impl GridShape {
    /// The fixed grid of the field summary benchmark
    pub const FIELD_SUMMARY: Self = Self { nx: 3840, ny: 3840 };

    pub fn new(nx: usize, ny: usize) -> Result<Self> {
        ProblemSize::new(nx)?;
        ProblemSize::new(ny)?;
        nx.checked_add(1)
            .and_then(|px| ny.checked_add(1).and_then(|py| px.checked_mul(py)))
            .ok_or_else(|| Error::InvalidConfig(format!("grid {nx}x{ny} exceeds addressable memory")))?;
        Ok(Self { nx, ny })
    }

    /// Number of cells `nx · ny`
    pub const fn cells(&self) -> usize {
        self.nx * self.ny
    }

    /// Shape of the vertex-centred velocity grid, one larger in each direction
    pub const fn padded(&self) -> Self {
        Self {
            nx: self.nx + 1,
            ny: self.ny + 1,
        }
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.nx, self.ny)
    }
}
