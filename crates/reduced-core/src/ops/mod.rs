//! Reduction kernels
//!
//! All kernels are generic over a [`reduced_backends::Backend`] and never
//! branch on which backend executes them.
//!
//! - [`reduce`] - global reductions: dot, complex sum/min, describe, field summary, histogram
//! - [`linalg`] - matrix reductions: row sums, infinity norm, matrix-vector products, rank-1 update

pub mod linalg;
pub mod reduce;

pub use reduce::{Description, FieldSummary, Histogram};
