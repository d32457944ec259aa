//! Benchmark lifecycle
//!
//! Each benchmark owns its input buffers and moves through
//! `new → setup → run × N → teardown`. Construction records only the problem
//! dimensions; [`Benchmark::setup`] allocates and initializes the buffers
//! through the execution provider; [`Benchmark::run`] executes one reduction
//! and returns a fresh result; [`Benchmark::teardown`] releases the buffers.
//! Calling `run` without data fails with [`crate::Error::NotSetUp`].
//!
//! [`runner`] drives the lifecycle with phase timing and verification.

pub mod complex;
pub mod describe;
pub mod dot;
pub mod dot_rank1;
pub mod field_summary;
pub mod histogram;
pub mod matrix;
pub mod runner;

pub use complex::{ComplexMinBench, ComplexSumBench, ComplexSumSoaBench};
pub use describe::DescribeBench;
pub use dot::DotBench;
pub use dot_rank1::DotRank1Bench;
pub use field_summary::FieldSummaryBench;
pub use histogram::HistogramBench;
pub use matrix::{InfNormBench, MatvecGroupBench, MatvecInnerProductBench};
pub use runner::{run_benchmark, BenchmarkKind, BenchmarkRun};

use crate::error::{Error, Result};
use crate::verify::Verifiable;
use reduced_backends::Backend;

/// Bytes per `f64`
pub(crate) const F64_BYTES: f64 = 8.0;

/// Decimal gigabytes for `bytes`
#[inline]
pub(crate) fn gb(bytes: f64) -> f64 {
    bytes * 1e-9
}

/// A self-contained reduction benchmark
pub trait Benchmark {
    /// Result of one `run()`
    type Output: Verifiable;

    /// Registry name, as accepted on the command line
    fn name(&self) -> &'static str;

    /// Report title
    fn title(&self) -> &'static str;

    /// Allocate and initialize the inputs. Calling it again replaces them.
    fn setup<B: Backend>(&mut self, backend: &B) -> Result<()>;

    /// Execute the reduction once.
    ///
    /// # Errors
    ///
    /// [`Error::NotSetUp`] before `setup()` or after `teardown()`.
    fn run<B: Backend>(&mut self, backend: &B) -> Result<Self::Output>;

    /// Closed-form expected result for the configured dimensions
    fn expect(&self) -> Self::Output;

    /// Release the inputs. Idempotent.
    fn teardown(&mut self);

    /// Decimal gigabytes read or written by one `run()`
    fn gigabytes(&self) -> f64;
}

/// Borrow benchmark data or fail with [`Error::NotSetUp`].
pub(crate) fn data<'a, T>(slot: &'a Option<T>, name: &'static str) -> Result<&'a T> {
    slot.as_ref().ok_or(Error::NotSetUp(name))
}

/// Mutable variant of [`data`]
pub(crate) fn data_mut<'a, T>(slot: &'a mut Option<T>, name: &'static str) -> Result<&'a mut T> {
    slot.as_mut().ok_or(Error::NotSetUp(name))
}
