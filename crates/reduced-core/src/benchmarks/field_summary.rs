//! 2D field summary benchmark

use super::{data, gb, Benchmark, F64_BYTES};
use crate::error::Result;
use crate::init::{self, FieldState};
use crate::ops::{reduce, FieldSummary};
use crate::oracle;
use crate::problem::GridShape;
use reduced_backends::Backend;

/// Volume/mass/energy/pressure totals over a hydrodynamics snapshot.
///
/// The benchmark always runs on the fixed 3840×3840 grid;
/// [`FieldSummaryBench::with_shape`] exists for tests and profiling.
#[derive(Debug)]
pub struct FieldSummaryBench {
    shape: GridShape,
    state: Option<FieldState>,
}

impl FieldSummaryBench {
    pub fn new() -> Self {
        Self::with_shape(GridShape::FIELD_SUMMARY)
    }

    pub fn with_shape(shape: GridShape) -> Self {
        Self { shape, state: None }
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }
}

impl Default for FieldSummaryBench {
    fn default() -> Self {
        Self::new()
    }
}

impl Benchmark for FieldSummaryBench {
    type Output = FieldSummary;

    fn name(&self) -> &'static str {
        "field_summary"
    }

    fn title(&self) -> &'static str {
        "Field Summary"
    }

    fn setup<B: Backend>(&mut self, backend: &B) -> Result<()> {
        self.state = Some(init::field_summary_inputs(backend, self.shape)?);
        Ok(())
    }

    fn run<B: Backend>(&mut self, backend: &B) -> Result<FieldSummary> {
        reduce::field_summary(backend, data(&self.state, self.name())?)
    }

    fn expect(&self) -> FieldSummary {
        oracle::field_summary(self.shape)
    }

    fn teardown(&mut self) {
        self.state = None;
    }

    /// Four cell fields plus the two vertex velocity fields
    fn gigabytes(&self) -> f64 {
        let cells = self.shape.cells() as f64;
        let vertices = self.shape.padded().cells() as f64;
        gb(F64_BYTES * (4.0 * cells + 2.0 * vertices))
    }
}
