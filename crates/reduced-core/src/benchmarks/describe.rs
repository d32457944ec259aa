//! Descriptive statistics benchmark

use super::{data, gb, Benchmark, F64_BYTES};
use crate::buffer::Buffer;
use crate::error::Result;
use crate::ops::{reduce, Description};
use crate::problem::ProblemSize;
use crate::{init, oracle};
use reduced_backends::Backend;

/// count/mean/std/min/max of `D[i] = |N/2 − i|`
#[derive(Debug)]
pub struct DescribeBench {
    size: ProblemSize,
    values: Option<Buffer<f64>>,
}

impl DescribeBench {
    pub fn new(size: ProblemSize) -> Self {
        Self { size, values: None }
    }
}

impl Benchmark for DescribeBench {
    type Output = Description;

    fn name(&self) -> &'static str {
        "describe"
    }

    fn title(&self) -> &'static str {
        "Describe"
    }

    fn setup<B: Backend>(&mut self, backend: &B) -> Result<()> {
        self.values = Some(init::describe_input(backend, self.size));
        Ok(())
    }

    fn run<B: Backend>(&mut self, backend: &B) -> Result<Description> {
        reduce::describe(backend, data(&self.values, self.name())?)
    }

    /// Computes the standard deviation sequentially, so this is O(N).
    fn expect(&self) -> Description {
        oracle::describe(self.size)
    }

    fn teardown(&mut self) {
        self.values = None;
    }

    /// Two passes over the input
    fn gigabytes(&self) -> f64 {
        gb(F64_BYTES * 2.0 * self.size.as_f64())
    }
}
