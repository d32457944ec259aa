//! Histogram benchmark

use super::{data, gb, Benchmark};
use crate::buffer::Buffer;
use crate::error::Result;
use crate::ops::{reduce, Histogram};
use crate::problem::ProblemSize;
use crate::{init, oracle};
use reduced_backends::Backend;

const U32_BYTES: f64 = 4.0;

/// 16-bucket histogram of `N` values all equal to 8
#[derive(Debug)]
pub struct HistogramBench {
    size: ProblemSize,
    values: Option<Buffer<u32>>,
}

impl HistogramBench {
    pub fn new(size: ProblemSize) -> Self {
        Self { size, values: None }
    }
}

impl Benchmark for HistogramBench {
    type Output = Histogram;

    fn name(&self) -> &'static str {
        "histogram"
    }

    fn title(&self) -> &'static str {
        "Histogram"
    }

    fn setup<B: Backend>(&mut self, backend: &B) -> Result<()> {
        self.values = Some(init::histogram_input(backend, self.size));
        Ok(())
    }

    fn run<B: Backend>(&mut self, backend: &B) -> Result<Histogram> {
        reduce::histogram(backend, data(&self.values, self.name())?)
    }

    fn expect(&self) -> Histogram {
        oracle::histogram(self.size)
    }

    fn teardown(&mut self) {
        self.values = None;
    }

    fn gigabytes(&self) -> f64 {
        gb(U32_BYTES * self.size.as_f64())
    }
}
