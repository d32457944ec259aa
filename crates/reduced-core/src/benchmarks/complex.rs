//! Complex sum (interleaved and split storage) and complex minimum benchmarks

use super::{data, gb, Benchmark, F64_BYTES};
use crate::buffer::Buffer;
use crate::error::Result;
use crate::problem::ProblemSize;
use crate::{init, oracle, ops::reduce};
use num_complex::Complex64;
use reduced_backends::Backend;

const COMPLEX_BYTES: f64 = 2.0 * F64_BYTES;

/// Sum of `N` interleaved complex values `2048/N + i·2048/N`
#[derive(Debug)]
pub struct ComplexSumBench {
    size: ProblemSize,
    values: Option<Buffer<Complex64>>,
}

impl ComplexSumBench {
    pub fn new(size: ProblemSize) -> Self {
        Self { size, values: None }
    }
}

impl Benchmark for ComplexSumBench {
    type Output = Complex64;

    fn name(&self) -> &'static str {
        "complex_sum"
    }

    fn title(&self) -> &'static str {
        "Complex Sum"
    }

    fn setup<B: Backend>(&mut self, backend: &B) -> Result<()> {
        self.values = Some(init::complex_sum_input(backend, self.size));
        Ok(())
    }

    fn run<B: Backend>(&mut self, backend: &B) -> Result<Complex64> {
        reduce::complex_sum(backend, data(&self.values, self.name())?)
    }

    fn expect(&self) -> Complex64 {
        oracle::complex_sum(self.size)
    }

    fn teardown(&mut self) {
        self.values = None;
    }

    fn gigabytes(&self) -> f64 {
        gb(COMPLEX_BYTES * self.size.as_f64())
    }
}

/// The same sum over split real and imaginary buffers
#[derive(Debug)]
pub struct ComplexSumSoaBench {
    size: ProblemSize,
    parts: Option<(Buffer<f64>, Buffer<f64>)>,
}

impl ComplexSumSoaBench {
    pub fn new(size: ProblemSize) -> Self {
        Self { size, parts: None }
    }
}

impl Benchmark for ComplexSumSoaBench {
    type Output = (f64, f64);

    fn name(&self) -> &'static str {
        "complex_sum_soa"
    }

    fn title(&self) -> &'static str {
        "Complex Sum SoA"
    }

    fn setup<B: Backend>(&mut self, backend: &B) -> Result<()> {
        self.parts = Some(init::complex_sum_soa_inputs(backend, self.size));
        Ok(())
    }

    fn run<B: Backend>(&mut self, backend: &B) -> Result<(f64, f64)> {
        let (re, im) = data(&self.parts, self.name())?;
        reduce::complex_sum_soa(backend, re, im)
    }

    fn expect(&self) -> (f64, f64) {
        oracle::complex_sum_soa(self.size)
    }

    fn teardown(&mut self) {
        self.parts = None;
    }

    fn gigabytes(&self) -> f64 {
        gb(F64_BYTES * 2.0 * self.size.as_f64())
    }
}

/// Smallest-magnitude element of `C[i] = v + i·v`, `v = |N/2 − i|`
#[derive(Debug)]
pub struct ComplexMinBench {
    size: ProblemSize,
    values: Option<Buffer<Complex64>>,
}

impl ComplexMinBench {
    pub fn new(size: ProblemSize) -> Self {
        Self { size, values: None }
    }
}

impl Benchmark for ComplexMinBench {
    type Output = Complex64;

    fn name(&self) -> &'static str {
        "complex_min"
    }

    fn title(&self) -> &'static str {
        "Complex Min"
    }

    fn setup<B: Backend>(&mut self, backend: &B) -> Result<()> {
        self.values = Some(init::complex_min_input(backend, self.size));
        Ok(())
    }

    fn run<B: Backend>(&mut self, backend: &B) -> Result<Complex64> {
        reduce::complex_min(backend, data(&self.values, self.name())?)
    }

    fn expect(&self) -> Complex64 {
        oracle::complex_min(self.size)
    }

    fn teardown(&mut self) {
        self.values = None;
    }

    fn gigabytes(&self) -> f64 {
        gb(COMPLEX_BYTES * self.size.as_f64())
    }
}
