//! Dot product benchmark

use super::{data, gb, Benchmark, F64_BYTES};
use crate::buffer::Buffer;
use crate::error::Result;
use crate::problem::ProblemSize;
use crate::{init, oracle, ops::reduce};
use reduced_backends::Backend;

/// `Σ A[i]·B[i]` with `A = 1024/N`, `B = 2048/N`
#[derive(Debug)]
pub struct DotBench {
    size: ProblemSize,
    inputs: Option<(Buffer<f64>, Buffer<f64>)>,
}

impl DotBench {
    pub fn new(size: ProblemSize) -> Self {
        Self { size, inputs: None }
    }
}

impl Benchmark for DotBench {
    type Output = f64;

    fn name(&self) -> &'static str {
        "dot"
    }

    fn title(&self) -> &'static str {
        "Dot Product"
    }

    fn setup<B: Backend>(&mut self, backend: &B) -> Result<()> {
        self.inputs = Some(init::dot_inputs(backend, self.size));
        Ok(())
    }

    fn run<B: Backend>(&mut self, backend: &B) -> Result<f64> {
        let (a, b) = data(&self.inputs, self.name())?;
        reduce::dot(backend, a, b)
    }

    fn expect(&self) -> f64 {
        oracle::dot(self.size)
    }

    fn teardown(&mut self) {
        self.inputs = None;
    }

    fn gigabytes(&self) -> f64 {
        gb(F64_BYTES * 2.0 * self.size.as_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::verify::Verifiable;
    use reduced_backends::SerialBackend;

    #[test]
    fn test_lifecycle() {
        let backend = SerialBackend::new();
        let mut bench = DotBench::new(ProblemSize::new(1000).unwrap());
        assert!(matches!(bench.run(&backend), Err(Error::NotSetUp("dot"))));

        bench.setup(&backend).unwrap();
        let result = bench.run(&backend).unwrap();
        assert!(bench.expect().first_mismatch(&result).is_none());

        bench.teardown();
        assert!(bench.run(&backend).is_err());
    }

    #[test]
    fn test_gigabytes() {
        let bench = DotBench::new(ProblemSize::new(1_000_000).unwrap());
        assert!((bench.gigabytes() - 0.016).abs() < 1e-15);
    }
}
