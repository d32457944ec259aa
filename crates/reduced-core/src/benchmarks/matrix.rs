//! Matrix benchmarks: infinity norm and the two matrix-vector variants
//!
//! All three take two sizes, rows `N` and columns `M`.

use super::{data, data_mut, gb, Benchmark, F64_BYTES};
use crate::buffer::Buffer;
use crate::error::Result;
use crate::ops::linalg;
use crate::problem::MatrixShape;
use crate::{init, oracle};
use reduced_backends::Backend;

/// Bytes of an `N × M` matrix plus an `M` input and an `N` output vector
fn matvec_gigabytes(shape: &MatrixShape) -> f64 {
    gb(F64_BYTES * (shape.len() + shape.rows() + shape.cols()) as f64)
}

#[derive(Debug)]
struct InfNormData {
    a: Buffer<f64>,
    row_sums: Buffer<f64>,
}

/// `max_i Σ_j |A[i, j]|` of a strictly positive matrix
#[derive(Debug)]
pub struct InfNormBench {
    shape: MatrixShape,
    data: Option<InfNormData>,
}

impl InfNormBench {
    pub fn new(shape: MatrixShape) -> Self {
        Self { shape, data: None }
    }
}

impl Benchmark for InfNormBench {
    type Output = f64;

    fn name(&self) -> &'static str {
        "inf_norm"
    }

    fn title(&self) -> &'static str {
        "Infinity Norm"
    }

    fn setup<B: Backend>(&mut self, backend: &B) -> Result<()> {
        self.data = Some(InfNormData {
            a: init::inf_norm_matrix(backend, self.shape),
            row_sums: Buffer::zeroed(self.shape.rows()),
        });
        Ok(())
    }

    fn run<B: Backend>(&mut self, backend: &B) -> Result<f64> {
        let shape = self.shape;
        let InfNormData { a, row_sums } = data_mut(&mut self.data, "inf_norm")?;
        linalg::inf_norm(backend, a, &shape, row_sums)
    }

    fn expect(&self) -> f64 {
        oracle::inf_norm(self.shape)
    }

    fn teardown(&mut self) {
        self.data = None;
    }

    fn gigabytes(&self) -> f64 {
        gb(F64_BYTES * self.shape.len() as f64)
    }
}

/// `(A, x)` for both matrix-vector variants
#[derive(Debug)]
struct MatvecData {
    a: Buffer<f64>,
    x: Buffer<f64>,
}

/// Group-cooperative `r = A·x`: one group per row
#[derive(Debug)]
pub struct MatvecGroupBench {
    shape: MatrixShape,
    data: Option<MatvecData>,
}

impl MatvecGroupBench {
    pub fn new(shape: MatrixShape) -> Self {
        Self { shape, data: None }
    }
}

impl Benchmark for MatvecGroupBench {
    type Output = Vec<f64>;

    fn name(&self) -> &'static str {
        "matvec_group"
    }

    fn title(&self) -> &'static str {
        "MatVec Group"
    }

    fn setup<B: Backend>(&mut self, backend: &B) -> Result<()> {
        let (a, x) = init::matvec_inputs(backend, self.shape);
        self.data = Some(MatvecData { a, x });
        Ok(())
    }

    fn run<B: Backend>(&mut self, backend: &B) -> Result<Vec<f64>> {
        let MatvecData { a, x } = data(&self.data, self.name())?;
        let mut r = Buffer::zeroed(self.shape.rows());
        linalg::matvec_group(backend, a, x, &self.shape, &mut r)?;
        Ok(r.into_vec())
    }

    fn expect(&self) -> Vec<f64> {
        oracle::matvec(self.shape)
    }

    fn teardown(&mut self) {
        self.data = None;
    }

    fn gigabytes(&self) -> f64 {
        matvec_gigabytes(&self.shape)
    }
}

/// `r = A·x` with one flat inner product per row
#[derive(Debug)]
pub struct MatvecInnerProductBench {
    shape: MatrixShape,
    data: Option<MatvecData>,
}

impl MatvecInnerProductBench {
    pub fn new(shape: MatrixShape) -> Self {
        Self { shape, data: None }
    }
}

impl Benchmark for MatvecInnerProductBench {
    type Output = Vec<f64>;

    fn name(&self) -> &'static str {
        "matvec_inner_product"
    }

    fn title(&self) -> &'static str {
        "MatVec Inner Product"
    }

    fn setup<B: Backend>(&mut self, backend: &B) -> Result<()> {
        let (a, x) = init::matvec_inputs(backend, self.shape);
        self.data = Some(MatvecData { a, x });
        Ok(())
    }

    fn run<B: Backend>(&mut self, backend: &B) -> Result<Vec<f64>> {
        let MatvecData { a, x } = data(&self.data, self.name())?;
        let mut r = Buffer::zeroed(self.shape.rows());
        linalg::matvec_inner_product(backend, a, x, &self.shape, &mut r)?;
        Ok(r.into_vec())
    }

    fn expect(&self) -> Vec<f64> {
        oracle::matvec(self.shape)
    }

    fn teardown(&mut self) {
        self.data = None;
    }

    fn gigabytes(&self) -> f64 {
        matvec_gigabytes(&self.shape)
    }
}
