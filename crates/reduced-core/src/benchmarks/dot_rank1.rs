//! Rank-1 update benchmark

use super::{data_mut, gb, Benchmark, F64_BYTES};
use crate::buffer::Buffer;
use crate::error::Result;
use crate::ops::linalg;
use crate::problem::ProblemSize;
use crate::verify::Scaled;
use crate::{init, oracle};
use reduced_backends::Backend;

#[derive(Debug)]
struct Rank1Data {
    r: Buffer<f64>,
    d: Buffer<f64>,
    dp: Buffer<f64>,
}

/// `dp = d + (r·r)·r`, a reduction feeding an elementwise update.
///
/// The reported result is `dp[N-1]`; every element holds the same value.
#[derive(Debug)]
pub struct DotRank1Bench {
    size: ProblemSize,
    data: Option<Rank1Data>,
}

impl DotRank1Bench {
    pub fn new(size: ProblemSize) -> Self {
        Self { size, data: None }
    }
}

impl Benchmark for DotRank1Bench {
    type Output = Scaled;

    fn name(&self) -> &'static str {
        "dot_rank1"
    }

    fn title(&self) -> &'static str {
        "Dot Rank-1 Update"
    }

    fn setup<B: Backend>(&mut self, backend: &B) -> Result<()> {
        let (r, d) = init::rank1_inputs(backend, self.size);
        let dp = Buffer::zeroed(self.size.get());
        self.data = Some(Rank1Data { r, d, dp });
        Ok(())
    }

    fn run<B: Backend>(&mut self, backend: &B) -> Result<Scaled> {
        let Rank1Data { r, d, dp } = data_mut(&mut self.data, "dot_rank1")?;
        linalg::dot_rank1(backend, r, d, dp)?;
        Ok(Scaled(dp.as_slice().last().copied().unwrap_or_default()))
    }

    /// `norm2` is summed from rounded `r[i]²` terms, so the closed form is
    /// matched to within ulps of the result rather than absolutely.
    fn expect(&self) -> Scaled {
        Scaled(oracle::dot_rank1(self.size))
    }

    fn teardown(&mut self) {
        self.data = None;
    }

    /// Reads `r` twice, `d` once, writes `dp`
    fn gigabytes(&self) -> f64 {
        gb(F64_BYTES * 4.0 * self.size.as_f64())
    }
}
