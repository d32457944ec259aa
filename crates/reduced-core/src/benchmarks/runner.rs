//! Benchmark driver
//!
//! [`run_benchmark`] executes one benchmark through its full lifecycle on a
//! given execution provider:
//!
//! 1. construct the instance from the problem sizes
//! 2. `setup()` the inputs
//! 3. `run()` `iterations` times, checking each result against the expectation
//! 4. `teardown()`
//!
//! Each phase is timed separately. Run and verify times are accumulated per
//! iteration, so verification never counts towards the bandwidth figure and
//! results do not have to be buffered.

use super::{
    Benchmark, ComplexMinBench, ComplexSumBench, ComplexSumSoaBench, DescribeBench, DotBench, DotRank1Bench,
    FieldSummaryBench, HistogramBench, InfNormBench, MatvecGroupBench, MatvecInnerProductBench,
};
use crate::error::{Error, Result};
use crate::instrumentation::{BenchmarkMetrics, PhaseTimings};
use crate::problem::{MatrixShape, ProblemSize};
use crate::verify::{VerificationReport, Verifier};
use reduced_backends::Backend;
use reduced_tracing::performance::record_bandwidth;
use reduced_tracing::timed_block;
use std::fmt;
use std::str::FromStr;

/// Every benchmark the driver knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BenchmarkKind {
    Dot,
    ComplexSum,
    ComplexSumSoa,
    ComplexMin,
    FieldSummary,
    Describe,
    MatvecInnerProduct,
    Histogram,
    InfNorm,
    MatvecGroup,
    DotRank1,
}

impl BenchmarkKind {
    pub const ALL: [BenchmarkKind; 11] = [
        BenchmarkKind::Dot,
        BenchmarkKind::ComplexSum,
        BenchmarkKind::ComplexSumSoa,
        BenchmarkKind::ComplexMin,
        BenchmarkKind::FieldSummary,
        BenchmarkKind::Describe,
        BenchmarkKind::MatvecInnerProduct,
        BenchmarkKind::Histogram,
        BenchmarkKind::InfNorm,
        BenchmarkKind::MatvecGroup,
        BenchmarkKind::DotRank1,
    ];

    /// Name accepted on the command line
    pub const fn as_str(&self) -> &'static str {
        match self {
            BenchmarkKind::Dot => "dot",
            BenchmarkKind::ComplexSum => "complex_sum",
            BenchmarkKind::ComplexSumSoa => "complex_sum_soa",
            BenchmarkKind::ComplexMin => "complex_min",
            BenchmarkKind::FieldSummary => "field_summary",
            BenchmarkKind::Describe => "describe",
            BenchmarkKind::MatvecInnerProduct => "matvec_inner_product",
            BenchmarkKind::Histogram => "histogram",
            BenchmarkKind::InfNorm => "inf_norm",
            BenchmarkKind::MatvecGroup => "matvec_group",
            BenchmarkKind::DotRank1 => "dot_rank1",
        }
    }

    /// Number of size arguments: 0 for the fixed grid, 2 for matrices, 1 otherwise
    pub const fn required_sizes(&self) -> usize {
        match self {
            BenchmarkKind::FieldSummary => 0,
            BenchmarkKind::InfNorm | BenchmarkKind::MatvecGroup | BenchmarkKind::MatvecInnerProduct => 2,
            _ => 1,
        }
    }

    /// Comma-separated list of all names, for usage messages
    pub fn names() -> String {
        Self::ALL.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for BenchmarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BenchmarkKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| Error::UnknownBenchmark(s.to_string()))
    }
}

/// Timings and verification outcome of one benchmark execution
#[derive(Debug, Clone)]
pub struct BenchmarkRun {
    pub kind: BenchmarkKind,
    pub metrics: BenchmarkMetrics,
    pub report: VerificationReport,
}

/// Run `kind` through its lifecycle with `sizes` as its size arguments.
///
/// # Errors
///
/// - [`Error::MissingProblemSize`] when `sizes` does not hold exactly
///   [`BenchmarkKind::required_sizes`] entries
/// - [`Error::InvalidConfig`] when `iterations` is zero
/// - any setup or kernel error
///
/// Verification mismatches are not errors; they are in [`BenchmarkRun::report`].
#[tracing::instrument(skip(backend, sizes), fields(backend = backend.name()))]
pub fn run_benchmark<B: Backend>(
    backend: &B,
    kind: BenchmarkKind,
    sizes: &[ProblemSize],
    iterations: usize,
) -> Result<BenchmarkRun> {
    if sizes.len() != kind.required_sizes() {
        return Err(Error::MissingProblemSize {
            benchmark: kind.as_str(),
            expected: kind.required_sizes(),
            given: sizes.len(),
        });
    }
    if iterations == 0 {
        return Err(Error::InvalidConfig("iterations must be at least 1".into()));
    }

    let matrix = || MatrixShape::from_sizes(sizes[0], sizes[1]);
    let run = match kind {
        BenchmarkKind::Dot => drive(backend, iterations, || DotBench::new(sizes[0])),
        BenchmarkKind::ComplexSum => drive(backend, iterations, || ComplexSumBench::new(sizes[0])),
        BenchmarkKind::ComplexSumSoa => drive(backend, iterations, || ComplexSumSoaBench::new(sizes[0])),
        BenchmarkKind::ComplexMin => drive(backend, iterations, || ComplexMinBench::new(sizes[0])),
        BenchmarkKind::FieldSummary => drive(backend, iterations, FieldSummaryBench::new),
        BenchmarkKind::Describe => drive(backend, iterations, || DescribeBench::new(sizes[0])),
        BenchmarkKind::Histogram => drive(backend, iterations, || HistogramBench::new(sizes[0])),
        BenchmarkKind::DotRank1 => drive(backend, iterations, || DotRank1Bench::new(sizes[0])),
        BenchmarkKind::InfNorm => {
            let shape = matrix()?;
            drive(backend, iterations, || InfNormBench::new(shape))
        }
        BenchmarkKind::MatvecGroup => {
            let shape = matrix()?;
            drive(backend, iterations, || MatvecGroupBench::new(shape))
        }
        BenchmarkKind::MatvecInnerProduct => {
            let shape = matrix()?;
            drive(backend, iterations, || MatvecInnerProductBench::new(shape))
        }
    }?;

    Ok(BenchmarkRun {
        kind,
        metrics: run.0,
        report: run.1,
    })
}

/// Construct, set up, run, verify and tear down one benchmark instance.
pub fn drive<B, T, C>(backend: &B, iterations: usize, construct: C) -> Result<(BenchmarkMetrics, VerificationReport)>
where
    B: Backend,
    T: Benchmark,
    C: FnOnce() -> T,
{
    let mut timings = PhaseTimings::default();

    let (mut bench, elapsed) = timed_block!("construct", { construct() });
    timings.construct = elapsed;

    let (setup, elapsed) = timed_block!("setup", { bench.setup(backend) });
    setup?;
    timings.setup = elapsed;
    tracing::debug!(benchmark = bench.name(), setup_ms = elapsed.as_secs_f64() * 1e3, "benchmark_setup");

    let (expected, elapsed) = timed_block!("expect", { bench.expect() });
    timings.verify = elapsed;

    let mut verifier = Verifier::new(bench.name(), expected);
    for iteration in 0..iterations {
        let (result, elapsed) = timed_block!("run", { bench.run(backend) });
        timings.run += elapsed;
        let result = result?;

        let (_, elapsed) = timed_block!("verify", { verifier.check(iteration, &result) });
        timings.verify += elapsed;
    }

    let ((), elapsed) = timed_block!("teardown", { bench.teardown() });
    timings.teardown = elapsed;

    let metrics = BenchmarkMetrics::new(bench.title(), iterations, bench.gigabytes(), timings);
    metrics.log();
    record_bandwidth(
        bench.name(),
        (metrics.gigabytes * 1e9 * iterations as f64) as u64,
        timings.run.as_micros() as u64,
    );

    let report = verifier.finish();
    if report.passed() {
        tracing::info!(benchmark = bench.name(), iterations, "benchmark_verified");
    }
    Ok((metrics, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reduced_backends::SerialBackend;

    fn size(n: usize) -> ProblemSize {
        ProblemSize::new(n).unwrap()
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in BenchmarkKind::ALL {
            assert_eq!(kind.as_str().parse::<BenchmarkKind>().unwrap(), kind);
        }
        assert!(matches!(
            "dott".parse::<BenchmarkKind>(),
            Err(Error::UnknownBenchmark(name)) if name == "dott"
        ));
        assert!(BenchmarkKind::names().starts_with("dot, complex_sum"));
    }

    #[test]
    fn test_required_sizes() {
        assert_eq!(BenchmarkKind::FieldSummary.required_sizes(), 0);
        assert_eq!(BenchmarkKind::Dot.required_sizes(), 1);
        assert_eq!(BenchmarkKind::MatvecInnerProduct.required_sizes(), 2);
    }

    #[test]
    fn test_wrong_size_count() {
        let backend = SerialBackend::new();
        let err = run_benchmark(&backend, BenchmarkKind::InfNorm, &[size(4)], 1).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingProblemSize {
                benchmark: "inf_norm",
                expected: 2,
                given: 1
            }
        ));
        assert!(run_benchmark(&backend, BenchmarkKind::Dot, &[], 1).is_err());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let backend = SerialBackend::new();
        assert!(matches!(
            run_benchmark(&backend, BenchmarkKind::Dot, &[size(4)], 0),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_run_dot_verifies() {
        let backend = SerialBackend::new();
        let run = run_benchmark(&backend, BenchmarkKind::Dot, &[size(1000)], 10).unwrap();
        assert!(run.report.passed());
        assert_eq!(run.report.checked, 10);
        assert_eq!(run.metrics.iterations, 10);
        assert_eq!(run.metrics.title, "Dot Product");
    }

    #[test]
    fn test_run_matrix_benchmark() {
        let backend = SerialBackend::new();
        let run = run_benchmark(&backend, BenchmarkKind::MatvecGroup, &[size(8), size(100)], 3).unwrap();
        assert!(run.report.passed());
        assert_eq!(run.kind, BenchmarkKind::MatvecGroup);
    }
}
