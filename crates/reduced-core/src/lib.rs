//! # reduced-core - Reduction Kernels and Benchmark Lifecycle
//!
//! Numerically stable reduction kernels written once against the
//! [`reduced_backends::Backend`] execution provider, with deterministic
//! inputs, closed-form expectations and a tolerance-based verifier.
//!
//! ## Architecture
//!
//! ```text
//! init ──► ops (kernels) ──► verify ◄── oracle
//!   └──────────── benchmarks (lifecycle + runner) ───────────┘
//! ```
//!
//! - **Initializer** ([`init`]): every input element is a pure function of its
//!   index and the problem size, filled in parallel through the provider.
//! - **Kernels** ([`ops`]): floating-point sums use [`Compensated`] partials,
//!   so results do not drift with the backend's split of the index range.
//! - **Oracle** ([`oracle`]): expected results from the sizes alone.
//! - **Verifier** ([`verify`]): per-field tolerance checks; mismatches are
//!   diagnostic, never fatal.
//! - **Benchmarks** ([`benchmarks`]): `new → setup → run × N → teardown`
//!   with phase timings ([`instrumentation`]).
//!
//! ## Example
//!
//! ```rust
//! use reduced_backends::CpuBackend;
//! use reduced_core::benchmarks::{run_benchmark, BenchmarkKind};
//! use reduced_core::ProblemSize;
//!
//! # fn main() -> reduced_core::Result<()> {
//! let backend = CpuBackend::new();
//! let n: ProblemSize = "4ki".parse()?;
//!
//! let run = run_benchmark(&backend, BenchmarkKind::Dot, &[n], 10)?;
//! assert!(run.report.passed());
//! println!("{}", run.metrics);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ops::reduce`] - dot, complex sum/min, describe, field summary, histogram
//! - [`ops::linalg`] - row sums, infinity norm, matrix-vector products, rank-1 update

pub mod benchmarks;
pub mod buffer;
pub mod compensated;
pub mod config;
pub mod error;
pub mod init;
pub mod instrumentation;
pub mod ops;
pub mod oracle;
pub mod problem;
pub mod size;
pub mod verify;

// Re-export primary types
pub use benchmarks::{run_benchmark, Benchmark, BenchmarkKind, BenchmarkRun};
pub use buffer::{Buffer, Grid};
pub use compensated::{Compensated, CompensatedComplex};
pub use config::RunConfig;
pub use error::{Error, Result};
pub use instrumentation::{BenchmarkMetrics, MetricsRecord, PhaseTimings};
pub use ops::{Description, FieldSummary, Histogram};
pub use problem::{GridShape, MatrixShape, ProblemSize};
pub use size::parse_size;
pub use verify::{Mismatch, Scaled, Tolerance, Verifiable, VerificationReport};

/// Version reported in the benchmark banner
pub const VERSION: &str = "0.1";
