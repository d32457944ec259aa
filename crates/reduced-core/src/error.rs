//! Error types for reduced-core operations

use reduced_backends::BackendError;

/// Result type for reduced-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running a benchmark
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Problem sizes must be at least one element
    #[error("Invalid problem size: {0} (must be at least 1)")]
    InvalidProblemSize(usize),

    /// A size literal such as `1.5k` could not be parsed
    #[error("Invalid size literal '{literal}': {reason}")]
    InvalidSizeLiteral { literal: String, reason: String },

    /// Benchmark name not recognised
    #[error("Invalid benchmark: {0}")]
    UnknownBenchmark(String),

    /// Benchmark needs more (or fewer) problem sizes than were given
    #[error("Missing problem size: {benchmark} takes {expected} size argument(s), got {given}")]
    MissingProblemSize {
        benchmark: &'static str,
        expected: usize,
        given: usize,
    },

    /// `run()` called before `setup()` or after `teardown()`
    #[error("Benchmark {0} has no data: call setup() before run()")]
    NotSetUp(&'static str),

    /// Input buffers disagree in length
    #[error("Buffer size mismatch: expected {expected}, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Backend construction or launch failure
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Invalid run configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create an invalid size literal error
    pub fn size_literal(literal: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSizeLiteral {
            literal: literal.into(),
            reason: reason.into(),
        }
    }

    /// Fail unless `actual == expected`
    pub(crate) fn check_len(expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::BufferSizeMismatch { expected, actual })
        }
    }
}
