//! Benchmark phase timings and bandwidth metrics
//!
//! A benchmark run moves through five phases:
//!
//! ```text
//! construct ─► setup ─► run × iterations ─► verify ─► teardown
//! ```
//!
//! [`PhaseTimings`] records the wall time of each phase, and
//! [`BenchmarkMetrics`] turns the accumulated run time into a sustained
//! bandwidth figure. Both log through `tracing`; the `Display` impl of
//! [`BenchmarkMetrics`] renders the human-readable report printed by the CLI,
//! and [`MetricsRecord`] is its machine-readable form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Wall time spent in each lifecycle phase
///
/// `run` and `verify` are totals over all iterations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseTimings {
    pub construct: Duration,
    pub setup: Duration,
    pub run: Duration,
    pub verify: Duration,
    pub teardown: Duration,
}

impl PhaseTimings {
    /// Sum of all phases
    pub fn total(&self) -> Duration {
        self.construct + self.setup + self.run + self.verify + self.teardown
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1e3
}

/// Timing and bandwidth metrics for one benchmark execution
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkMetrics {
    /// Display title, e.g. "Dot"
    pub title: &'static str,
    /// Number of timed `run()` calls
    pub iterations: usize,
    /// Decimal gigabytes moved by a single `run()`
    pub gigabytes: f64,
    pub timings: PhaseTimings,
}

impl BenchmarkMetrics {
    pub fn new(title: &'static str, iterations: usize, gigabytes: f64, timings: PhaseTimings) -> Self {
        Self {
            title,
            iterations,
            gigabytes,
            timings,
        }
    }

    /// `iterations · gigabytes / run_seconds`; 0 when the run phase took no measurable time
    pub fn sustained_gbps(&self) -> f64 {
        let secs = self.timings.run.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.iterations as f64 * self.gigabytes / secs
    }

    /// Mean wall time of a single `run()`
    pub fn mean_run(&self) -> Duration {
        match u32::try_from(self.iterations) {
            Ok(n) if n > 0 => self.timings.run / n,
            _ => Duration::ZERO,
        }
    }

    /// Log metrics via tracing
    pub fn log(&self) {
        tracing::debug!(
            benchmark = self.title,
            iterations = self.iterations,
            construct_ms = millis(self.timings.construct),
            setup_ms = millis(self.timings.setup),
            run_ms = millis(self.timings.run),
            verify_ms = millis(self.timings.verify),
            teardown_ms = millis(self.timings.teardown),
            gigabytes = self.gigabytes,
            sustained_gbps = self.sustained_gbps(),
            "benchmark_completed"
        );
    }
}

impl fmt::Display for BenchmarkMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = &self.timings;
        writeln!(f, " {}", self.title)?;
        writeln!(f, "  Constructor: {}", millis(t.construct))?;
        writeln!(f, "  Setup:       {}", millis(t.setup))?;
        writeln!(f, "  Run:         {}", millis(t.run))?;
        writeln!(f, "  Verify:      {}", millis(t.verify))?;
        writeln!(f, "  Teardown:    {}", millis(t.teardown))?;
        writeln!(f)?;
        write!(f, "  Sustained GB/s: {}", self.sustained_gbps())
    }
}

/// Flat, serializable form of [`BenchmarkMetrics`] with times in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub title: String,
    pub iterations: usize,
    pub gigabytes: f64,
    pub construct_ms: f64,
    pub setup_ms: f64,
    pub run_ms: f64,
    pub verify_ms: f64,
    pub teardown_ms: f64,
    pub sustained_gbps: f64,
}

impl From<&BenchmarkMetrics> for MetricsRecord {
    fn from(metrics: &BenchmarkMetrics) -> Self {
        let t = &metrics.timings;
        Self {
            title: metrics.title.to_string(),
            iterations: metrics.iterations,
            gigabytes: metrics.gigabytes,
            construct_ms: millis(t.construct),
            setup_ms: millis(t.setup),
            run_ms: millis(t.run),
            verify_ms: millis(t.verify),
            teardown_ms: millis(t.teardown),
            sustained_gbps: metrics.sustained_gbps(),
        }
    }
}
