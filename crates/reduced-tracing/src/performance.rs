//! Performance-focused tracing utilities
//!
//! RAII span timers and standard events for reduction throughput and
//! memory bandwidth.
//!
//! ## Example
//!
//! ```rust
//! use reduced_tracing::performance::{PerformanceSpan, record_bandwidth};
//!
//! let span = PerformanceSpan::new("dot", Some(100));
//! // ... run the kernel ...
//! drop(span); // Logs only if duration > 100μs
//!
//! record_bandwidth("dot", 16_000_000, 2_500);
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;
use tracing::Level;

static PERF_ENABLED: AtomicBool = AtomicBool::new(true);
// u64::MAX encodes "no threshold"
static PERF_THRESHOLD_US: AtomicU64 = AtomicU64::new(u64::MAX);

/// Globally enable or disable performance span logging.
///
/// Called by [`crate::init_global_tracing`]; spans created while disabled
/// still measure time but never emit an event.
pub fn set_performance_tracing(enabled: bool, threshold_us: Option<u64>) {
    PERF_ENABLED.store(enabled, Ordering::Relaxed);
    PERF_THRESHOLD_US.store(threshold_us.unwrap_or(u64::MAX), Ordering::Relaxed);
}

/// Whether performance spans currently emit events.
pub fn performance_tracing_enabled() -> bool {
    PERF_ENABLED.load(Ordering::Relaxed)
}

fn global_threshold() -> Option<u64> {
    match PERF_THRESHOLD_US.load(Ordering::Relaxed) {
        u64::MAX => None,
        t => Some(t),
    }
}

/// RAII guard that measures span duration and conditionally logs based on threshold.
///
/// The span is timed from creation and logged on drop, but only if the
/// duration exceeds the threshold (the explicit one, else the global one).
///
/// ```rust
/// use reduced_tracing::performance::PerformanceSpan;
///
/// {
///     let _span = PerformanceSpan::new("describe_mean_pass", Some(1000));
///     // ... reduction pass ...
/// } // logged only if it took more than 1ms
/// ```
pub struct PerformanceSpan {
    threshold_us: Option<u64>,
    start_time: Instant,
    span: tracing::Span,
}

impl PerformanceSpan {
    /// Create a new performance span at debug level.
    pub fn new(span_name: impl Into<String>, threshold_us: Option<u64>) -> Self {
        Self::with_level(Level::DEBUG, span_name, threshold_us)
    }

    /// Create a new performance span at the specified tracing level.
    pub fn with_level(level: Level, span_name: impl Into<String>, threshold_us: Option<u64>) -> Self {
        let span_name = span_name.into();
        let span = match level {
            Level::TRACE => tracing::trace_span!("perf", name = %span_name),
            Level::DEBUG => tracing::debug_span!("perf", name = %span_name),
            Level::INFO => tracing::info_span!("perf", name = %span_name),
            Level::WARN => tracing::warn_span!("perf", name = %span_name),
            Level::ERROR => tracing::error_span!("perf", name = %span_name),
        };

        Self {
            threshold_us: threshold_us.or_else(global_threshold),
            start_time: Instant::now(),
            span,
        }
    }

    /// Elapsed time since span creation in microseconds.
    pub fn elapsed_us(&self) -> u64 {
        self.start_time.elapsed().as_micros() as u64
    }

    /// Enter this span's context.
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for PerformanceSpan {
    fn drop(&mut self) {
        if !performance_tracing_enabled() {
            return;
        }
        let elapsed_us = self.elapsed_us();
        if self.threshold_us.is_none_or(|t| elapsed_us >= t) {
            let _entered = self.span.enter();
            tracing::debug!(
                duration_us = elapsed_us,
                duration_ms = elapsed_us as f64 / 1000.0,
                "performance_span_complete"
            );
        }
    }
}

/// Sustained bandwidth in GB/s (decimal gigabytes) for `bytes` moved in `duration_us`.
pub fn bandwidth_gbps(bytes: u64, duration_us: u64) -> f64 {
    if duration_us == 0 {
        return 0.0;
    }
    bytes as f64 / duration_us as f64 / 1000.0
}

/// Record a memory-bandwidth event for a reduction pass.
pub fn record_bandwidth(operation: &str, bytes: u64, duration_us: u64) {
    tracing::debug!(
        event = "bandwidth",
        operation = operation,
        bytes = bytes,
        duration_us = duration_us,
        bandwidth_gbps = bandwidth_gbps(bytes, duration_us),
        "reduction_bandwidth"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_performance_span_elapsed() {
        let span = PerformanceSpan::new("elapsed", None);
        thread::sleep(Duration::from_millis(2));
        assert!(span.elapsed_us() >= 2_000);
    }

    #[test]
    fn test_performance_span_with_level() {
        let _span = PerformanceSpan::with_level(Level::INFO, "info_span", Some(10));
    }

    #[test]
    fn test_bandwidth_calculation() {
        // 2 GB in 1 second
        assert!((bandwidth_gbps(2_000_000_000, 1_000_000) - 2.0).abs() < 1e-12);
        assert_eq!(bandwidth_gbps(1024, 0), 0.0);
    }

    #[test]
    fn test_record_events_do_not_panic() {
        record_bandwidth("dot", 1 << 20, 100);
        record_bandwidth("dot", 0, 0);
    }
}
