//! Convenience macros for performance tracing

/// Create a [`crate::performance::PerformanceSpan`] with optional fields.
///
/// ```rust
/// use reduced_tracing::perf_span;
///
/// {
///     let _span = perf_span!("field_summary", cells = 3840 * 3840);
///     // ... reduction ...
/// } // logs duration with fields
/// ```
#[macro_export]
macro_rules! perf_span {
    ($name:expr) => {{
        $crate::performance::PerformanceSpan::new($name, None)
    }};
    ($name:expr, $($field:tt = $value:expr),+ $(,)?) => {{
        let _span = $crate::__tracing::debug_span!(
            "perf",
            name = $name,
            $($field = $value),+
        ).entered();
        $crate::performance::PerformanceSpan::new($name, None)
    }};
}

/// Run a block and return `(result, elapsed)` as a [`std::time::Duration`].
///
/// The benchmark driver uses this to time each lifecycle phase.
///
/// ```rust
/// use reduced_tracing::timed_block;
///
/// let (sum, elapsed) = timed_block!("sum", { (1..=100).sum::<i32>() });
/// assert_eq!(sum, 5050);
/// assert!(elapsed.as_secs() < 1);
/// ```
#[macro_export]
macro_rules! timed_block {
    ($name:expr, $block:block) => {{
        let start = std::time::Instant::now();
        let result = $block;
        let elapsed = start.elapsed();
        $crate::__tracing::trace!(
            operation = $name,
            duration_us = elapsed.as_micros() as u64,
            "timed_block_complete"
        );
        (result, elapsed)
    }};
}
