//! Full-size field summary against the reference totals.
//!
//! Allocates the six 3840×3840 fields (about 700 MB), so it lives in its own
//! test binary.

use reduced_backends::CpuBackend;
use reduced_core::benchmarks::{Benchmark, FieldSummaryBench};
use reduced_core::{oracle, GridShape, Verifiable};

#[test]
fn full_grid_matches_reference_totals() {
    let backend = CpuBackend::new();
    let mut bench = FieldSummaryBench::new();
    assert_eq!(bench.shape(), GridShape::FIELD_SUMMARY);

    bench.setup(&backend).unwrap();
    for _ in 0..3 {
        let summary = bench.run(&backend).unwrap();
        assert_eq!(summary.ke, 0.0);
        assert!(
            oracle::FIELD_SUMMARY_GOLDEN.first_mismatch(&summary).is_none(),
            "{summary:?}"
        );
        assert!((summary.vol - 100.0).abs() < 1e-8);
        assert!((summary.mass - 28.0).abs() < 1e-8);
        assert!((summary.ie - 43.0).abs() < 1e-8);
        assert!((summary.press - 17.2).abs() < 1e-8);
    }
    bench.teardown();
}
