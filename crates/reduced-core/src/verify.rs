//! Result verification
//!
//! Every benchmark result is compared field by field against its
//! [`crate::oracle`] expectation. A field passes when
//! `|observed − expected| ≤ tolerance`. Bounds are absolute: `100·ε` for the
//! scalar reductions, `1e-12` for the describe mean, `1e-4` for its standard
//! deviation and `1e-8` for the field summary. Complex results compare the
//! magnitude of the complex difference; split `(re, im)` results compare each
//! component on its own.
//!
//! Verification is diagnostic: a mismatch is recorded, logged with
//! `tracing::warn!`, and later results of the same benchmark are skipped.
//! It never aborts the run.

use crate::ops::{Description, FieldSummary, Histogram};
use num_complex::Complex64;
use std::fmt;

/// Bound used for most floating-point fields: `100·ε`
pub const MACHINE_TOLERANCE: f64 = 100.0 * f64::EPSILON;

/// Acceptable distance between an observed and an expected value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tolerance {
    /// `rel · max(1, |expected|)`
    Relative(f64),
    /// Fixed bound independent of magnitude
    Absolute(f64),
    /// Bitwise-equal values only (integer fields)
    Exact,
}

impl Tolerance {
    /// Absolute `100·ε`
    pub const MACHINE: Self = Self::Absolute(MACHINE_TOLERANCE);

    /// Largest accepted `|observed − expected|` for this expectation
    pub fn bound(&self, expected_magnitude: f64) -> f64 {
        match *self {
            Self::Relative(rel) => rel * expected_magnitude.abs().max(1.0),
            Self::Absolute(abs) => abs,
            Self::Exact => 0.0,
        }
    }

    /// Whether a difference of `difference` is within bounds. NaN never is.
    pub fn accepts(&self, expected_magnitude: f64, difference: f64) -> bool {
        difference <= self.bound(expected_magnitude)
    }
}

/// A single compared value, kept typed for reporting
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Real(f64),
    Complex(Complex64),
    Count(u64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(v) => write!(f, "{v:.17e}"),
            Self::Complex(c) => write!(f, "({:.17e}, {:.17e})", c.re, c.im),
            Self::Count(n) => write!(f, "{n}"),
        }
    }
}

/// One field that fell outside its tolerance
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMismatch {
    pub field: String,
    pub expected: Value,
    pub observed: Value,
    /// Absolute (or complex-magnitude) difference
    pub difference: f64,
}

fn check_real(field: &str, expected: f64, observed: f64, tolerance: Tolerance) -> Option<FieldMismatch> {
    let difference = (observed - expected).abs();
    let ok = match tolerance {
        Tolerance::Exact => observed == expected,
        _ => tolerance.accepts(expected, difference),
    };
    (!ok).then(|| FieldMismatch {
        field: field.to_string(),
        expected: Value::Real(expected),
        observed: Value::Real(observed),
        difference,
    })
}

fn check_complex(field: &str, expected: Complex64, observed: Complex64) -> Option<FieldMismatch> {
    let difference = (observed - expected).norm();
    (!Tolerance::MACHINE.accepts(expected.norm(), difference)).then(|| FieldMismatch {
        field: field.to_string(),
        expected: Value::Complex(expected),
        observed: Value::Complex(observed),
        difference,
    })
}

fn check_count(field: &str, expected: u64, observed: u64) -> Option<FieldMismatch> {
    (expected != observed).then(|| FieldMismatch {
        field: field.to_string(),
        expected: Value::Count(expected),
        observed: Value::Count(observed),
        difference: expected.abs_diff(observed) as f64,
    })
}

/// A reduction result that can be checked against its expectation
pub trait Verifiable {
    /// First field of `observed` outside tolerance of `self` (the expectation)
    fn first_mismatch(&self, observed: &Self) -> Option<FieldMismatch>;
}

impl Verifiable for f64 {
    fn first_mismatch(&self, observed: &Self) -> Option<FieldMismatch> {
        check_real("result", *self, *observed, Tolerance::MACHINE)
    }
}

impl Verifiable for Complex64 {
    fn first_mismatch(&self, observed: &Self) -> Option<FieldMismatch> {
        check_complex("result", *self, *observed)
    }
}

/// Split `(re, im)` results are checked one component at a time.
impl Verifiable for (f64, f64) {
    fn first_mismatch(&self, observed: &Self) -> Option<FieldMismatch> {
        check_real("re", self.0, observed.0, Tolerance::MACHINE)
            .or_else(|| check_real("im", self.1, observed.1, Tolerance::MACHINE))
    }
}

/// Scalar checked against `100·ε` scaled by the expected magnitude.
///
/// For results whose closed form rounds intermediate products differently
/// from the kernel, so the two agree only to a few ulps of the result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaled(pub f64);

impl Verifiable for Scaled {
    fn first_mismatch(&self, observed: &Self) -> Option<FieldMismatch> {
        check_real("result", self.0, observed.0, Tolerance::Relative(MACHINE_TOLERANCE))
    }
}

impl Verifiable for Description {
    fn first_mismatch(&self, observed: &Self) -> Option<FieldMismatch> {
        check_count("count", self.count as u64, observed.count as u64)
            .or_else(|| check_real("mean", self.mean, observed.mean, Tolerance::Absolute(1e-12)))
            .or_else(|| check_real("std", self.std, observed.std, Tolerance::Absolute(1e-4)))
            .or_else(|| check_real("min", self.min, observed.min, Tolerance::MACHINE))
            .or_else(|| check_real("max", self.max, observed.max, Tolerance::MACHINE))
    }
}

impl Verifiable for FieldSummary {
    fn first_mismatch(&self, observed: &Self) -> Option<FieldMismatch> {
        const TOL: Tolerance = Tolerance::Absolute(1e-8);
        check_real("vol", self.vol, observed.vol, TOL)
            .or_else(|| check_real("mass", self.mass, observed.mass, TOL))
            .or_else(|| check_real("ie", self.ie, observed.ie, TOL))
            .or_else(|| check_real("ke", self.ke, observed.ke, TOL))
            .or_else(|| check_real("press", self.press, observed.press, TOL))
    }
}

impl Verifiable for Histogram {
    fn first_mismatch(&self, observed: &Self) -> Option<FieldMismatch> {
        self.bins
            .iter()
            .zip(&observed.bins)
            .enumerate()
            .find_map(|(i, (&e, &o))| check_count(&format!("bin[{i}]"), e, o))
    }
}

/// Row results (matrix-vector products); a length mismatch is reported first.
impl Verifiable for Vec<f64> {
    fn first_mismatch(&self, observed: &Self) -> Option<FieldMismatch> {
        check_count("rows", self.len() as u64, observed.len() as u64).or_else(|| {
            self.iter()
                .zip(observed)
                .enumerate()
                .find_map(|(i, (&e, &o))| check_real(&format!("row[{i}]"), e, o, Tolerance::MACHINE))
        })
    }
}

/// A failed check, located by benchmark and iteration
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub benchmark: &'static str,
    pub iteration: usize,
    pub field: FieldMismatch,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {} result incorrect", self.benchmark, self.field.field)?;
        writeln!(f, "Result: {} (skipping rest)", self.iteration)?;
        writeln!(f, "Expected: {}", self.field.expected)?;
        writeln!(f, "Result: {}", self.field.observed)?;
        write!(f, "Difference: {:e}", self.field.difference)
    }
}

/// Outcome of verifying every run of one benchmark
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationReport {
    pub benchmark: &'static str,
    /// Results compared before stopping (all of them when nothing failed)
    pub checked: usize,
    pub mismatch: Option<Mismatch>,
}

impl VerificationReport {
    pub fn passed(&self) -> bool {
        self.mismatch.is_none()
    }
}

/// Incremental verifier for a sequence of results against one expectation.
///
/// After the first mismatch further results are ignored.
#[derive(Debug)]
pub struct Verifier<T> {
    benchmark: &'static str,
    expected: T,
    checked: usize,
    mismatch: Option<Mismatch>,
}

impl<T: Verifiable> Verifier<T> {
    pub fn new(benchmark: &'static str, expected: T) -> Self {
        Self {
            benchmark,
            expected,
            checked: 0,
            mismatch: None,
        }
    }

    /// Check the result of `iteration`. Returns `false` once verification has failed.
    pub fn check(&mut self, iteration: usize, observed: &T) -> bool {
        if self.mismatch.is_some() {
            return false;
        }
        self.checked += 1;

        match self.expected.first_mismatch(observed) {
            None => true,
            Some(field) => {
                tracing::warn!(
                    benchmark = self.benchmark,
                    iteration,
                    field = %field.field,
                    expected = %field.expected,
                    observed = %field.observed,
                    difference = field.difference,
                    "verification_mismatch"
                );
                self.mismatch = Some(Mismatch {
                    benchmark: self.benchmark,
                    iteration,
                    field,
                });
                false
            }
        }
    }

    pub fn finish(self) -> VerificationReport {
        VerificationReport {
            benchmark: self.benchmark,
            checked: self.checked,
            mismatch: self.mismatch,
        }
    }
}

/// Verify a batch of results, stopping at the first mismatch.
pub fn verify_runs<'a, T, I>(benchmark: &'static str, expected: T, results: I) -> VerificationReport
where
    T: Verifiable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut verifier = Verifier::new(benchmark, expected);
    for (iteration, observed) in results.into_iter().enumerate() {
        if !verifier.check(iteration, observed) {
            break;
        }
    }
    verifier.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerance_bounds() {
        assert_eq!(Tolerance::Absolute(1e-8).bound(1e6), 1e-8);
        assert_eq!(Tolerance::Relative(1e-3).bound(0.5), 1e-3);
        assert_eq!(Tolerance::Relative(1e-3).bound(-2000.0), 2.0);
        assert_eq!(Tolerance::Exact.bound(5.0), 0.0);
        assert!(!Tolerance::MACHINE.accepts(1.0, f64::NAN));
    }

    #[test]
    fn test_scalar_within_machine_tolerance() {
        assert!(1.0f64.first_mismatch(&(1.0 + 50.0 * f64::EPSILON)).is_none());
        assert!(0.0f64.first_mismatch(&(100.0 * f64::EPSILON)).is_none());

        let m = 2048.0f64.first_mismatch(&2049.0).unwrap();
        assert_eq!(m.field, "result");
        assert_eq!(m.difference, 1.0);
    }

    #[test]
    fn test_machine_bound_does_not_grow_with_magnitude() {
        assert_eq!(Tolerance::MACHINE.bound(2048.0), 100.0 * f64::EPSILON);
        assert!(2048.0f64.first_mismatch(&(2048.0 + 1e-12)).is_some());
        assert!(2048.0f64.first_mismatch(&2048.0).is_none());
    }

    #[test]
    fn test_scaled_scalar_allows_ulps_of_result() {
        let expected = Scaled(1.0e9);
        assert!(expected.first_mismatch(&Scaled(1.0e9 + 1e-6)).is_none());
        assert_eq!(expected.first_mismatch(&Scaled(1.0e9 + 1.0)).unwrap().field, "result");
    }

    #[test]
    fn test_infinite_observation_rejected() {
        assert!(1.0f64.first_mismatch(&f64::INFINITY).is_some());
        assert!(1.0f64.first_mismatch(&f64::NAN).is_some());
    }

    #[test]
    fn test_complex_uses_magnitude() {
        let expected = Complex64::new(3.0, 4.0);
        let m = expected.first_mismatch(&Complex64::new(3.0, 4.5)).unwrap();
        assert!((m.difference - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_split_complex_names_component() {
        let expected = (2048.0, 2048.0);
        assert!(expected.first_mismatch(&(2048.0, 2048.0)).is_none());

        let m = expected.first_mismatch(&(2048.0, 2048.5)).unwrap();
        assert_eq!(m.field, "im");
        assert_eq!(m.difference, 0.5);
        assert_eq!(expected.first_mismatch(&(2047.0, 2049.0)).unwrap().field, "re");
    }

    #[test]
    fn test_description_reports_first_bad_field() {
        let expected = Description {
            count: 5,
            mean: 1.3,
            std: 0.8,
            min: 0.5,
            max: 2.5,
        };
        let mut observed = expected;
        observed.std += 1e-6;
        assert!(expected.first_mismatch(&observed).is_none());

        observed.min = 0.0;
        observed.max = 9.0;
        assert_eq!(expected.first_mismatch(&observed).unwrap().field, "min");

        observed.count = 4;
        assert_eq!(expected.first_mismatch(&observed).unwrap().field, "count");
    }

    #[test]
    fn test_describe_mean_bound_is_absolute() {
        let expected = crate::oracle::describe(crate::ProblemSize::new(1_000_003).unwrap());
        assert!(expected.first_mismatch(&expected).is_none());

        let observed = Description {
            mean: expected.mean + 1e-9,
            ..expected
        };
        let m = expected.first_mismatch(&observed).unwrap();
        assert_eq!(m.field, "mean");
    }

    #[test]
    fn test_field_summary_ke_regression() {
        let expected = FieldSummary {
            vol: 100.0,
            mass: 28.0,
            ie: 43.0,
            ke: 0.0,
            press: 17.2,
        };
        let observed = FieldSummary { ke: 1e-6, ..expected };
        assert_eq!(expected.first_mismatch(&observed).unwrap().field, "ke");
    }

    #[test]
    fn test_histogram_exact() {
        let mut expected = Histogram::default();
        expected.bins[8] = 10;
        let mut observed = expected;
        observed.bins[8] = 9;
        observed.bins[9] = 1;
        let m = expected.first_mismatch(&observed).unwrap();
        assert_eq!(m.field, "bin[8]");
        assert_eq!(m.difference, 1.0);
    }

    #[test]
    fn test_rows_length_and_values() {
        let expected = vec![1.0, 2.0, 3.0];
        assert_eq!(expected.first_mismatch(&vec![1.0, 2.0]).unwrap().field, "rows");
        assert_eq!(expected.first_mismatch(&vec![1.0, 2.5, 3.0]).unwrap().field, "row[1]");
    }

    #[test]
    fn test_verify_runs_stops_at_first_failure() {
        let results = [1.0, 1.0, 7.0, 9.0, 1.0];
        let report = verify_runs("dot", 1.0, &results);
        assert!(!report.passed());
        assert_eq!(report.checked, 3);
        let mismatch = report.mismatch.unwrap();
        assert_eq!(mismatch.iteration, 2);

        let text = mismatch.to_string();
        assert!(text.starts_with("dot: result result incorrect"));
        assert!(text.contains("Result: 2 (skipping rest)"));
    }

    #[test]
    fn test_verify_runs_all_pass() {
        let report = verify_runs("dot", 1.0, &[1.0; 100]);
        assert!(report.passed());
        assert_eq!(report.checked, 100);
    }
}
