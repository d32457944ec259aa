//! Kahan–Neumaier compensated summation
//!
//! [`Compensated`] is the partial-result type every floating-point sum in the
//! kernels folds into. It carries the running sum and the low-order bits lost
//! while forming it, so that `sum + residual` tracks the exact sum of the
//! accumulated values to within a few ulps regardless of how many values were
//! added or in which order partials were merged.
//!
//! ```rust
//! use reduced_core::Compensated;
//!
//! let mut acc = Compensated::new();
//! for v in [1.0, 1e100, 1.0, -1e100] {
//!     acc.accumulate(v);
//! }
//! assert_eq!(acc.finalize(), 2.0);
//! ```

use num_complex::Complex64;

/// Running `(sum, residual)` pair for Neumaier-improved Kahan summation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Compensated {
    sum: f64,
    residual: f64,
}

impl Compensated {
    /// Empty accumulator (identity of [`merge`](Self::merge))
    pub const ZERO: Self = Self { sum: 0.0, residual: 0.0 };

    /// Fresh accumulator for one reduction pass
    pub const fn new() -> Self {
        Self::ZERO
    }

    /// Accumulator holding a single value
    pub const fn from_value(value: f64) -> Self {
        Self { sum: value, residual: 0.0 }
    }

    /// Add one value, capturing the rounding error of the addition.
    #[inline]
    pub fn accumulate(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.residual += (self.sum - t) + value;
        } else {
            self.residual += (value - t) + self.sum;
        }
        self.sum = t;
    }

    /// By-value form of [`accumulate`](Self::accumulate) for use as a fold step.
    #[inline]
    pub fn plus(mut self, value: f64) -> Self {
        self.accumulate(value);
        self
    }

    /// Combine two partials: the other sum is accumulated with compensation,
    /// then its residual is carried over.
    #[inline]
    pub fn merge(mut self, other: Self) -> Self {
        self.accumulate(other.sum);
        self.residual += other.residual;
        self
    }

    /// Compensated total, `sum + residual`
    #[inline]
    pub fn finalize(self) -> f64 {
        self.sum + self.residual
    }

    /// Uncorrected running sum
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Accumulated rounding error
    pub fn residual(&self) -> f64 {
        self.residual
    }
}

impl Extend<f64> for Compensated {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.accumulate(value);
        }
    }
}

impl FromIterator<f64> for Compensated {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        acc.extend(iter);
        acc
    }
}

/// Componentwise compensated sum of complex values
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompensatedComplex {
    re: Compensated,
    im: Compensated,
}

impl CompensatedComplex {
    pub const ZERO: Self = Self {
        re: Compensated::ZERO,
        im: Compensated::ZERO,
    };

    pub const fn new() -> Self {
        Self::ZERO
    }

    /// Add real and imaginary parts to their own accumulators.
    #[inline]
    pub fn plus_parts(mut self, re: f64, im: f64) -> Self {
        self.re.accumulate(re);
        self.im.accumulate(im);
        self
    }

    #[inline]
    pub fn plus(self, value: Complex64) -> Self {
        self.plus_parts(value.re, value.im)
    }

    #[inline]
    pub fn merge(self, other: Self) -> Self {
        Self {
            re: self.re.merge(other.re),
            im: self.im.merge(other.im),
        }
    }

    pub fn finalize(self) -> Complex64 {
        Complex64::new(self.re.finalize(), self.im.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovers_cancelled_low_bits() {
        let acc: Compensated = [1.0, 1e100, 1.0, -1e100].into_iter().collect();
        assert_eq!(acc.finalize(), 2.0);

        // A plain sum loses both ones
        let naive: f64 = [1.0, 1e100, 1.0, -1e100].iter().sum();
        assert_eq!(naive, 0.0);
    }

    #[test]
    fn test_repeated_tenths() {
        let acc: Compensated = std::iter::repeat(0.1).take(10_000_000).collect();
        assert!((acc.finalize() - 1_000_000.0).abs() <= 1_000_000.0 * f64::EPSILON);
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let values: Vec<f64> = (1..=10_000).map(|i| 1.0 / i as f64).collect();
        let whole: Compensated = values.iter().copied().collect();

        let (left, right) = values.split_at(3_333);
        let merged = left
            .iter()
            .copied()
            .collect::<Compensated>()
            .merge(right.iter().copied().collect());

        assert!((whole.finalize() - merged.finalize()).abs() <= 2.0 * f64::EPSILON * whole.finalize());
    }

    #[test]
    fn test_zero_is_merge_identity() {
        let acc = Compensated::from_value(3.5).plus(0.25);
        assert_eq!(acc.merge(Compensated::ZERO).finalize(), 3.75);
        assert_eq!(Compensated::ZERO.merge(acc).finalize(), 3.75);
    }

    #[test]
    fn test_residual_tracks_lost_bits() {
        let mut acc = Compensated::from_value(1.0);
        acc.accumulate(f64::EPSILON / 4.0);
        assert_eq!(acc.sum(), 1.0);
        assert_eq!(acc.residual(), f64::EPSILON / 4.0);
    }

    #[test]
    fn test_complex_componentwise() {
        let total = (0..1000)
            .map(|i| Complex64::new(0.5, -(i as f64)))
            .fold(CompensatedComplex::new(), CompensatedComplex::plus)
            .finalize();
        assert_eq!(total, Complex64::new(500.0, -499_500.0));
    }
}
