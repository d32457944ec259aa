//! Global reductions over 1D and 2D index ranges
//!
//! Every kernel in this module folds its input into a partial-result type
//! through [`Backend::parallel_reduce`] (or `_2d`) and joins partials with an
//! explicit combine function. Floating-point sums use [`Compensated`]
//! partials so the result does not depend on how the backend split the range.
//!
//! | Kernel | Partial | Combine |
//! |---|---|---|
//! | [`dot`] | `Compensated` | compensated merge |
//! | [`complex_sum`], [`complex_sum_soa`] | `CompensatedComplex` | componentwise merge |
//! | [`complex_min`] | `Complex64` | [`min_magnitude`] |
//! | [`describe`] | mean/min/max, then `Compensated` | two separate passes |
//! | [`field_summary`] | [`FieldAccumulator`] | [`FieldAccumulator::merge`] |
//! | [`histogram`] | `[u64; 16]` | bin-wise add |
//!
//! # Example
//!
//! ```rust
//! use reduced_backends::CpuBackend;
//! use reduced_core::{init, ops::reduce, ProblemSize};
//!
//! # fn main() -> reduced_core::Result<()> {
//! let backend = CpuBackend::new();
//! let n = ProblemSize::new(1024)?;
//! let (a, b) = init::dot_inputs(&backend, n);
//!
//! let result = reduce::dot(&backend, &a, &b)?;
//! assert!((result - 2048.0).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```

use crate::buffer::Buffer;
use crate::compensated::{Compensated, CompensatedComplex};
use crate::error::{Error, Result};
use crate::init::{FieldState, HISTOGRAM_BINS};
use crate::problem::GridShape;
use num_complex::Complex64;
use reduced_backends::Backend;

// ============================================================================
// Result Types
// ============================================================================

/// Descriptive statistics of a series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Description {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Totals over a 2D hydrodynamics field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSummary {
    pub vol: f64,
    pub mass: f64,
    /// Internal energy
    pub ie: f64,
    /// Kinetic energy
    pub ke: f64,
    pub press: f64,
}

/// Bucket counts of a 16-bin histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Histogram {
    pub bins: [u64; HISTOGRAM_BINS],
}

impl Histogram {
    /// Count in bucket `bin` (0 for out-of-range buckets)
    pub fn bin(&self, bin: usize) -> u64 {
        self.bins.get(bin).copied().unwrap_or(0)
    }

    /// Sum of all bucket counts
    pub fn total(&self) -> u64 {
        self.bins.iter().sum()
    }
}

// ============================================================================
// Combine Functions
// ============================================================================

/// Identity of [`min_magnitude`]: larger in magnitude than any finite value
pub const COMPLEX_MIN_IDENTITY: Complex64 = Complex64::new(f64::MAX, f64::MAX);

/// Keep whichever operand has the smaller magnitude; the left one on a tie.
#[inline]
pub fn min_magnitude(a: Complex64, b: Complex64) -> Complex64 {
    if b.norm() < a.norm() {
        b
    } else {
        a
    }
}

/// Bin-wise sum of two private histograms
#[inline]
pub fn merge_bins(mut a: [u64; HISTOGRAM_BINS], b: [u64; HISTOGRAM_BINS]) -> [u64; HISTOGRAM_BINS] {
    for (x, y) in a.iter_mut().zip(b) {
        *x += y;
    }
    a
}

// ============================================================================
// Scalar and Complex Reductions
// ============================================================================

/// Dot product: `Σ a[i]·b[i]`
///
/// # Arguments
///
/// * `backend` - Execution provider
/// * `a`, `b` - Input buffers of equal length
///
/// # Errors
///
/// [`Error::BufferSizeMismatch`] when the buffers differ in length.
#[tracing::instrument(skip_all, fields(n = a.len()))]
pub fn dot<B: Backend>(backend: &B, a: &Buffer<f64>, b: &Buffer<f64>) -> Result<f64> {
    Error::check_len(a.len(), b.len())?;
    let (a, b) = (a.as_slice(), b.as_slice());

    let sum = backend.parallel_reduce(
        a.len(),
        Compensated::ZERO,
        |acc, i| acc.plus(a[i] * b[i]),
        Compensated::merge,
    );
    Ok(sum.finalize())
}

/// Componentwise complex sum over interleaved storage: `Σ c[i]`
#[tracing::instrument(skip_all, fields(n = c.len()))]
pub fn complex_sum<B: Backend>(backend: &B, c: &Buffer<Complex64>) -> Result<Complex64> {
    let c = c.as_slice();
    let sum = backend.parallel_reduce(
        c.len(),
        CompensatedComplex::ZERO,
        |acc, i| acc.plus(c[i]),
        CompensatedComplex::merge,
    );
    Ok(sum.finalize())
}

/// Complex sum over split storage
///
/// The real and imaginary buffers are reduced independently in a single pass
/// and returned as `(Σ re, Σ im)`.
#[tracing::instrument(skip_all, fields(n = re.len()))]
pub fn complex_sum_soa<B: Backend>(backend: &B, re: &Buffer<f64>, im: &Buffer<f64>) -> Result<(f64, f64)> {
    Error::check_len(re.len(), im.len())?;
    let (re, im) = (re.as_slice(), im.as_slice());

    let sum = backend.parallel_reduce(
        re.len(),
        CompensatedComplex::ZERO,
        |acc, i| acc.plus_parts(re[i], im[i]),
        CompensatedComplex::merge,
    );
    let total = sum.finalize();
    Ok((total.re, total.im))
}

/// Element of smallest magnitude.
///
/// Ties keep the left operand of each combine, so among equal-magnitude
/// values the result depends on the backend's combination order; for equal
/// values (the only ties the generated inputs contain) it does not.
#[tracing::instrument(skip_all, fields(n = c.len()))]
pub fn complex_min<B: Backend>(backend: &B, c: &Buffer<Complex64>) -> Result<Complex64> {
    let c = c.as_slice();
    Ok(backend.parallel_reduce(
        c.len(),
        COMPLEX_MIN_IDENTITY,
        |acc, i| min_magnitude(acc, c[i]),
        min_magnitude,
    ))
}

// ============================================================================
// Describe
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct MeanPass {
    mean: Compensated,
    min: f64,
    max: f64,
}

impl MeanPass {
    const IDENTITY: Self = Self {
        mean: Compensated::ZERO,
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    fn merge(self, other: Self) -> Self {
        Self {
            mean: self.mean.merge(other.mean),
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Count, mean, population standard deviation, minimum and maximum.
///
/// Two passes over the data:
///
/// 1. The mean is accumulated directly as `Σ d[i]/N` with compensated
///    summation, together with the minimum (identity `+∞`) and maximum
///    (identity `−∞`).
/// 2. With the finalised mean, `std = sqrt(Σ (d[i] − mean)²/N)`.
///
/// The second pass cannot be fused into the first because it needs the
/// finished mean.
///
/// # Errors
///
/// [`Error::InvalidProblemSize`] for an empty series.
#[tracing::instrument(skip_all, fields(n = d.len()))]
pub fn describe<B: Backend>(backend: &B, d: &Buffer<f64>) -> Result<Description> {
    let count = d.len();
    if count == 0 {
        return Err(Error::InvalidProblemSize(0));
    }
    let d = d.as_slice();
    let n = count as f64;

    let first = backend.parallel_reduce(
        count,
        MeanPass::IDENTITY,
        |mut acc, i| {
            let v = d[i];
            acc.mean.accumulate(v / n);
            acc.min = acc.min.min(v);
            acc.max = acc.max.max(v);
            acc
        },
        MeanPass::merge,
    );
    let mean = first.mean.finalize();

    let variance = backend
        .parallel_reduce(
            count,
            Compensated::ZERO,
            |acc, i| {
                let diff = d[i] - mean;
                acc.plus(diff * diff / n)
            },
            Compensated::merge,
        )
        .finalize();

    Ok(Description {
        count,
        mean,
        std: variance.sqrt(),
        min: first.min,
        max: first.max,
    })
}

// ============================================================================
// Field Summary
// ============================================================================

/// Five simultaneous compensated sums, combined as one struct
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldAccumulator {
    pub vol: Compensated,
    pub mass: Compensated,
    pub ie: Compensated,
    pub ke: Compensated,
    pub press: Compensated,
}

impl FieldAccumulator {
    pub const ZERO: Self = Self {
        vol: Compensated::ZERO,
        mass: Compensated::ZERO,
        ie: Compensated::ZERO,
        ke: Compensated::ZERO,
        press: Compensated::ZERO,
    };

    /// Field-by-field compensated merge
    pub fn merge(self, other: Self) -> Self {
        Self {
            vol: self.vol.merge(other.vol),
            mass: self.mass.merge(other.mass),
            ie: self.ie.merge(other.ie),
            ke: self.ke.merge(other.ke),
            press: self.press.merge(other.press),
        }
    }

    pub fn finalize(self) -> FieldSummary {
        FieldSummary {
            vol: self.vol.finalize(),
            mass: self.mass.finalize(),
            ie: self.ie.finalize(),
            ke: self.ke.finalize(),
            press: self.press.finalize(),
        }
    }
}

fn check_field_shapes(state: &FieldState) -> Result<()> {
    let cells = state.shape.cells();
    for grid in [&state.volume, &state.density, &state.energy, &state.pressure] {
        Error::check_len(cells, grid.as_slice().len())?;
    }
    let vertices = state.shape.padded().cells();
    for grid in [&state.xvel, &state.yvel] {
        Error::check_len(vertices, grid.as_slice().len())?;
    }
    Ok(())
}

/// Volume, mass, internal energy, kinetic energy and pressure totals.
///
/// For each cell `(j, k)`:
///
/// ```text
/// vsqrd       = Σ_{kv ∈ {k, k+1}, jv ∈ {j, j+1}} 0.25·(xvel² + yvel²)
/// cell_mass   = volume·density
/// vol        += volume
/// mass       += cell_mass
/// ie         += cell_mass·energy
/// ke         += cell_mass·0.5·vsqrd
/// press      += volume·pressure
/// ```
///
/// # Errors
///
/// [`Error::BufferSizeMismatch`] when a field does not match the grid shape.
#[tracing::instrument(skip_all, fields(grid = %state.shape))]
pub fn field_summary<B: Backend>(backend: &B, state: &FieldState) -> Result<FieldSummary> {
    check_field_shapes(state)?;
    let GridShape { nx, ny } = state.shape;

    let totals = backend.parallel_reduce_2d(
        nx,
        ny,
        FieldAccumulator::ZERO,
        |mut acc, j, k| {
            let mut vsqrd = 0.0;
            for kv in k..=k + 1 {
                for jv in j..=j + 1 {
                    let xv = *state.xvel.at(jv, kv);
                    let yv = *state.yvel.at(jv, kv);
                    vsqrd += 0.25 * (xv * xv + yv * yv);
                }
            }
            let cell_volume = *state.volume.at(j, k);
            let cell_mass = cell_volume * *state.density.at(j, k);

            acc.vol.accumulate(cell_volume);
            acc.mass.accumulate(cell_mass);
            acc.ie.accumulate(cell_mass * *state.energy.at(j, k));
            acc.ke.accumulate(cell_mass * 0.5 * vsqrd);
            acc.press.accumulate(cell_volume * *state.pressure.at(j, k));
            acc
        },
        FieldAccumulator::merge,
    );
    Ok(totals.finalize())
}

// ============================================================================
// Histogram
// ============================================================================

/// Scatter reduction into 16 buckets.
///
/// Each worker counts into a private set of bins; private bins are merged by
/// bin-wise addition, so the result is exact. Values outside `[0, 16)` are
/// not counted.
#[tracing::instrument(skip_all, fields(n = values.len()))]
pub fn histogram<B: Backend>(backend: &B, values: &Buffer<u32>) -> Result<Histogram> {
    let values = values.as_slice();
    let bins = backend.parallel_reduce(
        values.len(),
        [0u64; HISTOGRAM_BINS],
        |mut bins, i| {
            if let Some(bin) = bins.get_mut(values[i] as usize) {
                *bin += 1;
            }
            bins
        },
        merge_bins,
    );
    Ok(Histogram { bins })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init;
    use crate::problem::ProblemSize;
    use reduced_backends::{CpuBackend, SerialBackend};

    fn size(n: usize) -> ProblemSize {
        ProblemSize::new(n).unwrap()
    }

    #[test]
    fn test_dot_small() {
        let backend = SerialBackend::new();
        let a = Buffer::from(vec![1.0, 2.0, 3.0]);
        let b = Buffer::from(vec![4.0, 5.0, 6.0]);
        assert_eq!(dot(&backend, &a, &b).unwrap(), 32.0);
    }

    #[test]
    fn test_dot_rejects_mismatched_lengths() {
        let backend = SerialBackend::new();
        let a = Buffer::from(vec![1.0; 3]);
        let b = Buffer::from(vec![1.0; 4]);
        assert!(matches!(
            dot(&backend, &a, &b),
            Err(Error::BufferSizeMismatch { expected: 3, actual: 4 })
        ));
    }

    #[test]
    fn test_complex_sum_interleaved_and_split_agree() {
        let backend = CpuBackend::new();
        let n = size(4099);
        let c = init::complex_sum_input(&backend, n);
        let (re, im) = init::complex_sum_soa_inputs(&backend, n);

        let aos = complex_sum(&backend, &c).unwrap();
        let soa = complex_sum_soa(&backend, &re, &im).unwrap();
        assert!((aos.re - soa.0).abs() < 1e-12);
        assert!((aos.im - soa.1).abs() < 1e-12);
        assert!((aos.re - 2048.0).abs() < 1e-10);
    }

    #[test]
    fn test_min_magnitude_keeps_left_on_tie() {
        let a = Complex64::new(3.0, 4.0);
        let b = Complex64::new(-5.0, 0.0);
        assert_eq!(min_magnitude(a, b), a);
        assert_eq!(min_magnitude(b, a), b);
        assert_eq!(min_magnitude(a, Complex64::new(0.0, 1.0)), Complex64::new(0.0, 1.0));
        assert_eq!(min_magnitude(COMPLEX_MIN_IDENTITY, a), a);
    }

    #[test]
    fn test_complex_min_even_and_odd() {
        let backend = CpuBackend::new();
        let even = complex_min(&backend, &init::complex_min_input(&backend, size(1000))).unwrap();
        assert_eq!(even, Complex64::new(0.0, 0.0));
        let odd = complex_min(&backend, &init::complex_min_input(&backend, size(1001))).unwrap();
        assert_eq!(odd, Complex64::new(0.5, 0.5));
    }

    #[test]
    fn test_describe_five_elements() {
        let backend = SerialBackend::new();
        let d = init::describe_input(&backend, size(5));
        let r = describe(&backend, &d).unwrap();

        assert_eq!(r.count, 5);
        assert!((r.mean - 1.3).abs() < 1e-12);
        assert_eq!(r.min, 0.5);
        assert_eq!(r.max, 2.5);
        // values 2.5 1.5 0.5 0.5 1.5 around mean 1.3
        let expected_var = (1.2f64.powi(2) + 0.2f64.powi(2) * 2.0 + 0.8f64.powi(2) * 2.0) / 5.0;
        assert!((r.std - expected_var.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_describe_rejects_empty() {
        let backend = SerialBackend::new();
        let d: Buffer<f64> = Buffer::zeroed(0);
        assert!(matches!(describe(&backend, &d), Err(Error::InvalidProblemSize(0))));
    }

    #[test]
    fn test_field_summary_small_grid() {
        let backend = CpuBackend::new();
        // 10x10: dense block covers 5x2 = 10 of 100 cells, as on the full grid
        let state = init::field_summary_inputs(&backend, GridShape::new(10, 10).unwrap()).unwrap();
        let r = field_summary(&backend, &state).unwrap();

        assert!((r.vol - 100.0).abs() < 1e-8);
        assert!((r.mass - 28.0).abs() < 1e-8);
        assert!((r.ie - 43.0).abs() < 1e-8);
        assert_eq!(r.ke, 0.0);
        assert!((r.press - 17.2).abs() < 1e-8);
    }

    #[test]
    fn test_histogram_counts_and_ignores_out_of_range() {
        let backend = CpuBackend::new();
        let values = Buffer::from((0..1_000u32).map(|i| i % 20).collect::<Vec<_>>());
        let h = histogram(&backend, &values).unwrap();
        assert_eq!(h.bin(0), 50);
        assert_eq!(h.bin(15), 50);
        assert_eq!(h.bin(16), 0);
        assert_eq!(h.total(), 800);
    }

    #[test]
    fn test_merge_bins() {
        let mut a = [0u64; HISTOGRAM_BINS];
        let mut b = [0u64; HISTOGRAM_BINS];
        a[8] = 3;
        b[8] = 4;
        b[0] = 1;
        let merged = merge_bins(a, b);
        assert_eq!(merged[8], 7);
        assert_eq!(merged[0], 1);
    }
}
