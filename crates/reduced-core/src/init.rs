//! Deterministic input generators
//!
//! Every benchmark input is a pure function of its index and the problem
//! dimensions, chosen so that the reduction has a simple closed-form answer
//! (see [`crate::oracle`]). Values are scaled by `1/N` (or `1/M`) to keep the
//! reduced result in a comfortable floating-point range at any size.
//!
//! Buffers are filled through the execution provider so that first touch of
//! each page happens on the worker that will later reduce it.

use crate::buffer::{Buffer, Grid};
use crate::error::Result;
use crate::problem::{GridShape, MatrixShape, ProblemSize};
use num_complex::Complex64;
use reduced_backends::Backend;
use reduced_tracing::perf_span;

/// Number of histogram buckets
pub const HISTOGRAM_BINS: usize = 16;

/// Bucket every histogram input element is set to
pub const HISTOGRAM_FILL_BIN: u32 = 8;

/// Ratio of specific heats used for the field summary pressure
pub const GAMMA: f64 = 1.4;

// ============================================================================
// Element Generators
// ============================================================================

/// Distance of index `i` from the middle of an `n`-element array, `|n/2 − i|`
///
/// The "tent" shape used by `describe` and `complex_min`.
#[inline]
pub fn tent(i: usize, n: usize) -> f64 {
    (n as f64 / 2.0 - i as f64).abs()
}

/// `A[i] = 1024/N` for dot, `r[i]` for the rank-1 update
#[inline]
pub fn scaled_1024(n: usize) -> f64 {
    1024.0 / n as f64
}

/// `B[i] = 2048/N` for dot, the complex sum parts, `d[i]` for the rank-1 update
#[inline]
pub fn scaled_2048(n: usize) -> f64 {
    2.0 * 1024.0 / n as f64
}

/// Infinity-norm matrix element: `1024/M + i/N` for row `i`
#[inline]
pub fn inf_norm_element(row: usize, shape: &MatrixShape) -> f64 {
    1024.0 / shape.cols() as f64 + row as f64 / shape.rows() as f64
}

// ============================================================================
// Benchmark Inputs
// ============================================================================

/// Dot product inputs `(A, B)`
pub fn dot_inputs<B: Backend>(backend: &B, size: ProblemSize) -> (Buffer<f64>, Buffer<f64>) {
    let n = size.get();
    let a = scaled_1024(n);
    let b = scaled_2048(n);
    (Buffer::from_fn(backend, n, |_| a), Buffer::from_fn(backend, n, |_| b))
}

/// Interleaved complex values `C[i] = 2048/N + i·2048/N`
pub fn complex_sum_input<B: Backend>(backend: &B, size: ProblemSize) -> Buffer<Complex64> {
    let n = size.get();
    let v = scaled_2048(n);
    Buffer::from_fn(backend, n, |_| Complex64::new(v, v))
}

/// Split real and imaginary buffers holding the same values as [`complex_sum_input`]
pub fn complex_sum_soa_inputs<B: Backend>(backend: &B, size: ProblemSize) -> (Buffer<f64>, Buffer<f64>) {
    let n = size.get();
    let v = scaled_2048(n);
    (Buffer::from_fn(backend, n, |_| v), Buffer::from_fn(backend, n, |_| v))
}

/// `C[i] = v + i·v` with `v = |N/2 − i|`
pub fn complex_min_input<B: Backend>(backend: &B, size: ProblemSize) -> Buffer<Complex64> {
    let n = size.get();
    Buffer::from_fn(backend, n, |i| {
        let v = tent(i, n);
        Complex64::new(v, v)
    })
}

/// `D[i] = |N/2 − i|`
pub fn describe_input<B: Backend>(backend: &B, size: ProblemSize) -> Buffer<f64> {
    let n = size.get();
    Buffer::from_fn(backend, n, |i| tent(i, n))
}

/// Every element set to [`HISTOGRAM_FILL_BIN`]
pub fn histogram_input<B: Backend>(backend: &B, size: ProblemSize) -> Buffer<u32> {
    Buffer::from_fn(backend, size.get(), |_| HISTOGRAM_FILL_BIN)
}

/// Row-major `N × M` matrix with `A[i, j] = 1024/M + i/N` (strictly positive)
pub fn inf_norm_matrix<B: Backend>(backend: &B, shape: MatrixShape) -> Buffer<f64> {
    let cols = shape.cols();
    Buffer::from_fn(backend, shape.len(), |idx| inf_norm_element(idx / cols, &shape))
}

/// Matrix-vector inputs: `A[i, j] = 1024/M`, `x[j] = 2048/M`
pub fn matvec_inputs<B: Backend>(backend: &B, shape: MatrixShape) -> (Buffer<f64>, Buffer<f64>) {
    let m = shape.cols();
    let a = scaled_1024(m);
    let x = scaled_2048(m);
    (Buffer::from_fn(backend, shape.len(), |_| a), Buffer::from_fn(backend, m, |_| x))
}

/// Rank-1 update inputs `(r, d)`: `r[i] = 1024/N`, `d[i] = 2048/N`
pub fn rank1_inputs<B: Backend>(backend: &B, size: ProblemSize) -> (Buffer<f64>, Buffer<f64>) {
    dot_inputs(backend, size)
}

// ============================================================================
// Field Summary State
// ============================================================================

/// Cell- and vertex-centred fields of a 2D hydrodynamics snapshot
///
/// Cell fields are `nx × ny`; the velocity fields live on the `(nx+1) × (ny+1)`
/// vertex grid.
#[derive(Debug)]
pub struct FieldState {
    pub shape: GridShape,
    pub volume: Grid<f64>,
    pub density: Grid<f64>,
    pub energy: Grid<f64>,
    pub pressure: Grid<f64>,
    pub xvel: Grid<f64>,
    pub yvel: Grid<f64>,
}

impl FieldState {
    /// Bytes held by all six fields
    pub fn size_bytes(&self) -> usize {
        [
            &self.volume,
            &self.density,
            &self.energy,
            &self.pressure,
            &self.xvel,
            &self.yvel,
        ]
        .iter()
        .map(|g| g.size_bytes())
        .sum()
    }
}

/// Whether cell `(j, k)` lies in the dense `[0, nx/2) × [0, ny/5)` block
#[inline]
fn in_dense_block(j: usize, k: usize, shape: &GridShape) -> bool {
    j < shape.nx / 2 && k < shape.ny / 5
}

/// Initial density of cell `(j, k)`
#[inline]
pub fn initial_density(j: usize, k: usize, shape: &GridShape) -> f64 {
    if in_dense_block(j, k, shape) {
        1.0
    } else {
        0.2
    }
}

/// Initial specific internal energy of cell `(j, k)`
#[inline]
pub fn initial_energy(j: usize, k: usize, shape: &GridShape) -> f64 {
    if in_dense_block(j, k, shape) {
        2.5
    } else {
        1.0
    }
}

/// Build the field summary snapshot on a `10 × 10` domain.
///
/// `dx = 10/nx`, `dy = 10/ny`, every cell has volume `dx·dy`, pressure
/// follows the ideal-gas law `(γ − 1)·ρ·e`, and the fluid is at rest.
pub fn field_summary_inputs<B: Backend>(backend: &B, shape: GridShape) -> Result<FieldState> {
    let _span = perf_span!("field_summary_inputs", cells = shape.cells());
    let GridShape { nx, ny } = shape;
    let dx = 10.0 / nx as f64;
    let dy = 10.0 / ny as f64;
    let cell_volume = dx * dy;
    let padded = shape.padded();

    let state = FieldState {
        shape,
        volume: Grid::from_fn(backend, nx, ny, |_, _| cell_volume)?,
        density: Grid::from_fn(backend, nx, ny, |j, k| initial_density(j, k, &shape))?,
        energy: Grid::from_fn(backend, nx, ny, |j, k| initial_energy(j, k, &shape))?,
        pressure: Grid::from_fn(backend, nx, ny, |j, k| {
            (GAMMA - 1.0) * initial_density(j, k, &shape) * initial_energy(j, k, &shape)
        })?,
        xvel: Grid::from_fn(backend, padded.nx, padded.ny, |_, _| 0.0)?,
        yvel: Grid::from_fn(backend, padded.nx, padded.ny, |_, _| 0.0)?,
    };

    tracing::debug!(
        grid = %shape,
        bytes = state.size_bytes(),
        "field_summary_state_initialized"
    );
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reduced_backends::SerialBackend;

    #[test]
    fn test_tent_even_and_odd() {
        assert_eq!((0..4).map(|i| tent(i, 4)).collect::<Vec<_>>(), vec![2.0, 1.0, 0.0, 1.0]);
        assert_eq!((0..5).map(|i| tent(i, 5)).collect::<Vec<_>>(), vec![2.5, 1.5, 0.5, 0.5, 1.5]);
    }

    #[test]
    fn test_complex_min_input_minimum_position() {
        let backend = SerialBackend::new();
        let c = complex_min_input(&backend, ProblemSize::new(6).unwrap());
        assert_eq!(c[3], Complex64::new(0.0, 0.0));
        assert_eq!(c[0], Complex64::new(3.0, 3.0));
    }

    #[test]
    fn test_inf_norm_rows_are_offset() {
        let backend = SerialBackend::new();
        let shape = MatrixShape::new(4, 8).unwrap();
        let a = inf_norm_matrix(&backend, shape);
        assert_eq!(a[0], 128.0);
        assert_eq!(a[3 * 8 + 7], 128.0 + 0.75);
        assert!(a.iter().all(|&v| v > 0.0));
    }

    #[test]
    fn test_matvec_inputs_shapes() {
        let backend = SerialBackend::new();
        let (a, x) = matvec_inputs(&backend, MatrixShape::new(3, 4).unwrap());
        assert_eq!(a.len(), 12);
        assert_eq!(x.len(), 4);
        assert_eq!(a[0], 256.0);
        assert_eq!(x[3], 512.0);
    }

    #[test]
    fn test_histogram_input() {
        let h = histogram_input(&SerialBackend::new(), ProblemSize::new(10).unwrap());
        assert!(h.iter().all(|&b| b == HISTOGRAM_FILL_BIN));
    }

    #[test]
    fn test_field_state_layout() {
        let backend = SerialBackend::new();
        let shape = GridShape::new(10, 10).unwrap();
        let state = field_summary_inputs(&backend, shape).unwrap();

        assert_eq!(state.xvel.nx(), 11);
        assert_eq!(state.yvel.ny(), 11);
        // dense block is j < 5, k < 2
        assert_eq!(*state.density.at(4, 1), 1.0);
        assert_eq!(*state.density.at(5, 1), 0.2);
        assert_eq!(*state.density.at(4, 2), 0.2);
        assert_eq!(*state.energy.at(0, 0), 2.5);
        assert!((*state.pressure.at(0, 0) - 1.0).abs() < 1e-15);
        assert!((*state.pressure.at(9, 9) - 0.08).abs() < 1e-15);
        assert_eq!(*state.volume.at(3, 7), 1.0);
        assert_eq!(state.size_bytes(), 8 * (4 * 100 + 2 * 121));
    }
}
