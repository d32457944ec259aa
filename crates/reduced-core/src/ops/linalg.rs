//! Matrix reductions: row sums, infinity norm, matrix-vector products
//!
//! Matrices are row-major `N × M` buffers described by a [`MatrixShape`].
//! The group-cooperative kernels map one group to one row: lanes stride over
//! the columns, each lane keeps a private compensated partial, and the combined
//! row value is committed once per group.
//!
//! ```text
//! row i ─┬─ lane 0: j = 0, L, 2L, ...   ─┐
//!        ├─ lane 1: j = 1, L+1, ...     ─┼─ combine ─► commit r[i]
//!        └─ lane L-1                    ─┘
//! ```

use crate::buffer::Buffer;
use crate::compensated::Compensated;
use crate::error::{Error, Result};
use crate::problem::MatrixShape;
use reduced_backends::{Backend, LaunchConfig};

/// Lanes per row group (capped by the row length)
pub const DEFAULT_GROUP_LANES: u32 = 64;

/// One group per row, `min(DEFAULT_GROUP_LANES, M)` lanes each.
pub fn row_launch_config(shape: &MatrixShape) -> Result<LaunchConfig> {
    let groups = u32::try_from(shape.rows())
        .map_err(|_| Error::InvalidConfig(format!("{} rows exceed the group launch limit", shape.rows())))?;
    let lanes = u32::try_from(shape.cols()).map_or(DEFAULT_GROUP_LANES, |cols| cols.min(DEFAULT_GROUP_LANES));
    Ok(LaunchConfig::groups(groups, lanes))
}

fn check_matrix(shape: &MatrixShape, a: &Buffer<f64>, rows_out: &Buffer<f64>) -> Result<()> {
    Error::check_len(shape.len(), a.len())?;
    Error::check_len(shape.rows(), rows_out.len())
}

/// Group-cooperative reduction of every row: `out[i] = Σ_j row_term(i, j)`.
fn group_row_reduce<B, F>(backend: &B, shape: &MatrixShape, out: &mut Buffer<f64>, row_term: F) -> Result<()>
where
    B: Backend,
    F: Fn(usize, usize) -> f64 + Send + Sync,
{
    let config = row_launch_config(shape)?;
    let cols = shape.cols();

    backend.group_reduce(
        &config,
        out.as_mut_slice(),
        Compensated::ZERO,
        |ctx| {
            ctx.strided(cols)
                .fold(Compensated::ZERO, |acc, j| acc.plus(row_term(ctx.group_id, j)))
        },
        Compensated::merge,
        Compensated::finalize,
    )?;
    Ok(())
}

/// Sum of each row of `a` into `row_sums`, one cooperative group per row.
#[tracing::instrument(skip_all, fields(shape = %shape))]
pub fn row_sums<B: Backend>(
    backend: &B,
    a: &Buffer<f64>,
    shape: &MatrixShape,
    row_sums: &mut Buffer<f64>,
) -> Result<()> {
    check_matrix(shape, a, row_sums)?;
    let (a, cols) = (a.as_slice(), shape.cols());
    group_row_reduce(backend, shape, row_sums, |i, j| a[i * cols + j])
}

/// Matrix infinity norm for a strictly positive matrix.
///
/// Two-tier reduction: a group-cooperative sum of each row (written to the
/// caller-owned `row_sums` scratch buffer), then a global maximum over the
/// row sums. The absolute value is skipped because every element is
/// positive.
///
/// # Arguments
///
/// * `backend` - Execution provider
/// * `a` - Row-major `N × M` matrix
/// * `shape` - Matrix dimensions
/// * `row_sums` - Scratch buffer of length `N`
///
/// # Errors
///
/// [`Error::BufferSizeMismatch`] when `a` or `row_sums` do not match `shape`.
#[tracing::instrument(skip_all, fields(shape = %shape))]
pub fn inf_norm<B: Backend>(
    backend: &B,
    a: &Buffer<f64>,
    shape: &MatrixShape,
    row_sums: &mut Buffer<f64>,
) -> Result<f64> {
    self::row_sums(backend, a, shape, row_sums)?;

    let sums = row_sums.as_slice();
    Ok(backend.parallel_reduce(sums.len(), f64::NEG_INFINITY, |acc, i| acc.max(sums[i]), f64::max))
}

/// Group-cooperative matrix-vector product `r = A·x`.
///
/// Each row is an independent group reduction: lanes accumulate
/// `A[i, j]·x[j]` over a strided slice of the columns, and the joined
/// partial is committed to `r[i]`.
#[tracing::instrument(skip_all, fields(shape = %shape))]
pub fn matvec_group<B: Backend>(
    backend: &B,
    a: &Buffer<f64>,
    x: &Buffer<f64>,
    shape: &MatrixShape,
    r: &mut Buffer<f64>,
) -> Result<()> {
    check_matrix(shape, a, r)?;
    Error::check_len(shape.cols(), x.len())?;

    let (a, x, cols) = (a.as_slice(), x.as_slice(), shape.cols());
    group_row_reduce(backend, shape, r, |i, j| a[i * cols + j] * x[j])
}

/// Matrix-vector product with one flat inner product per row.
///
/// Rows are distributed with a parallel-for; each row is a sequential
/// compensated dot product of the row and `x`.
#[tracing::instrument(skip_all, fields(shape = %shape))]
pub fn matvec_inner_product<B: Backend>(
    backend: &B,
    a: &Buffer<f64>,
    x: &Buffer<f64>,
    shape: &MatrixShape,
    r: &mut Buffer<f64>,
) -> Result<()> {
    check_matrix(shape, a, r)?;
    Error::check_len(shape.cols(), x.len())?;

    let (a, x, cols) = (a.as_slice(), x.as_slice(), shape.cols());
    backend.parallel_for(r.as_mut_slice(), |i| {
        a[i * cols..(i + 1) * cols]
            .iter()
            .zip(x)
            .map(|(aij, xj)| aij * xj)
            .collect::<Compensated>()
            .finalize()
    });
    Ok(())
}

/// Rank-1 update `dp = d + (r·r)·r`.
///
/// A global reduction computes `norm2 = Σ r[i]²`, then a parallel-for writes
/// `dp[i] = d[i] + norm2·r[i]`. Returns `norm2`.
#[tracing::instrument(skip_all, fields(n = r.len()))]
pub fn dot_rank1<B: Backend>(backend: &B, r: &Buffer<f64>, d: &Buffer<f64>, dp: &mut Buffer<f64>) -> Result<f64> {
    Error::check_len(r.len(), d.len())?;
    Error::check_len(r.len(), dp.len())?;
    let (r, d) = (r.as_slice(), d.as_slice());

    let norm2 = backend
        .parallel_reduce(r.len(), Compensated::ZERO, |acc, i| acc.plus(r[i] * r[i]), Compensated::merge)
        .finalize();

    backend.parallel_for(dp.as_mut_slice(), |i| d[i] + norm2 * r[i]);
    tracing::trace!(norm2, "rank1_norm");
    Ok(norm2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init;
    use crate::problem::ProblemSize;
    use reduced_backends::{CpuBackend, SerialBackend};

    #[test]
    fn test_row_launch_config_caps_lanes() {
        let wide = row_launch_config(&MatrixShape::new(10, 1000).unwrap()).unwrap();
        assert_eq!(wide.grid.x, 10);
        assert_eq!(wide.block.x, DEFAULT_GROUP_LANES);

        let narrow = row_launch_config(&MatrixShape::new(10, 3).unwrap()).unwrap();
        assert_eq!(narrow.block.x, 3);
    }

    #[test]
    fn test_row_sums_small_matrix() {
        let backend = CpuBackend::new();
        let shape = MatrixShape::new(2, 3).unwrap();
        let a = Buffer::from(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut sums = Buffer::zeroed(2);
        row_sums(&backend, &a, &shape, &mut sums).unwrap();
        assert_eq!(sums.as_slice(), &[6.0, 15.0]);
    }

    #[test]
    fn test_inf_norm_picks_largest_row() {
        let backend = SerialBackend::new();
        let shape = MatrixShape::new(3, 2).unwrap();
        let a = Buffer::from(vec![1.0, 1.0, 5.0, 0.5, 2.0, 2.0]);
        let mut sums = Buffer::zeroed(3);
        assert_eq!(inf_norm(&backend, &a, &shape, &mut sums).unwrap(), 5.5);
    }

    #[test]
    fn test_inf_norm_rejects_wrong_scratch() {
        let backend = SerialBackend::new();
        let shape = MatrixShape::new(3, 2).unwrap();
        let a = Buffer::from(vec![1.0; 6]);
        let mut sums = Buffer::zeroed(2);
        assert!(matches!(
            inf_norm(&backend, &a, &shape, &mut sums),
            Err(Error::BufferSizeMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_matvec_variants_agree() {
        let backend = CpuBackend::new();
        let shape = MatrixShape::new(17, 129).unwrap();
        let (a, x) = init::matvec_inputs(&backend, shape);
        let mut grouped = Buffer::zeroed(17);
        let mut flat = Buffer::zeroed(17);

        matvec_group(&backend, &a, &x, &shape, &mut grouped).unwrap();
        matvec_inner_product(&backend, &a, &x, &shape, &mut flat).unwrap();

        let expected = (1024.0 / 129.0) * (2048.0 / 129.0) * 129.0;
        for (g, f) in grouped.iter().zip(flat.iter()) {
            assert!((g - expected).abs() <= 1e-10);
            assert!((g - f).abs() <= 1e-10);
        }
    }

    #[test]
    fn test_matvec_rejects_short_vector() {
        let backend = SerialBackend::new();
        let shape = MatrixShape::new(2, 4).unwrap();
        let a = Buffer::from(vec![1.0; 8]);
        let x = Buffer::from(vec![1.0; 3]);
        let mut r = Buffer::zeroed(2);
        assert!(matvec_group(&backend, &a, &x, &shape, &mut r).is_err());
        assert!(matvec_inner_product(&backend, &a, &x, &shape, &mut r).is_err());
    }

    #[test]
    fn test_dot_rank1() {
        let backend = CpuBackend::new();
        let n = ProblemSize::new(1000).unwrap();
        let (r, d) = init::rank1_inputs(&backend, n);
        let mut dp = Buffer::zeroed(1000);

        let norm2 = dot_rank1(&backend, &r, &d, &mut dp).unwrap();
        assert!((norm2 - 1024.0 * 1024.0 / 1000.0).abs() < 1e-9);
        let expected = 2.048 + (1024.0 * 1024.0 / 1000.0) * 1.024;
        assert!(dp.iter().all(|v| (v - expected).abs() < 1e-9));
    }
}
