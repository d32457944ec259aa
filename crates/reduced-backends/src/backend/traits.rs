//! Backend trait for reduction execution
//!
//! This trait defines the interface that all parallel execution providers
//! implement. Kernels are written once against it and never branch on which
//! backend they run on.

use super::types::{GroupContext, LaunchConfig};
use crate::error::{BackendError, Result};

/// Parallel execution provider
///
/// Backends expose three capabilities:
///
/// ```text
/// ┌─────────────────────────────────────────────────────────┐
/// │                     Backend Trait                        │
/// │  - parallel_for / parallel_for_2d   (element-wise fill)  │
/// │  - parallel_reduce / _2d            (fold + combine)     │
/// │  - group_reduce                     (cooperative groups) │
/// └─────────────────────┬───────────────────────────────────┘
///                       │
///               ┌───────┴───────┐
///               ▼               ▼
///         ┌─────────┐     ┌─────────┐
///         │   CPU   │     │ Serial  │
///         │ (rayon) │     │  (ref)  │
///         └─────────┘     └─────────┘
/// ```
///
/// # Reduction Contract
///
/// `fold` folds one index into a partial, `combine` joins two partials. The
/// order in which indices are folded and partials are combined is unspecified;
/// callers supply an `identity` that is neutral for both operations and a
/// `combine` that is associative (to within floating-point tolerance).
///
/// # Usage
///
/// ```rust
/// use reduced_backends::{Backend, CpuBackend};
///
/// let backend = CpuBackend::new();
/// let data: Vec<f64> = (0..1000).map(|i| i as f64).collect();
///
/// let sum = backend.parallel_reduce(data.len(), 0.0, |acc, i| acc + data[i], |a, b| a + b);
/// assert_eq!(sum, 499_500.0);
/// ```
pub trait Backend: Send + Sync {
    /// Short backend name used in reports (`"cpu"`, `"serial"`)
    fn name(&self) -> &'static str;

    /// Number of workers reductions are spread across
    fn concurrency(&self) -> usize;

    /// Fill `out[i] = f(i)` for every `i` in `[0, out.len())`.
    fn parallel_for<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync;

    /// Fill a row-major `nx`-wide grid: `out[j + k·nx] = f(j, k)`.
    ///
    /// Fails when `nx` is zero or does not divide `out.len()`.
    fn parallel_for_2d<T, F>(&self, out: &mut [T], nx: usize, f: F) -> Result<()>
    where
        T: Send,
        F: Fn(usize, usize) -> T + Send + Sync,
    {
        check_grid(out.len(), nx)?;
        self.parallel_for(out, |idx| f(idx % nx, idx / nx));
        Ok(())
    }

    /// Fold every index of `[0, n)` into partials and combine them.
    fn parallel_reduce<T, Fold, Combine>(&self, n: usize, identity: T, fold: Fold, combine: Combine) -> T
    where
        T: Clone + Send + Sync,
        Fold: Fn(T, usize) -> T + Send + Sync,
        Combine: Fn(T, T) -> T + Send + Sync;

    /// Reduce over the 2D range `[0, nx) × [0, ny)`; `fold` receives `(acc, j, k)`.
    fn parallel_reduce_2d<T, Fold, Combine>(
        &self,
        nx: usize,
        ny: usize,
        identity: T,
        fold: Fold,
        combine: Combine,
    ) -> T
    where
        T: Clone + Send + Sync,
        Fold: Fn(T, usize, usize) -> T + Send + Sync,
        Combine: Fn(T, T) -> T + Send + Sync,
    {
        if nx == 0 {
            return identity;
        }
        self.parallel_reduce(nx * ny, identity, |acc, idx| fold(acc, idx % nx, idx / nx), combine)
    }

    /// Group-cooperative reduction.
    ///
    /// Runs one group per slot of `out` with `config.block.total_lanes()` lanes
    /// each. Every lane produces a private partial through `lane`, the lanes of
    /// a group are joined with `combine`, and the joined partial is committed
    /// exactly once as `out[group] = commit(partial)`. Groups are independent of each other.
    ///
    /// # Errors
    ///
    /// - [`BackendError::InvalidLaunchConfig`] when the group size is zero
    /// - [`BackendError::SizeMismatch`] when the grid does not match `out.len()`
    fn group_reduce<T, R, Lane, Combine, Commit>(
        &self,
        config: &LaunchConfig,
        out: &mut [R],
        identity: T,
        lane: Lane,
        combine: Combine,
        commit: Commit,
    ) -> Result<()>
    where
        T: Clone + Send + Sync,
        R: Send,
        Lane: Fn(&GroupContext) -> T + Send + Sync,
        Combine: Fn(T, T) -> T + Send + Sync,
        Commit: Fn(T) -> R + Send + Sync;
}

pub(crate) fn check_grid(len: usize, nx: usize) -> Result<()> {
    if nx == 0 {
        return Err(BackendError::invalid_launch("grid width must be positive"));
    }
    if len % nx != 0 {
        return Err(BackendError::SizeMismatch {
            expected: len.div_ceil(nx) * nx,
            actual: len,
        });
    }
    Ok(())
}
