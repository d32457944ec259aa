//! CPU backend implementation
//!
//! Rayon-based implementation of the [`Backend`] trait.
//!
//! # Architecture
//!
//! ```text
//! CpuBackend
//! ├── ThreadPool      - optional dedicated rayon pool (global pool otherwise)
//! ├── parallel_for    - par_iter_mut over the output slice
//! ├── parallel_reduce - fold per worker, tree reduce of partials
//! └── group_reduce    - parallel groups, nested parallel lanes
//! ```
//!
//! # Usage
//!
//! ```rust
//! use reduced_backends::{Backend, CpuBackend};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = CpuBackend::with_threads(2)?;
//! assert_eq!(backend.concurrency(), 2);
//!
//! let mut squares = vec![0u64; 8];
//! backend.parallel_for(&mut squares, |i| (i * i) as u64);
//! assert_eq!(squares[7], 49);
//! # Ok(())
//! # }
//! ```

use crate::backend::{Backend, GroupContext, LaunchConfig};
use crate::error::{BackendError, Result};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::Arc;

/// CPU backend for executing reductions on a rayon thread pool
///
/// Without an explicit thread count the backend runs on rayon's global pool.
/// With one it owns a dedicated pool that every operation is installed into.
#[derive(Clone, Default)]
pub struct CpuBackend {
    pool: Option<Arc<ThreadPool>>,
}

impl CpuBackend {
    /// Create a CPU backend on the global rayon pool
    ///
    /// # Example
    ///
    /// ```rust
    /// use reduced_backends::CpuBackend;
    ///
    /// let backend = CpuBackend::new();
    /// ```
    pub fn new() -> Self {
        Self { pool: None }
    }

    /// Create a CPU backend that owns a pool of exactly `threads` workers
    pub fn with_threads(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(BackendError::ThreadPool("thread count must be at least 1".to_string()));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|idx| format!("reduced-worker-{idx}"))
            .build()?;
        tracing::debug!(threads, "cpu_backend_pool_created");
        Ok(Self {
            pool: Some(Arc::new(pool)),
        })
    }

    /// Whether this backend owns a dedicated pool
    pub fn has_dedicated_pool(&self) -> bool {
        self.pool.is_some()
    }

    fn install<R, Op>(&self, op: Op) -> R
    where
        R: Send,
        Op: FnOnce() -> R + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

impl std::fmt::Debug for CpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuBackend")
            .field("threads", &self.concurrency())
            .field("dedicated_pool", &self.has_dedicated_pool())
            .finish()
    }
}

impl Backend for CpuBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn concurrency(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    fn parallel_for<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        self.install(|| {
            out.par_iter_mut().enumerate().for_each(|(i, slot)| *slot = f(i));
        });
    }

    fn parallel_reduce<T, Fold, Combine>(&self, n: usize, identity: T, fold: Fold, combine: Combine) -> T
    where
        T: Clone + Send + Sync,
        Fold: Fn(T, usize) -> T + Send + Sync,
        Combine: Fn(T, T) -> T + Send + Sync,
    {
        self.install(|| {
            (0..n)
                .into_par_iter()
                .fold(|| identity.clone(), &fold)
                .reduce(|| identity.clone(), &combine)
        })
    }

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
        // Rows are the unit of parallel work; each row is folded contiguously.
        self.install(|| {
            (0..ny)
                .into_par_iter()
                .map(|k| (0..nx).fold(identity.clone(), |acc, j| fold(acc, j, k)))
                .reduce(|| identity.clone(), &combine)
        })
    }

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
        Commit: Fn(T) -> R + Send + Sync,
    {
        config.validate(out.len())?;
        let group_size = config.block.total_lanes() as usize;

        tracing::trace!(
            groups = out.len(),
            group_size,
            "cpu_group_reduce"
        );

        // Groups run in parallel; lanes of a group run as nested parallel
        // tasks and are joined by rayon's tree reduce.
        self.install(|| {
            out.par_iter_mut().enumerate().for_each(|(group_id, slot)| {
                let partial = (0..group_size)
                    .into_par_iter()
                    .map(|lane_id| lane(&GroupContext::new(group_id, lane_id, group_size)))
                    .reduce(|| identity.clone(), &combine);
                *slot = commit(partial);
            });
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_backend_default_uses_global_pool() {
        let backend = CpuBackend::default();
        assert!(!backend.has_dedicated_pool());
        assert_eq!(backend.concurrency(), rayon::current_num_threads());
        assert_eq!(backend.name(), "cpu");
    }

    #[test]
    fn test_cpu_backend_dedicated_pool() {
        let backend = CpuBackend::with_threads(3).unwrap();
        assert!(backend.has_dedicated_pool());
        assert_eq!(backend.concurrency(), 3);
    }

    #[test]
    fn test_cpu_backend_rejects_zero_threads() {
        assert!(matches!(CpuBackend::with_threads(0), Err(BackendError::ThreadPool(_))));
    }

    #[test]
    fn test_parallel_for_fills_every_slot() {
        let backend = CpuBackend::with_threads(4).unwrap();
        let mut out = vec![0usize; 10_000];
        backend.parallel_for(&mut out, |i| i * 2);
        assert!(out.iter().enumerate().all(|(i, &v)| v == i * 2));
    }

    #[test]
    fn test_parallel_reduce_integer_sum() {
        let backend = CpuBackend::new();
        let total = backend.parallel_reduce(100_001, 0u64, |acc, i| acc + i as u64, |a, b| a + b);
        assert_eq!(total, 100_000 * 100_001 / 2);
    }

    #[test]
    fn test_parallel_reduce_empty_range_returns_identity() {
        let backend = CpuBackend::new();
        let max = backend.parallel_reduce(0, f64::NEG_INFINITY, |acc, i| acc.max(i as f64), f64::max);
        assert_eq!(max, f64::NEG_INFINITY);
    }

    #[test]
    fn test_parallel_reduce_2d_visits_every_cell() {
        let backend = CpuBackend::new();
        let (nx, ny) = (17, 9);
        let sum = backend.parallel_reduce_2d(nx, ny, 0u64, |acc, j, k| acc + (j + k * nx) as u64, |a, b| a + b);
        let cells = (nx * ny) as u64;
        assert_eq!(sum, cells * (cells - 1) / 2);
    }

    #[test]
    fn test_group_reduce_row_sums() {
        let backend = CpuBackend::with_threads(2).unwrap();
        let (rows, cols) = (5usize, 37usize);
        let mut out = vec![0u64; rows];
        backend
            .group_reduce(
                &LaunchConfig::groups(rows as u32, 8),
                &mut out,
                0u64,
                |ctx| ctx.strided(cols).map(|j| (ctx.group_id * cols + j) as u64).sum(),
                |a, b| a + b,
                |partial| partial,
            )
            .unwrap();

        for (row, &value) in out.iter().enumerate() {
            let expected: u64 = (0..cols).map(|j| (row * cols + j) as u64).sum();
            assert_eq!(value, expected);
        }
    }

    #[test]
    fn test_group_reduce_rejects_mismatched_output() {
        let backend = CpuBackend::new();
        let mut out = vec![0u64; 3];
        let result = backend.group_reduce(&LaunchConfig::groups(4, 8), &mut out, 0u64, |_| 1, |a, b| a + b, |p| p);
        assert!(matches!(result, Err(BackendError::SizeMismatch { .. })));
    }
}
