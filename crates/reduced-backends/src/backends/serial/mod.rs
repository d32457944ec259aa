//! Sequential reference backend
//!
//! Executes every operation on the calling thread in index order. Results
//! from the reduction kernels on this backend are the baseline the parallel
//! backends are compared against in tests.

use crate::backend::{Backend, GroupContext, LaunchConfig};
use crate::error::Result;

/// Single-threaded backend with deterministic evaluation order
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialBackend;

impl SerialBackend {
    /// Create a serial backend
    pub const fn new() -> Self {
        Self
    }
}

impl Backend for SerialBackend {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn concurrency(&self) -> usize {
        1
    }

    fn parallel_for<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = f(i);
        }
    }

    fn parallel_reduce<T, Fold, Combine>(&self, n: usize, identity: T, fold: Fold, combine: Combine) -> T
    where
        T: Clone + Send + Sync,
        Fold: Fn(T, usize) -> T + Send + Sync,
        Combine: Fn(T, T) -> T + Send + Sync,
    {
        // A single partial still goes through combine so that the join
        // operation is exercised on every backend.
        let partial = (0..n).fold(identity.clone(), fold);
        combine(identity, partial)
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

        for (group_id, slot) in out.iter_mut().enumerate() {
            let partial = (0..group_size).fold(identity.clone(), |acc, lane_id| {
                combine(acc, lane(&GroupContext::new(group_id, lane_id, group_size)))
            });
            *slot = commit(partial);
        }
        Ok(())
    }
}
