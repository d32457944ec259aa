//! Backend implementations for different execution targets
//!
//! This module contains:
//! - `cpu` - rayon thread-pool backend
//! - `serial` - sequential reference backend
//!
//! Offload targets are recognised by [`BackendType`] so that configuration can
//! name them, but constructing one fails with [`BackendError::Unavailable`].

pub mod cpu;
pub mod serial;

pub use cpu::CpuBackend;
pub use serial::SerialBackend;

use crate::backend::{Backend, GroupContext, LaunchConfig};
use crate::error::{BackendError, Result};
use std::fmt;
use std::str::FromStr;

/// Backend type for backend construction
///
/// Specifies which execution provider reductions run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendType {
    /// Rayon thread pool (always available)
    #[default]
    Cpu,
    /// Sequential reference execution (always available)
    Serial,
    /// GPU offload (not available in this build)
    Gpu,
}

impl BackendType {
    /// Lower-case name accepted by [`FromStr`]
    pub const fn as_str(&self) -> &'static str {
        match self {
            BackendType::Cpu => "cpu",
            BackendType::Serial => "serial",
            BackendType::Gpu => "gpu",
        }
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendType {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" | "rayon" => Ok(BackendType::Cpu),
            "serial" | "seq" => Ok(BackendType::Serial),
            "gpu" | "cuda" | "metal" => Ok(BackendType::Gpu),
            _ => Err(BackendError::UnknownBackend(s.to_string())),
        }
    }
}

/// Construct the backend named by `backend_type`.
///
/// `threads` sizes a dedicated pool for the CPU backend; `None` uses the
/// global rayon pool. The serial backend ignores it.
///
/// # Example
///
/// ```rust
/// use reduced_backends::{create_backend, Backend, BackendType};
///
/// let backend = create_backend(BackendType::Serial, None).unwrap();
/// assert_eq!(backend.name(), "serial");
///
/// assert!(create_backend(BackendType::Gpu, None).is_err());
/// ```
pub fn create_backend(backend_type: BackendType, threads: Option<usize>) -> Result<AnyBackend> {
    let backend = match backend_type {
        BackendType::Cpu => match threads {
            Some(threads) => AnyBackend::Cpu(CpuBackend::with_threads(threads)?),
            None => AnyBackend::Cpu(CpuBackend::new()),
        },
        BackendType::Serial => AnyBackend::Serial(SerialBackend::new()),
        BackendType::Gpu => {
            return Err(BackendError::unavailable(
                "GPU offload is not supported by this build; use 'cpu' or 'serial'",
            ))
        }
    };

    tracing::info!(
        backend = backend.name(),
        concurrency = backend.concurrency(),
        "backend_created"
    );
    Ok(backend)
}

/// A backend chosen at runtime
///
/// The [`Backend`] trait has generic methods and so cannot be used as a trait
/// object; this enum forwards every call to the selected implementation.
#[derive(Debug, Clone)]
pub enum AnyBackend {
    Cpu(CpuBackend),
    Serial(SerialBackend),
}

impl AnyBackend {
    /// Which implementation is selected
    pub fn backend_type(&self) -> BackendType {
        match self {
            AnyBackend::Cpu(_) => BackendType::Cpu,
            AnyBackend::Serial(_) => BackendType::Serial,
        }
    }
}

impl fmt::Display for AnyBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyBackend::Cpu(cpu) if cpu.has_dedicated_pool() => {
                write!(f, "cpu (rayon, {} dedicated threads)", cpu.concurrency())
            }
            AnyBackend::Cpu(cpu) => write!(f, "cpu (rayon, {} threads)", cpu.concurrency()),
            AnyBackend::Serial(_) => f.write_str("serial (sequential reference)"),
        }
    }
}

impl Backend for AnyBackend {
    fn name(&self) -> &'static str {
        match self {
            AnyBackend::Cpu(b) => b.name(),
            AnyBackend::Serial(b) => b.name(),
        }
    }

    fn concurrency(&self) -> usize {
        match self {
            AnyBackend::Cpu(b) => b.concurrency(),
            AnyBackend::Serial(b) => b.concurrency(),
        }
    }

    fn parallel_for<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        match self {
            AnyBackend::Cpu(b) => b.parallel_for(out, f),
            AnyBackend::Serial(b) => b.parallel_for(out, f),
        }
    }

    fn parallel_for_2d<T, F>(&self, out: &mut [T], nx: usize, f: F) -> Result<()>
    where
        T: Send,
        F: Fn(usize, usize) -> T + Send + Sync,
    {
        match self {
            AnyBackend::Cpu(b) => b.parallel_for_2d(out, nx, f),
            AnyBackend::Serial(b) => b.parallel_for_2d(out, nx, f),
        }
    }

    fn parallel_reduce<T, Fold, Combine>(&self, n: usize, identity: T, fold: Fold, combine: Combine) -> T
    where
        T: Clone + Send + Sync,
        Fold: Fn(T, usize) -> T + Send + Sync,
        Combine: Fn(T, T) -> T + Send + Sync,
    {
        match self {
            AnyBackend::Cpu(b) => b.parallel_reduce(n, identity, fold, combine),
            AnyBackend::Serial(b) => b.parallel_reduce(n, identity, fold, combine),
        }
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
        match self {
            AnyBackend::Cpu(b) => b.parallel_reduce_2d(nx, ny, identity, fold, combine),
            AnyBackend::Serial(b) => b.parallel_reduce_2d(nx, ny, identity, fold, combine),
        }
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
        match self {
            AnyBackend::Cpu(b) => b.group_reduce(config, out, identity, lane, combine, commit),
            AnyBackend::Serial(b) => b.group_reduce(config, out, identity, lane, combine, commit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_type_parsing() {
        assert_eq!("cpu".parse::<BackendType>().unwrap(), BackendType::Cpu);
        assert_eq!(" Serial ".parse::<BackendType>().unwrap(), BackendType::Serial);
        assert_eq!("CUDA".parse::<BackendType>().unwrap(), BackendType::Gpu);
        assert!(matches!(
            "fpga".parse::<BackendType>(),
            Err(BackendError::UnknownBackend(name)) if name == "fpga"
        ));
    }

    #[test]
    fn test_backend_type_display_round_trips() {
        for ty in [BackendType::Cpu, BackendType::Serial, BackendType::Gpu] {
            assert_eq!(ty.to_string().parse::<BackendType>().unwrap(), ty);
        }
    }

    #[test]
    fn test_create_gpu_is_unavailable() {
        assert!(matches!(
            create_backend(BackendType::Gpu, None),
            Err(BackendError::Unavailable(_))
        ));
    }

    #[test]
    fn test_create_cpu_with_threads() {
        let backend = create_backend(BackendType::Cpu, Some(2)).unwrap();
        assert_eq!(backend.backend_type(), BackendType::Cpu);
        assert_eq!(backend.concurrency(), 2);
        assert_eq!(backend.to_string(), "cpu (rayon, 2 dedicated threads)");
    }

    #[test]
    fn test_create_serial_ignores_threads() {
        let backend = create_backend(BackendType::Serial, Some(8)).unwrap();
        assert_eq!(backend.concurrency(), 1);
        assert_eq!(backend.name(), "serial");
    }
}
