//! Parallel execution providers for the reduction kernels
//!
//! This crate provides:
//! - **Backend Trait**: `parallel_for`, `parallel_reduce` and the
//!   group-cooperative `group_reduce`, generic over the partial-result type
//! - **CPU Backend**: rayon thread pool, global or dedicated
//! - **Serial Backend**: in-order reference execution
//! - **Backend Selection**: [`BackendType`] and [`create_backend`]
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Reduction Kernels                       │
//! │        (dot, describe, field_summary, matvec, ...)       │
//! └─────────────────────┬───────────────────────────────────┘
//!                       │  Backend trait
//!                       ▼
//!         ┌─────────────┴─────────────┬─────────────┐
//!         ▼                           ▼             ▼
//!   ┌──────────┐               ┌──────────┐   ┌──────────┐
//!   │   CPU    │               │  Serial  │   │   GPU    │
//!   │ (rayon)  │               │  (ref)   │   │ (absent) │
//!   └──────────┘               └──────────┘   └──────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use reduced_backends::{create_backend, Backend, BackendType};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = create_backend(BackendType::Cpu, Some(2))?;
//!
//! let a = vec![0.5f64; 1024];
//! let b = vec![2.0f64; 1024];
//! let dot = backend.parallel_reduce(a.len(), 0.0, |acc, i| acc + a[i] * b[i], |x, y| x + y);
//! assert_eq!(dot, 1024.0);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod backends;
pub mod error;

pub use backend::{Backend, BlockDim, GridDim, GroupContext, LaunchConfig};
pub use backends::{create_backend, AnyBackend, BackendType, CpuBackend, SerialBackend};
pub use error::{BackendError, Result};
