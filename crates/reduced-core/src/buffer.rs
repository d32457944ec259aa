//! Owned, typed benchmark buffers
//!
//! A [`Buffer<T>`] is the storage for one input or output array of a
//! benchmark instance. It is exclusively owned by that instance, filled once
//! through the execution provider at setup, read (never written) by the
//! reduction kernels, and released when the instance tears down or is
//! dropped.
//!
//! [`Grid<T>`] adds the 2D view used by the field summary benchmark: cell
//! `(j, k)` lives at `j + k·nx`.

use crate::error::{Error, Result};
use reduced_backends::Backend;
use std::ops::Index;

/// Owned 1D buffer
///
/// # Examples
///
/// ```rust
/// use reduced_backends::SerialBackend;
/// use reduced_core::Buffer;
///
/// let backend = SerialBackend::new();
/// let buf = Buffer::from_fn(&backend, 4, |i| i as f64 * 0.5);
/// assert_eq!(buf.as_slice(), &[0.0, 0.5, 1.0, 1.5]);
/// assert_eq!(buf.size_bytes(), 32);
/// ```
#[derive(Debug, PartialEq)]
pub struct Buffer<T> {
    data: Vec<T>,
}

impl<T> Buffer<T> {
    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element size in bytes
    pub fn element_size(&self) -> usize {
        std::mem::size_of::<T>()
    }

    /// Total size in bytes
    pub fn size_bytes(&self) -> usize {
        self.len() * self.element_size()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Consume the buffer, returning its storage
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Clone + Default + Send> Buffer<T> {
    /// Allocate `len` default-initialised elements
    pub fn zeroed(len: usize) -> Self {
        Self {
            data: vec![T::default(); len],
        }
    }

    /// Allocate and fill `buf[i] = f(i)` through the execution provider.
    pub fn from_fn<B, F>(backend: &B, len: usize, f: F) -> Self
    where
        B: Backend,
        F: Fn(usize) -> T + Send + Sync,
    {
        let mut buf = Self::zeroed(len);
        backend.parallel_for(buf.as_mut_slice(), f);
        buf
    }
}

impl<T> From<Vec<T>> for Buffer<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T> Index<usize> for Buffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

/// Owned row-major 2D buffer
#[derive(Debug, PartialEq)]
pub struct Grid<T> {
    data: Buffer<T>,
    nx: usize,
    ny: usize,
}

impl<T: Clone + Default + Send> Grid<T> {
    /// Allocate an `nx × ny` grid and fill cell `(j, k)` with `f(j, k)`.
    pub fn from_fn<B, F>(backend: &B, nx: usize, ny: usize, f: F) -> Result<Self>
    where
        B: Backend,
        F: Fn(usize, usize) -> T + Send + Sync,
    {
        let len = nx
            .checked_mul(ny)
            .ok_or_else(|| Error::InvalidConfig(format!("grid {nx}x{ny} exceeds addressable memory")))?;
        let mut data = Buffer::zeroed(len);
        backend.parallel_for_2d(data.as_mut_slice(), nx, f)?;
        Ok(Self { data, nx, ny })
    }
}

impl<T> Grid<T> {
    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Cell `(j, k)`; panics when out of range, like slice indexing
    #[inline]
    pub fn at(&self, j: usize, k: usize) -> &T {
        &self.data[j + k * self.nx]
    }

    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice()
    }

    pub fn size_bytes(&self) -> usize {
        self.data.size_bytes()
    }
}
