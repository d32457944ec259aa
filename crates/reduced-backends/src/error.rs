//! Error types for backend operations

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;

/// Errors that can occur while constructing or driving a backend
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Requested backend is not available in this build
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// Backend name could not be parsed
    #[error("unknown backend '{0}' (expected one of: cpu, serial, gpu)")]
    UnknownBackend(String),

    /// Dedicated thread pool could not be built
    #[error("thread pool construction failed: {0}")]
    ThreadPool(String),

    /// Invalid launch configuration
    #[error("invalid launch configuration: {0}")]
    InvalidLaunchConfig(String),

    /// Output slice does not match the iteration space
    #[error("size mismatch: expected {expected} elements, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

impl BackendError {
    /// Create an unavailable-backend error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an invalid launch configuration error
    pub fn invalid_launch(msg: impl Into<String>) -> Self {
        Self::InvalidLaunchConfig(msg.into())
    }
}

impl From<rayon::ThreadPoolBuildError> for BackendError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool(err.to_string())
    }
}
