//! Run configuration
//!
//! [`RunConfig`] selects the execution provider and the number of timed
//! iterations. Values come from defaults, then the environment, then
//! explicit builder calls (the CLI applies its flags last).

use crate::error::{Error, Result};
use reduced_backends::{create_backend, AnyBackend, BackendType};
use std::env;

/// Timed `run()` calls per benchmark unless configured otherwise
pub const DEFAULT_ITERATIONS: usize = 100;

/// Benchmark run configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Timed `run()` calls per benchmark
    pub iterations: usize,
    pub backend: BackendType,
    /// Dedicated worker count for the CPU backend; `None` uses the global pool
    pub threads: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            backend: BackendType::default(),
            threads: None,
        }
    }
}

fn env_count(key: &str) -> Result<Option<usize>> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|err| Error::InvalidConfig(format!("{key}={value}: {err}"))),
        _ => Ok(None),
    }
}

impl RunConfig {
    /// Build a configuration from defaults overlaid with the environment.
    ///
    /// # Environment Variables
    ///
    /// - `REDUCED_ITERATIONS` - Timed iterations per benchmark (default 100)
    /// - `REDUCED_BACKEND` - `cpu` (default), `serial`, or `gpu`
    /// - `REDUCED_THREADS` - Dedicated CPU worker threads
    ///
    /// # Errors
    ///
    /// Malformed values are reported rather than ignored.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(iterations) = env_count("REDUCED_ITERATIONS")? {
            config.iterations = iterations;
        }
        if let Ok(backend) = env::var("REDUCED_BACKEND") {
            if !backend.trim().is_empty() {
                config.backend = backend.trim().parse()?;
            }
        }
        if let Some(threads) = env_count("REDUCED_THREADS")? {
            config.threads = Some(threads);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_backend(mut self, backend: BackendType) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Reject configurations that could never run a benchmark.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::InvalidConfig("iterations must be at least 1".into()));
        }
        if self.threads == Some(0) {
            return Err(Error::InvalidConfig("threads must be at least 1".into()));
        }
        Ok(())
    }

    /// Construct the configured execution provider.
    pub fn create_backend(&self) -> Result<AnyBackend> {
        self.validate()?;
        Ok(create_backend(self.backend, self.threads)?)
    }
}
