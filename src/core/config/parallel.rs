//! Shared parallel processing configuration types.

use crate::core::constants::{DEFAULT_MAX_WORKERS, DEFAULT_PARALLEL_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Configuration for parallel sample loading.
///
/// The policy does not own a thread pool. A pool is built from it for the
/// duration of a single batch call and released when that call returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallelPolicy {
    /// Maximum number of worker threads used for one batch.
    /// If None, rayon picks its default size (typically the number of CPU cores).
    /// Default: Some(12)
    #[serde(default = "ParallelPolicy::default_max_threads")]
    pub max_threads: Option<usize>,

    /// Batches with at most this many records are loaded sequentially on the
    /// calling thread.
    /// Default: 4 (matches DEFAULT_PARALLEL_THRESHOLD)
    #[serde(default = "ParallelPolicy::default_utility_threshold")]
    pub utility_threshold: usize,
}

impl ParallelPolicy {
    /// Create a new ParallelPolicy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of threads.
    pub fn with_max_threads(mut self, max_threads: Option<usize>) -> Self {
        self.max_threads = max_threads;
        self
    }

    /// Set the sequential-processing threshold.
    pub fn with_utility_threshold(mut self, threshold: usize) -> Self {
        self.utility_threshold = threshold;
        self
    }

    /// Build a dedicated rayon thread pool sized by `max_threads`.
    ///
    /// The caller owns the returned pool; dropping it joins the workers.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let policy = ParallelPolicy::new().with_max_threads(Some(4));
    /// let pool = policy.build_thread_pool()?;
    /// let squares: Vec<u32> = pool.install(|| (0..8u32).into_par_iter().map(|x| x * x).collect());
    /// ```
    pub fn build_thread_pool(&self) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
        let mut builder = rayon::ThreadPoolBuilder::new()
            .thread_name(|index| format!("pixel-dataset-worker-{index}"));
        if let Some(num_threads) = self.max_threads {
            builder = builder.num_threads(num_threads);
        }
        builder.build()
    }

    fn default_max_threads() -> Option<usize> {
        Some(DEFAULT_MAX_WORKERS)
    }

    fn default_utility_threshold() -> usize {
        DEFAULT_PARALLEL_THRESHOLD
    }
}

impl Default for ParallelPolicy {
    fn default() -> Self {
        Self {
            max_threads: Self::default_max_threads(),
            utility_threshold: Self::default_utility_threshold(),
        }
    }
}

impl super::ConfigValidator for ParallelPolicy {
    fn validate(&self) -> Result<(), super::ConfigError> {
        if self.max_threads == Some(0) {
            return Err(super::ConfigError::InvalidConfig {
                message: "max_threads must be at least 1 when set".to_string(),
            });
        }
        Ok(())
    }
}
