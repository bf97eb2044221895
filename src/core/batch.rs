//! Ordered, all-or-nothing batch execution on a scoped worker pool.

use crate::core::config::{ConfigValidator, ParallelPolicy};
use crate::core::errors::{DatasetError, DatasetResult, ProcessingStage};
use rayon::prelude::*;

/// Runs one batch according to a [`ParallelPolicy`].
///
/// A worker pool is built only when a `try_map` call is large enough to run in
/// parallel, and it is dropped when that call returns. Nothing is installed
/// globally.
#[derive(Debug)]
pub struct BatchRunner {
    policy: ParallelPolicy,
}

impl BatchRunner {
    /// Creates a runner after validating `policy`.
    pub fn from_policy(policy: &ParallelPolicy) -> DatasetResult<Self> {
        policy.validate()?;
        Ok(Self {
            policy: policy.clone(),
        })
    }

    /// Number of worker threads a parallel call would use.
    pub fn num_threads(&self) -> usize {
        self.policy
            .max_threads
            .unwrap_or_else(rayon::current_num_threads)
    }

    /// Whether a batch of `len` items runs on the calling thread.
    pub fn is_sequential(&self, len: usize) -> bool {
        len <= self.policy.utility_threshold
    }

    fn build_pool(&self) -> DatasetResult<rayon::ThreadPool> {
        self.policy
            .build_thread_pool()
            .map_err(|e| DatasetError::Processing {
                kind: ProcessingStage::BatchProcessing,
                context: "failed to build worker pool".to_string(),
                source: Box::new(e),
            })
    }

    /// Applies `f` to every item and returns the results in input order.
    ///
    /// Items may be processed concurrently and finish in any order. If any call
    /// fails the whole batch fails with that error and no results are returned.
    pub fn try_map<T, U, F>(&self, items: &[T], f: F) -> DatasetResult<Vec<U>>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> DatasetResult<U> + Sync + Send,
    {
        if self.is_sequential(items.len()) {
            return items.iter().map(&f).collect();
        }
        self.build_pool()?
            .install(|| items.par_iter().map(&f).collect::<DatasetResult<Vec<U>>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn runner(threads: usize, threshold: usize) -> BatchRunner {
        let policy = ParallelPolicy::new()
            .with_max_threads(Some(threads))
            .with_utility_threshold(threshold);
        BatchRunner::from_policy(&policy).unwrap()
    }

    #[test]
    fn test_try_map_preserves_order_when_completion_is_reversed() {
        let runner = runner(4, 0);
        let items: Vec<u64> = (0..8).collect();

        // Earlier items sleep longer, so they complete last.
        let out = runner
            .try_map(&items, |&i| {
                std::thread::sleep(Duration::from_millis((8 - i) * 5));
                Ok(i * 10)
            })
            .unwrap();

        assert_eq!(out, vec![0, 10, 20, 30, 40, 50, 60, 70]);
    }

    #[test]
    fn test_try_map_sequential_below_threshold() {
        let runner = runner(2, 16);
        let caller = std::thread::current().id();
        let items = vec!["a", "bb", "ccc"];

        let out = runner
            .try_map(&items, |s| {
                assert_eq!(std::thread::current().id(), caller);
                Ok(s.len())
            })
            .unwrap();

        assert!(runner.is_sequential(items.len()));
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn test_try_map_parallel_uses_worker_pool() {
        let runner = runner(2, 1);
        let items = vec![1, 2, 3];

        let names = runner
            .try_map(&items, |_| {
                Ok(std::thread::current().name().map(str::to_owned).unwrap_or_default())
            })
            .unwrap();

        assert!(!runner.is_sequential(items.len()));
        assert!(names.iter().all(|n| n.starts_with("pixel-dataset-worker-")));
    }

    #[test]
    fn test_try_map_fails_whole_batch() {
        let runner = runner(4, 0);
        let items: Vec<usize> = (0..5).collect();
        let result = runner.try_map(&items, |&i| {
            if i == 2 {
                Err(DatasetError::integrity(format!("item {i} broken")))
            } else {
                Ok(i)
            }
        });

        match result {
            Err(DatasetError::DatasetIntegrity { message }) => assert_eq!(message, "item 2 broken"),
            other => panic!("expected integrity error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_policy_rejects_zero_workers() {
        let policy = ParallelPolicy::new().with_max_threads(Some(0));
        assert!(matches!(
            BatchRunner::from_policy(&policy),
            Err(DatasetError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_num_threads() {
        assert_eq!(runner(3, 0).num_threads(), 3);
    }
}
