//! Loading and normalization of sample records.

use super::{LoadedSample, SampleRecord, read_split_files};
use crate::core::BatchRunner;
use crate::core::config::{ConfigValidator, LoaderConfig, ParallelPolicy};
use crate::core::errors::DatasetResult;
use crate::processors::GeometryNormalizer;
use crate::utils::{load_gray_image, load_rgb_image};
use indicatif::ProgressBar;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Reads sample triples from disk and normalizes them.
#[derive(Debug, Clone)]
pub struct SampleLoader {
    config: LoaderConfig,
    normalizer: GeometryNormalizer,
}

impl SampleLoader {
    /// Creates a loader after validating `config`.
    pub fn new(config: LoaderConfig) -> DatasetResult<Self> {
        config.validate()?;
        let normalizer = GeometryNormalizer::new(config.target_line_height)?
            .with_unmatched_pixel_policy(config.unmatched_pixel_policy);
        Ok(Self { config, normalizer })
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Loads and normalizes a single record.
    ///
    /// In prediction mode the mask file is never opened and the returned
    /// sample has no class map.
    pub fn load(&self, record: &SampleRecord) -> DatasetResult<LoadedSample> {
        let binary = load_gray_image(&record.binary_path)?;
        let image = load_gray_image(&record.image_path)?;
        let mask = if self.config.prediction_mode {
            None
        } else {
            Some(load_rgb_image(&record.mask_path)?)
        };

        let normalized = self
            .normalizer
            .normalize(&binary, &image, mask.as_ref(), record.calibration_height)
            .map_err(|e| e.for_sample(record))?;
        debug!(
            image = %record.image_path.display(),
            shape = ?normalized.image.dim(),
            "loaded sample"
        );
        Ok(LoadedSample::from_normalized(record.clone(), normalized))
    }

    /// Loads a batch of records on a worker pool built from `policy`.
    ///
    /// Results are returned in input order. The first failure aborts the
    /// batch and is returned; the pool is released either way.
    pub fn load_batch(
        &self,
        records: &[SampleRecord],
        policy: &ParallelPolicy,
    ) -> DatasetResult<Vec<LoadedSample>> {
        self.load_batch_with_progress(records, policy, None)
    }

    /// Like [`load_batch`](Self::load_batch), advancing `progress` by one for
    /// every record loaded.
    ///
    /// The bar's length is set to the number of records. It is left as is on
    /// failure so the caller can abandon it.
    pub fn load_batch_with_progress(
        &self,
        records: &[SampleRecord],
        policy: &ParallelPolicy,
        progress: Option<&ProgressBar>,
    ) -> DatasetResult<Vec<LoadedSample>> {
        let start = Instant::now();
        let runner = BatchRunner::from_policy(policy)?;
        let workers = if runner.is_sequential(records.len()) {
            1
        } else {
            runner.num_threads()
        };
        debug!(records = records.len(), workers, "loading batch");
        if let Some(pb) = progress {
            pb.set_length(records.len() as u64);
        }

        let samples = runner.try_map(records, |record| {
            let sample = self.load(record)?;
            if let Some(pb) = progress {
                pb.inc(1);
            }
            Ok(sample)
        })?;

        info!(
            samples = samples.len(),
            prediction_mode = self.config.prediction_mode,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "batch loaded"
        );
        Ok(samples)
    }

    /// Reads one split from the given split files and loads it.
    pub fn load_split_files<P: AsRef<Path>>(
        &self,
        files: &[P],
        split: &str,
        policy: &ParallelPolicy,
    ) -> DatasetResult<Vec<LoadedSample>> {
        let records = read_split_files(files, split)?;
        info!("Loading {} data of type {split}", records.len());
        self.load_batch(&records, policy)
    }
}
