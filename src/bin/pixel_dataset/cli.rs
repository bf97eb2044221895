//! Subcommand implementations.

use pixel_dataset::core::config::{CatalogConfig, ConfigValidator, LoaderConfig, PrepConfig};
use pixel_dataset::core::errors::{DatasetError, DatasetResult};
use pixel_dataset::dataset::{DatasetCatalog, LoadedSample, SampleLoader, SampleRecord};
use pixel_dataset::processors::{NUM_CLASSES, decode};
use pixel_dataset::utils::{plane_to_gray_image, save_image};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Command-line values that take precedence over the configuration file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub target_line_height: Option<f64>,
    pub line_height: Option<f64>,
    pub prediction: bool,
    pub workers: Option<usize>,
    pub no_verify: bool,
}

/// Builds the effective configuration from an optional file and flag overrides.
///
/// Without a file, `target_line_height` must be given on the command line.
pub fn resolve_config(path: Option<&Path>, overrides: Overrides) -> DatasetResult<PrepConfig> {
    let mut config = match path {
        Some(path) => {
            info!("Reading configuration from {}", path.display());
            PrepConfig::from_json_file(path)?
        }
        None => {
            let target = overrides.target_line_height.ok_or_else(|| {
                DatasetError::config_error_detailed(
                    "command line",
                    "--target-line-height is required without --config",
                )
            })?;
            PrepConfig {
                loader: LoaderConfig::new(target),
                catalog: Default::default(),
                parallel: Default::default(),
                line_height_px: None,
            }
        }
    };

    if let Some(target) = overrides.target_line_height {
        config.loader.target_line_height = target;
    }
    if overrides.line_height.is_some() {
        config.line_height_px = overrides.line_height;
    }
    if overrides.prediction {
        config.loader.prediction_mode = true;
    }
    if overrides.workers.is_some() {
        config.parallel.max_threads = overrides.workers;
    }
    if overrides.no_verify {
        config.catalog.verify_filenames = false;
    }
    config.validate()?;
    Ok(config)
}

/// Catalog settings for `inspect`, which never needs a loader configuration.
pub fn catalog_settings(
    path: Option<&Path>,
    line_height: Option<f64>,
    no_verify: bool,
) -> DatasetResult<(CatalogConfig, Option<f64>)> {
    let (mut catalog, file_height) = match path {
        Some(path) => {
            let config = PrepConfig::from_json_file(path)?;
            (config.catalog, config.line_height_px)
        }
        None => (CatalogConfig::default(), None),
    };
    if no_verify {
        catalog.verify_filenames = false;
    }
    catalog.validate()?;
    Ok((catalog, line_height.or(file_height)))
}

/// Lists the dataset and prints its records.
pub fn inspect(
    root: &Path,
    catalog: CatalogConfig,
    line_height: Option<f64>,
    format: &str,
) -> DatasetResult<()> {
    let start = Instant::now();
    let records = DatasetCatalog::new(catalog).list_dataset(root, line_height)?;
    info!(
        "Listed {} samples in {:.2}ms",
        records.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    output_records(&records, format)
}

/// Loads the dataset, optionally writes previews, and prints a summary.
pub fn load(
    root: &Path,
    config: &PrepConfig,
    preview_dir: Option<&Path>,
    format: &str,
) -> DatasetResult<()> {
    let start = Instant::now();
    let catalog = DatasetCatalog::new(config.catalog.clone());
    let records = catalog.list_dataset(root, config.line_height_px)?;

    let loader = SampleLoader::new(config.loader.clone())?;
    let pb = progress_bar(records.len() as u64, format == "json");
    let samples = match loader.load_batch_with_progress(&records, &config.parallel, Some(&pb)) {
        Ok(samples) => {
            pb.finish_and_clear();
            samples
        }
        Err(e) => {
            pb.abandon();
            return Err(e);
        }
    };
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    info!("Loaded {} samples in {:.2}ms", samples.len(), elapsed_ms);

    if let Some(dir) = preview_dir {
        for (idx, sample) in samples.iter().enumerate() {
            write_preview(dir, idx, sample)?;
        }
        info!("Wrote previews to {}", dir.display());
    }

    let summaries: Vec<SampleSummary> = samples.iter().map(SampleSummary::from).collect();
    output_summaries(&summaries, format, elapsed_ms)
}

/// Progress bar on stderr, hidden when stdout carries machine-readable output.
fn progress_bar(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} samples",
    ) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

#[derive(Serialize)]
struct SampleSummary {
    image: String,
    scale: f64,
    source_shape: (usize, usize),
    shape: (usize, usize),
    padding: (usize, usize),
    /// Pixel count per class id; absent in prediction mode.
    class_pixels: Option<[usize; NUM_CLASSES]>,
}

impl From<&LoadedSample> for SampleSummary {
    fn from(sample: &LoadedSample) -> Self {
        let class_pixels = sample.mask.as_ref().map(|mask| {
            let mut counts = [0usize; NUM_CLASSES];
            for &class in mask.iter() {
                if let Ok(c) = usize::try_from(class)
                    && c < NUM_CLASSES
                {
                    counts[c] += 1;
                }
            }
            counts
        });
        Self {
            image: sample.record.image_path.display().to_string(),
            scale: sample.info.scale,
            source_shape: sample.info.source_shape,
            shape: sample.shape(),
            padding: (sample.info.padding.top, sample.info.padding.left),
            class_pixels,
        }
    }
}

fn write_preview(dir: &Path, idx: usize, sample: &LoadedSample) -> DatasetResult<()> {
    let stem = sample
        .record
        .image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{idx:05}"));

    save_image(&plane_to_gray_image(&sample.binary), dir.join(format!("{stem}.bin.png")))?;
    save_image(&plane_to_gray_image(&sample.image), dir.join(format!("{stem}.png")))?;
    if let Some(mask) = &sample.mask {
        save_image(&decode(mask), dir.join(format!("{stem}_MASK.png")))?;
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> DatasetResult<String> {
    serde_json::to_string(value).map_err(|e| DatasetError::serialization("serialize output", e))
}

fn output_records(records: &[SampleRecord], format: &str) -> DatasetResult<()> {
    match format {
        "json" => println!("{}", to_json(&records)?),
        "text" => {
            for record in records {
                println!("{}", record.image_path.display());
            }
        }
        _ => {
            println!("\n=== Dataset ===");
            println!("Samples: {}", records.len());
            println!();
            for (idx, record) in records.iter().enumerate() {
                println!(
                    "[{}] {} (line height {:.1})",
                    idx + 1,
                    record.image_path.display(),
                    record.calibration_height
                );
                println!("    binary: {}", record.binary_path.display());
                println!("    mask:   {}", record.mask_path.display());
            }
        }
    }
    Ok(())
}

fn output_summaries(
    summaries: &[SampleSummary],
    format: &str,
    elapsed_ms: f64,
) -> DatasetResult<()> {
    match format {
        "json" => println!("{}", to_json(&summaries)?),
        "text" => {
            for summary in summaries {
                println!("{}\t{}x{}", summary.image, summary.shape.0, summary.shape.1);
            }
        }
        _ => {
            println!("\n=== Loaded Samples ===");
            println!("Samples: {}", summaries.len());
            println!("Processing time: {elapsed_ms:.2}ms");
            println!();
            for (idx, summary) in summaries.iter().enumerate() {
                println!("[{}] {}", idx + 1, summary.image);
                println!(
                    "    {}x{} -> {}x{} (scale {:.4}, padding top {} left {})",
                    summary.source_shape.0,
                    summary.source_shape.1,
                    summary.shape.0,
                    summary.shape.1,
                    summary.scale,
                    summary.padding.0,
                    summary.padding.1
                );
                if let Some(counts) = summary.class_pixels {
                    println!("    class pixels: {counts:?}");
                }
            }
        }
    }
    Ok(())
}
