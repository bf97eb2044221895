//! Enumeration of sample records from a dataset root or from split files.
//!
//! A dataset root contains three parallel directories of page images
//! (binary, grayscale, label mask) and, unless a fixed calibration height is
//! given, a `normalizations` directory with one `{"char_height": ..}` JSON
//! file per page. Files are paired by their sorted position.

use super::SampleRecord;
use crate::core::config::CatalogConfig;
use crate::core::constants::CHAR_HEIGHT_KEY;
use crate::core::errors::{DatasetError, DatasetResult};
use crate::utils::match_filenames;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Lists dataset directories according to a [`CatalogConfig`].
#[derive(Debug, Clone, Default)]
pub struct DatasetCatalog {
    config: CatalogConfig,
}

impl DatasetCatalog {
    pub fn new(config: CatalogConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Builds the record list for the dataset at `root`.
    ///
    /// With `line_height_px` set, every record uses it as calibration height;
    /// otherwise heights are read from the normalizations directory.
    ///
    /// # Errors
    ///
    /// * `ConfigError` if a required directory is missing or a calibration
    ///   height is not a positive number
    /// * `DatasetIntegrity` if file counts differ or, with
    ///   `verify_filenames`, file names do not correspond
    pub fn list_dataset(
        &self,
        root: impl AsRef<Path>,
        line_height_px: Option<f64>,
    ) -> DatasetResult<Vec<SampleRecord>> {
        let root = root.as_ref();
        let binary_dir = root.join(&self.config.binary_dir);
        let images_dir = root.join(&self.config.images_dir);
        let masks_dir = root.join(&self.config.masks_dir);

        for dir in [root, binary_dir.as_path(), images_dir.as_path(), masks_dir.as_path()] {
            require_dir(dir, "dataset dir")?;
        }

        let binaries = list_files(&binary_dir)?;
        let images = list_files(&images_dir)?;
        let masks = list_files(&masks_dir)?;

        if binaries.len() != images.len() || images.len() != masks.len() {
            return Err(DatasetError::integrity(format!(
                "mismatch in dataset files length: {}, {}, {}",
                binaries.len(),
                images.len(),
                masks.len()
            )));
        }

        if !self.config.verify_filenames {
            warn!(
                root = %root.display(),
                "filename check disabled, pairing files by sorted position only"
            );
        } else if let (false, Some(message)) =
            match_filenames(&images[..], &[&binaries[..], &masks[..]])
        {
            return Err(DatasetError::integrity(format!(
                "{message} in '{}'",
                root.display()
            )));
        }

        let heights = match line_height_px {
            Some(height) => {
                validate_height(height, root)?;
                vec![height; masks.len()]
            }
            None => {
                let norm_dir = root.join(&self.config.normalizations_dir);
                require_dir(&norm_dir, "norm dir")?;
                let files = list_files(&norm_dir)?;
                if files.len() != masks.len() {
                    return Err(DatasetError::integrity(format!(
                        "{} normalization files for {} masks in '{}'",
                        files.len(),
                        masks.len(),
                        root.display()
                    )));
                }
                files
                    .iter()
                    .map(read_char_height)
                    .collect::<DatasetResult<Vec<_>>>()?
            }
        };

        let records: Vec<SampleRecord> = binaries
            .into_iter()
            .zip(images)
            .zip(masks)
            .zip(heights)
            .map(|(((binary, image), mask), height)| SampleRecord::new(binary, image, mask, height))
            .collect();

        info!(
            root = %root.display(),
            samples = records.len(),
            fixed_height = ?line_height_px,
            "listed dataset"
        );
        Ok(records)
    }
}

/// Lists the dataset at `root` with the default directory layout.
pub fn list_dataset(
    root: impl AsRef<Path>,
    line_height_px: Option<f64>,
) -> DatasetResult<Vec<SampleRecord>> {
    DatasetCatalog::default().list_dataset(root, line_height_px)
}

/// Reads the `char_height` field of a normalization file.
pub fn read_char_height(path: impl AsRef<Path>) -> DatasetResult<f64> {
    let path = path.as_ref();
    let raw = std::fs::read(path).map_err(|e| DatasetError::io(path, e))?;
    let value: JsonValue = serde_json::from_slice(&raw).map_err(|e| DatasetError::json(path, e))?;
    let height = value
        .get(CHAR_HEIGHT_KEY)
        .and_then(JsonValue::as_f64)
        .ok_or_else(|| {
            DatasetError::config_error_detailed(
                format!("normalization file '{}'", path.display()),
                format!("missing numeric '{CHAR_HEIGHT_KEY}'"),
            )
        })?;
    validate_height(height, path)?;
    Ok(height)
}

/// Collects the records of one split from JSON split files.
///
/// Each file holds an object mapping split names (such as `"train"` or
/// `"test"`) to arrays of records. Records are concatenated in file order.
pub fn read_split_files<P: AsRef<Path>>(
    files: &[P],
    split: &str,
) -> DatasetResult<Vec<SampleRecord>> {
    let mut records = Vec::new();
    for file in files {
        let path = file.as_ref();
        let raw = std::fs::read(path).map_err(|e| DatasetError::io(path, e))?;
        let mut value: JsonValue =
            serde_json::from_slice(&raw).map_err(|e| DatasetError::json(path, e))?;
        let entries = value.get_mut(split).map(JsonValue::take).ok_or_else(|| {
            DatasetError::config_error_detailed(
                format!("split file '{}'", path.display()),
                format!("no '{split}' list"),
            )
        })?;
        let batch: Vec<SampleRecord> =
            serde_json::from_value(entries).map_err(|e| DatasetError::json(path, e))?;
        debug!(file = %path.display(), split, count = batch.len(), "read split file");
        records.extend(batch);
    }
    Ok(records)
}

fn require_dir(dir: &Path, what: &str) -> DatasetResult<()> {
    if !dir.is_dir() {
        return Err(DatasetError::config_error_detailed(
            "dataset catalog",
            format!("{what} does not exist at '{}'", dir.display()),
        ));
    }
    Ok(())
}

fn validate_height(height: f64, source: &Path) -> DatasetResult<()> {
    if !height.is_finite() || height <= 0.0 {
        return Err(DatasetError::config_error_detailed(
            format!("calibration height for '{}'", source.display()),
            format!("expected a positive number, got {height}"),
        ));
    }
    Ok(())
}

/// Regular files in `dir`, sorted by path.
fn list_files(dir: &Path) -> DatasetResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| DatasetError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| DatasetError::io(dir, e))?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::DatasetFixture;

    #[test]
    fn test_list_dataset_with_fixed_height() {
        let fixture = DatasetFixture::new();
        let second = fixture.add_sample("0002", 8, 8, 36.0);
        let first = fixture.add_sample("0001", 8, 8, 36.0);

        let records = list_dataset(fixture.root(), Some(36.0)).unwrap();

        assert_eq!(records, vec![first, second]);
    }

    #[test]
    fn test_list_dataset_reads_normalizations() {
        let fixture = DatasetFixture::new();
        fixture.add_sample("0001", 8, 8, 0.0);
        fixture.add_sample("0002", 8, 8, 0.0);
        fixture.add_normalization("0001", 18.0);
        fixture.add_normalization("0002", 31.5);

        let records = list_dataset(fixture.root(), None).unwrap();

        let heights: Vec<f64> = records.iter().map(|r| r.calibration_height).collect();
        assert_eq!(heights, vec![18.0, 31.5]);
    }

    #[test]
    fn test_list_dataset_missing_directory() {
        let fixture = DatasetFixture::new();
        std::fs::remove_dir(fixture.root().join("masks")).unwrap();

        let err = list_dataset(fixture.root(), Some(10.0)).unwrap_err();

        assert!(matches!(err, DatasetError::ConfigError { .. }));
        assert!(err.to_string().contains("masks"));
    }

    #[test]
    fn test_list_dataset_missing_normalizations_dir() {
        let fixture = DatasetFixture::new();
        fixture.add_sample("0001", 8, 8, 0.0);

        let err = list_dataset(fixture.root(), None).unwrap_err();

        assert!(matches!(err, DatasetError::ConfigError { .. }));
        assert!(err.to_string().contains("normalizations"));
    }

    #[test]
    fn test_list_dataset_count_mismatch() {
        let fixture = DatasetFixture::new();
        fixture.add_sample("0001", 8, 8, 10.0);
        fixture.add_sample("0002", 8, 8, 10.0);
        std::fs::remove_file(fixture.path("masks", "0002_MASK.png")).unwrap();

        let err = list_dataset(fixture.root(), Some(10.0)).unwrap_err();

        match err {
            DatasetError::DatasetIntegrity { message } => assert!(message.contains("2, 2, 1")),
            other => panic!("expected integrity error, got {other:?}"),
        }
    }

    #[test]
    fn test_list_dataset_normalization_count_mismatch() {
        let fixture = DatasetFixture::new();
        fixture.add_sample("0001", 8, 8, 0.0);
        fixture.add_sample("0002", 8, 8, 0.0);
        fixture.add_normalization("0001", 18.0);

        let err = list_dataset(fixture.root(), None).unwrap_err();

        assert!(matches!(err, DatasetError::DatasetIntegrity { .. }));
    }

    #[test]
    fn test_list_dataset_filename_mismatch() {
        let fixture = DatasetFixture::new();
        fixture.add_sample("0001", 8, 8, 10.0);
        std::fs::rename(
            fixture.path("masks", "0001_MASK.png"),
            fixture.path("masks", "0009_MASK.png"),
        )
        .unwrap();

        let err = list_dataset(fixture.root(), Some(10.0)).unwrap_err();
        match err {
            DatasetError::DatasetIntegrity { message } => {
                assert!(message.contains("0001.png"));
                assert!(message.contains("0009_MASK.png"));
            }
            other => panic!("expected integrity error, got {other:?}"),
        }

        let lenient = DatasetCatalog::new(CatalogConfig::default().with_verify_filenames(false));
        assert_eq!(lenient.list_dataset(fixture.root(), Some(10.0)).unwrap().len(), 1);
    }

    #[test]
    fn test_list_dataset_rejects_non_positive_fixed_height() {
        let fixture = DatasetFixture::new();
        fixture.add_sample("0001", 8, 8, 0.0);

        let err = list_dataset(fixture.root(), Some(0.0)).unwrap_err();

        assert!(matches!(err, DatasetError::ConfigError { .. }));
    }

    #[test]
    fn test_read_char_height_rejects_missing_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("n.json");
        std::fs::write(&path, r#"{"line_height": 12}"#).unwrap();

        let err = read_char_height(&path).unwrap_err();

        assert!(matches!(err, DatasetError::ConfigError { .. }));
        assert!(err.to_string().contains("char_height"));
    }

    #[test]
    fn test_read_char_height_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("n.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            read_char_height(&path).unwrap_err(),
            DatasetError::Json { .. }
        ));
    }

    #[test]
    fn test_read_split_files_concatenates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.json");
        let second = dir.path().join("b.json");
        std::fs::write(
            &first,
            r#"{"train": [{"binary_path": "b1", "image_path": "i1", "mask_path": "m1", "line_height_px": 10}],
                "test": []}"#,
        )
        .unwrap();
        std::fs::write(
            &second,
            r#"{"train": [{"binary_path": "b2", "image_path": "i2", "mask_path": "m2", "calibration_height": 20}]}"#,
        )
        .unwrap();

        let records = read_split_files(&[&first, &second], "train").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].binary_path, PathBuf::from("b1"));
        assert_eq!(records[1].calibration_height, 20.0);
    }

    #[test]
    fn test_read_split_files_missing_split() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.json");
        std::fs::write(&path, r#"{"train": []}"#).unwrap();

        let err = read_split_files(&[&path], "test").unwrap_err();

        assert!(matches!(err, DatasetError::ConfigError { .. }));
    }
}
