//! Loader and catalog configuration.

use super::errors::{ConfigError, ConfigValidator, validate_positive};
use super::parallel::ParallelPolicy;
use crate::core::constants::{
    DEFAULT_BINARY_DIR, DEFAULT_IMAGES_DIR, DEFAULT_MASKS_DIR, DEFAULT_NORMALIZATIONS_DIR,
};
use crate::core::errors::{DatasetError, DatasetResult};
use crate::processors::UnmatchedPixelPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration consumed by [`SampleLoader`](crate::dataset::SampleLoader).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Text line height, in pixels, that every sample is rescaled to.
    pub target_line_height: f64,

    /// When set, masks are neither read nor encoded; only the binary and
    /// grayscale planes are produced.
    #[serde(default)]
    pub prediction_mode: bool,

    /// What happens to mask pixels whose color is not in the palette.
    #[serde(default)]
    pub unmatched_pixel_policy: UnmatchedPixelPolicy,
}

impl LoaderConfig {
    /// Creates a training-mode configuration for the given target line height.
    pub fn new(target_line_height: f64) -> Self {
        Self {
            target_line_height,
            prediction_mode: false,
            unmatched_pixel_policy: UnmatchedPixelPolicy::default(),
        }
    }

    /// Enables or disables prediction mode.
    pub fn with_prediction_mode(mut self, prediction_mode: bool) -> Self {
        self.prediction_mode = prediction_mode;
        self
    }
}

impl ConfigValidator for LoaderConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        validate_positive("target_line_height", self.target_line_height)
    }
}

/// Directory layout of a dataset root and catalog options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Sub-directory holding binarized page images.
    #[serde(default = "CatalogConfig::default_binary_dir")]
    pub binary_dir: String,

    /// Sub-directory holding grayscale page images.
    #[serde(default = "CatalogConfig::default_images_dir")]
    pub images_dir: String,

    /// Sub-directory holding color-coded label masks.
    #[serde(default = "CatalogConfig::default_masks_dir")]
    pub masks_dir: String,

    /// Sub-directory holding per-sample `char_height` JSON files.
    #[serde(default = "CatalogConfig::default_normalizations_dir")]
    pub normalizations_dir: String,

    /// Check that binary and mask file names start with the image file stem.
    #[serde(default = "CatalogConfig::default_verify_filenames")]
    pub verify_filenames: bool,
}

impl CatalogConfig {
    fn default_binary_dir() -> String {
        DEFAULT_BINARY_DIR.to_string()
    }

    fn default_images_dir() -> String {
        DEFAULT_IMAGES_DIR.to_string()
    }

    fn default_masks_dir() -> String {
        DEFAULT_MASKS_DIR.to_string()
    }

    fn default_normalizations_dir() -> String {
        DEFAULT_NORMALIZATIONS_DIR.to_string()
    }

    fn default_verify_filenames() -> bool {
        true
    }

    /// Disables or enables the filename correspondence check.
    pub fn with_verify_filenames(mut self, verify: bool) -> Self {
        self.verify_filenames = verify;
        self
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            binary_dir: Self::default_binary_dir(),
            images_dir: Self::default_images_dir(),
            masks_dir: Self::default_masks_dir(),
            normalizations_dir: Self::default_normalizations_dir(),
            verify_filenames: Self::default_verify_filenames(),
        }
    }
}

impl ConfigValidator for CatalogConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("binary_dir", &self.binary_dir),
            ("images_dir", &self.images_dir),
            ("masks_dir", &self.masks_dir),
            ("normalizations_dir", &self.normalizations_dir),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Top-level configuration file for the preparation tool.
///
/// ```json
/// {
///   "loader": { "target_line_height": 4 },
///   "catalog": { "verify_filenames": false },
///   "parallel": { "max_threads": 8 },
///   "line_height_px": 36
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepConfig {
    /// Sample loader settings.
    pub loader: LoaderConfig,

    /// Dataset layout settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Worker pool settings for batch loading.
    #[serde(default)]
    pub parallel: ParallelPolicy,

    /// Fixed calibration height for every sample. When absent, per-sample
    /// values are read from the normalizations directory.
    #[serde(default)]
    pub line_height_px: Option<f64>,
}

impl PrepConfig {
    /// Reads and validates a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|e| DatasetError::io(path, e))?;
        let config: Self = serde_json::from_slice(&raw).map_err(|e| DatasetError::json(path, e))?;
        config.validate()?;
        Ok(config)
    }
}

impl ConfigValidator for PrepConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.loader.validate()?;
        self.catalog.validate()?;
        self.parallel.validate()?;
        if let Some(height) = self.line_height_px {
            validate_positive("line_height_px", height)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_loader_config_requires_target_height() {
        let result: Result<LoaderConfig, _> = serde_json::from_str(r#"{"prediction_mode": true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_loader_config_defaults() {
        let config: LoaderConfig = serde_json::from_str(r#"{"target_line_height": 4}"#).unwrap();
        assert!(!config.prediction_mode);
        assert_eq!(config.unmatched_pixel_policy, UnmatchedPixelPolicy::Background);
        assert!(config.is_valid());
    }

    #[test]
    fn test_loader_config_rejects_non_positive_height() {
        assert!(LoaderConfig::new(0.0).validate().is_err());
        assert!(LoaderConfig::new(-4.0).validate().is_err());
    }

    #[test]
    fn test_catalog_config_defaults() {
        let config: CatalogConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.binary_dir, "binary_images");
        assert_eq!(config.images_dir, "images");
        assert_eq!(config.masks_dir, "masks");
        assert_eq!(config.normalizations_dir, "normalizations");
        assert!(config.verify_filenames);
    }

    #[test]
    fn test_catalog_config_rejects_empty_dir_name() {
        let config = CatalogConfig {
            masks_dir: " ".to_string(),
            ..CatalogConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField { ref field }) if field == "masks_dir"
        ));
    }

    #[test]
    fn test_prep_config_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"loader": {{"target_line_height": 4}}, "parallel": {{"max_threads": 2}}, "line_height_px": 36}}"#
        )
        .unwrap();

        let config = PrepConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.loader.target_line_height, 4.0);
        assert_eq!(config.parallel.max_threads, Some(2));
        assert_eq!(config.line_height_px, Some(36.0));
        assert!(config.catalog.verify_filenames);
    }

    #[test]
    fn test_prep_config_invalid_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"loader": {{"target_line_height": 0}}}}"#).unwrap();

        let err = PrepConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, DatasetError::ConfigError { .. }));
    }
}
