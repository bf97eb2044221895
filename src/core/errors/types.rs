//! Core error types for dataset preparation.
//!
//! This module defines the error type shared by every stage of the pipeline,
//! from catalog construction through geometric normalization and batch loading,
//! together with the [`ProcessingStage`] enum used to label processing failures.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Enum representing different stages of dataset preparation.
///
/// This enum is used to identify which stage an error occurred in,
/// providing context for debugging and error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Error occurred while setting up or running a batch.
    BatchProcessing,
    /// Error occurred while serializing results for output.
    Serialization,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::BatchProcessing => write!(f, "batch processing"),
            ProcessingStage::Serialization => write!(f, "serialization"),
        }
    }
}

/// Enum representing the errors that can occur while preparing a dataset.
///
/// Every variant is fatal for the batch it occurs in: a training set is either
/// complete and consistent or it is not produced at all.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Error occurred while decoding an image file.
    #[error("image load failed for '{}'", path.display())]
    ImageLoad {
        /// The image that failed to load.
        path: PathBuf,
        /// The underlying decoder error.
        #[source]
        source: image::ImageError,
    },

    /// Error occurred while encoding or writing an image file.
    #[error("image write failed for '{}'", path.display())]
    ImageWrite {
        /// The destination path.
        path: PathBuf,
        /// The underlying encoder error.
        #[source]
        source: image::ImageError,
    },

    /// IO error with the path that caused it.
    #[error("io error at '{}'", path.display())]
    Io {
        /// The file or directory being accessed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// JSON parse error with the path that caused it.
    #[error("json parse error at '{}'", path.display())]
    Json {
        /// The file being parsed.
        path: PathBuf,
        /// The underlying parser error.
        #[source]
        source: serde_json::Error,
    },

    /// Error indicating a configuration problem, such as a missing dataset
    /// directory or a non-positive calibration height.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error indicating that the files of a dataset do not line up.
    #[error("dataset integrity: {message}")]
    DatasetIntegrity {
        /// A message describing the mismatch.
        message: String,
    },

    /// A normalized sample violates a shape invariant. This points at a bug in
    /// the padding arithmetic or at corrupted input, never at a user mistake.
    #[error("geometry invariant violated: {message}")]
    GeometryInvariant {
        /// A message describing the violated invariant and the sample.
        message: String,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error occurred during processing.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<crate::core::config::ConfigError> for DatasetError {
    /// Converts a ConfigError to DatasetError::ConfigError.
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}

impl DatasetError {
    /// Wraps an image decoding error together with the offending path.
    pub fn image_load(path: impl AsRef<Path>, source: image::ImageError) -> Self {
        Self::ImageLoad {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Wraps an IO error together with the offending path.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Wraps a JSON error together with the offending path.
    pub fn json(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a configuration error with enhanced context and details.
    ///
    /// # Arguments
    ///
    /// * `context` - High-level description of what was being configured
    /// * `details` - Specific details about what went wrong
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use pixel_dataset::core::errors::DatasetError;
    /// let err = DatasetError::config_error_detailed(
    ///     "dataset catalog",
    ///     "directory 'masks' does not exist",
    /// );
    /// assert!(matches!(err, DatasetError::ConfigError { .. }));
    /// ```
    pub fn config_error_detailed(context: impl Into<String>, details: impl Into<String>) -> Self {
        Self::ConfigError {
            message: format!("{}: {}", context.into(), details.into()),
        }
    }

    /// Creates a configuration error for invalid field values.
    ///
    /// # Arguments
    ///
    /// * `field` - The name of the field with an invalid value
    /// * `expected` - Description of what was expected
    /// * `actual` - Description of what was actually provided
    pub fn invalid_field(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::ConfigError {
            message: format!(
                "invalid value for field '{}': expected {}, got {}",
                field.into(),
                expected.into(),
                actual.into()
            ),
        }
    }

    /// Wraps a serialization failure of command or report output.
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Processing {
            kind: ProcessingStage::Serialization,
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Creates a dataset integrity error.
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::DatasetIntegrity {
            message: message.into(),
        }
    }

    /// Creates a geometry invariant error.
    pub fn geometry(message: impl Into<String>) -> Self {
        Self::GeometryInvariant {
            message: message.into(),
        }
    }

    /// Prefixes the error message with a description of the sample being
    /// processed so that batch failures name the offending record.
    ///
    /// Variants carrying a path or a source error are returned unchanged, since
    /// they already identify the failing file.
    pub fn for_sample(self, sample: impl std::fmt::Display) -> Self {
        match self {
            Self::GeometryInvariant { message } => Self::GeometryInvariant {
                message: format!("{message}; sample: {sample}"),
            },
            Self::InvalidInput { message } => Self::InvalidInput {
                message: format!("{message}; sample: {sample}"),
            },
            Self::ConfigError { message } => Self::ConfigError {
                message: format!("{message}; sample: {sample}"),
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_stage_display() {
        assert_eq!(ProcessingStage::Serialization.to_string(), "serialization");
        assert_eq!(
            ProcessingStage::BatchProcessing.to_string(),
            "batch processing"
        );
    }

    #[test]
    fn test_invalid_field_message() {
        let err = DatasetError::invalid_field("target_line_height", "a positive number", "0");
        assert_eq!(
            err.to_string(),
            "configuration: invalid value for field 'target_line_height': expected a positive number, got 0"
        );
    }

    #[test]
    fn test_for_sample_appends_identification() {
        let err = DatasetError::geometry("shape 10x16 not divisible by 8").for_sample("a.png");
        assert!(err.to_string().contains("sample: a.png"));
    }

    #[test]
    fn test_serialization_error_has_no_path() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = DatasetError::serialization("serialize output", source);
        assert!(matches!(
            err,
            DatasetError::Processing { kind: ProcessingStage::Serialization, .. }
        ));
        assert_eq!(err.to_string(), "serialization failed: serialize output");
    }

    #[test]
    fn test_for_sample_keeps_path_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = DatasetError::io("/data/a.png", io).for_sample("ignored");
        assert!(matches!(err, DatasetError::Io { .. }));
        assert!(!err.to_string().contains("ignored"));
    }
}
