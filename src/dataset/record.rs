//! Sample records before and after loading.

use crate::processors::{ClassMap, NormalizationInfo, NormalizedSample};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Locates one training example on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Binarized page image.
    pub binary_path: PathBuf,
    /// Grayscale page image.
    pub image_path: PathBuf,
    /// Color-coded label mask.
    pub mask_path: PathBuf,
    /// Reference text line height of this page, in pixels.
    #[serde(alias = "line_height_px")]
    pub calibration_height: f64,
}

impl SampleRecord {
    pub fn new(
        binary_path: impl Into<PathBuf>,
        image_path: impl Into<PathBuf>,
        mask_path: impl Into<PathBuf>,
        calibration_height: f64,
    ) -> Self {
        Self {
            binary_path: binary_path.into(),
            image_path: image_path.into(),
            mask_path: mask_path.into(),
            calibration_height,
        }
    }
}

impl fmt::Display for SampleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{binary: {}, image: {}, mask: {}, calibration_height: {}}}",
            self.binary_path.display(),
            self.image_path.display(),
            self.mask_path.display(),
            self.calibration_height
        )
    }
}

/// A record together with its normalized arrays.
///
/// Produced by [`SampleLoader`](super::SampleLoader); the originating record
/// is kept unchanged alongside the data.
#[derive(Debug, Clone)]
pub struct LoadedSample {
    pub record: SampleRecord,
    /// Inverted binary plane.
    pub binary: Array2<f32>,
    /// Inverted grayscale plane.
    pub image: Array2<f32>,
    /// Class map; `None` in prediction mode.
    pub mask: Option<ClassMap>,
    pub info: NormalizationInfo,
}

impl LoadedSample {
    pub(crate) fn from_normalized(record: SampleRecord, normalized: NormalizedSample) -> Self {
        Self {
            record,
            binary: normalized.binary,
            image: normalized.image,
            mask: normalized.mask,
            info: normalized.info,
        }
    }

    /// Shared `(height, width)` of all planes.
    pub fn shape(&self) -> (usize, usize) {
        self.image.dim()
    }
}
