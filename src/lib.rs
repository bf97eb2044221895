//! # pixel-dataset
//!
//! Training-data preparation for pixel-wise page segmentation networks.
//!
//! A dataset root holds, per page, a binarized image, a grayscale image and a
//! color-coded label mask. This crate pairs those files into
//! [`SampleRecord`]s, rescales every page so that its text line height matches
//! a common target, pads the result to a multiple of the network stride and
//! converts mask colors into integer class maps.
//!
//! ## Modules
//!
//! * [`core`] - errors, configuration, constants and batch execution
//! * [`dataset`] - catalog construction and sample loading
//! * [`processors`] - color coding and geometric normalization
//! * [`utils`] - image IO, filename checks, tensor conversion and logging
//!
//! ## Example
//!
//! ```rust,no_run
//! use pixel_dataset::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let records = list_dataset("data/train", Some(36.0))?;
//! let loader = SampleLoader::new(LoaderConfig::new(4.0))?;
//! let samples = loader.load_batch(&records, &ParallelPolicy::default())?;
//!
//! for sample in &samples {
//!     println!("{} -> {:?}", sample.record.image_path.display(), sample.shape());
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod dataset;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use pixel_dataset::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{
        CatalogConfig, DatasetError, DatasetResult, LoaderConfig, ParallelPolicy, PrepConfig,
    };
    pub use crate::dataset::{
        DatasetCatalog, LoadedSample, SampleLoader, SampleRecord, list_dataset, read_split_files,
    };
    pub use crate::processors::{ClassMap, UnmatchedPixelPolicy, decode, encode};
}
