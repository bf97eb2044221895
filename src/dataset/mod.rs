//! Dataset enumeration and sample loading.
//!
//! - [`catalog`]: builds [`SampleRecord`] lists from a dataset root or split files
//! - [`loader`]: reads and normalizes records, one at a time or in parallel batches
//! - [`record`]: record and loaded-sample types

pub mod catalog;
pub mod loader;
pub mod record;

#[cfg(test)]
pub(crate) mod fixtures;

pub use catalog::{DatasetCatalog, list_dataset, read_char_height, read_split_files};
pub use loader::SampleLoader;
pub use record::{LoadedSample, SampleRecord};
