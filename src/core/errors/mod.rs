//! Error handling for dataset preparation.

mod types;

pub use types::{DatasetError, ProcessingStage};

/// Result alias used throughout the crate.
pub type DatasetResult<T> = Result<T, DatasetError>;
