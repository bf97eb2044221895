//! The core module of the preparation pipeline.
//!
//! This module contains the fundamental components shared by every stage:
//! - Batch execution on a scoped worker pool
//! - Configuration management
//! - Constants used throughout the pipeline
//! - Error handling
//!
//! It also provides re-exports of commonly used types for convenience.

pub mod batch;
pub mod config;
pub mod constants;
pub mod errors;

pub use batch::BatchRunner;
pub use config::{
    CatalogConfig, ConfigError, ConfigValidator, LoaderConfig, ParallelPolicy, PrepConfig,
};
pub use constants::*;
pub use errors::{DatasetError, DatasetResult, ProcessingStage};
