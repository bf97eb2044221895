//! Configuration management for dataset preparation.
//!
//! This module provides configuration types, the validation trait, and the
//! worker pool policy used by batch loading.

pub mod errors;
pub mod loader;
pub mod parallel;

// Re-export commonly used types
pub use errors::{ConfigError, ConfigValidator};
pub use loader::{CatalogConfig, LoaderConfig, PrepConfig};
pub use parallel::ParallelPolicy;
