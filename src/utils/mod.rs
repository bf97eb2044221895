//! Utility functions for dataset preparation.
//!
//! This module provides image loading and preview helpers, filename
//! correspondence checks, tensor conversion, and logging setup.

pub mod filenames;
pub mod image;
pub mod tensor;

pub use filenames::match_filenames;
pub use self::image::{load_gray_image, load_rgb_image, plane_to_gray_image, save_image};
pub use tensor::to_batch_tensor;

/// Initializes a `tracing` subscriber for binaries.
///
/// The filter is read from `RUST_LOG` and defaults to `info`. Calling this
/// more than once is harmless; later calls are ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
