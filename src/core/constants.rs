//! Constants shared across the preparation pipeline.

/// Spatial divisibility required by the model's three 2x downsampling stages.
pub const STRIDE: usize = 8;

/// Largest height or width a sample may be rescaled to.
pub const MAX_SCALED_DIMENSION: u32 = 16_384;

/// Default worker count for batch loading.
pub const DEFAULT_MAX_WORKERS: usize = 12;

/// Batches at or below this size are processed sequentially.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4;

/// Default sub-directory names of a dataset root.
pub const DEFAULT_BINARY_DIR: &str = "binary_images";
pub const DEFAULT_IMAGES_DIR: &str = "images";
pub const DEFAULT_MASKS_DIR: &str = "masks";
pub const DEFAULT_NORMALIZATIONS_DIR: &str = "normalizations";

/// JSON key holding the calibration height in normalization files.
pub const CHAR_HEIGHT_KEY: &str = "char_height";
