//! Image processors for dataset preparation.
//!
//! - [`color`]: label mask ↔ class map conversion
//! - [`geometry`]: line-height rescaling and stride padding
//! - [`types`]: normalization metadata

pub mod color;
pub mod geometry;
pub mod types;

pub use color::{
    CLASS_COLORS, ClassMap, NUM_CLASSES, PALETTE, PaletteEntry, UnmatchedPixelPolicy, decode,
    encode, encode_with_policy, pack_rgb, unmatched_pixels,
};
pub use geometry::{
    GeometryNormalizer, NormalizedSample, invert_to_array, pad_edge, padding_for, resize_scale,
    scaled_dimension, stride_padding,
};
pub use types::{NormalizationInfo, PaddingOffsets};
