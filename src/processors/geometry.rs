//! Geometric normalization of co-registered page images.
//!
//! A sample consists of a binarized page, the matching grayscale page and,
//! for training data, a color-coded label mask. All three are rescaled so that
//! the sample's text line height matches a common target, converted to
//! inverted intensity planes, and padded so both dimensions are multiples of
//! [`STRIDE`].

use crate::core::constants::{MAX_SCALED_DIMENSION, STRIDE};
use crate::core::errors::{DatasetError, DatasetResult};
use crate::processors::color::{self, ClassMap, UnmatchedPixelPolicy};
use crate::processors::types::{NormalizationInfo, PaddingOffsets};
use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};
use ndarray::Array2;
use tracing::debug;

/// Absolute tolerance when truncating scaled dimensions, so that products
/// such as `900 * (4 / 36)` land on 100 rather than 99.
const SCALE_EPSILON: f64 = 1e-6;

/// Output of [`GeometryNormalizer::normalize`].
#[derive(Debug, Clone)]
pub struct NormalizedSample {
    /// Inverted binary plane (ink = 1, background = 0).
    pub binary: Array2<f32>,
    /// Inverted grayscale plane.
    pub image: Array2<f32>,
    /// Encoded class map, absent in prediction mode.
    pub mask: Option<ClassMap>,
    /// What was done to the sample.
    pub info: NormalizationInfo,
}

/// Computes `target_line_height / calibration_height`.
///
/// # Errors
///
/// Returns a `ConfigError` if either height is not a finite positive number.
pub fn resize_scale(target_line_height: f64, calibration_height: f64) -> DatasetResult<f64> {
    if !calibration_height.is_finite() || calibration_height <= 0.0 {
        return Err(DatasetError::invalid_field(
            "calibration_height",
            "a positive number",
            calibration_height.to_string(),
        ));
    }
    if !target_line_height.is_finite() || target_line_height <= 0.0 {
        return Err(DatasetError::invalid_field(
            "target_line_height",
            "a positive number",
            target_line_height.to_string(),
        ));
    }
    Ok(target_line_height / calibration_height)
}

/// Size of one axis after scaling, truncated toward zero.
///
/// # Errors
///
/// Returns `InvalidInput` if the result exceeds [`MAX_SCALED_DIMENSION`].
pub fn scaled_dimension(dim: u32, scale: f64) -> DatasetResult<u32> {
    let scaled = (f64::from(dim) * scale + SCALE_EPSILON).floor();
    if !scaled.is_finite() || scaled > f64::from(MAX_SCALED_DIMENSION) {
        return Err(DatasetError::InvalidInput {
            message: format!(
                "scale {scale} enlarges a dimension of {dim} beyond {MAX_SCALED_DIMENSION} pixels"
            ),
        });
    }
    Ok(scaled as u32)
}

/// Padding needed to bring `dim` to a multiple of [`STRIDE`].
///
/// Computed by three successive halvings, rescaling by 8 and adding one
/// stride, which is the rounding rule the model was trained with.
#[inline]
pub fn stride_padding(dim: usize) -> usize {
    if dim % STRIDE == 0 {
        return 0;
    }
    let floor_multiple = ((dim / 2) / 2) / 2 * 8;
    floor_multiple + STRIDE - dim
}

/// Padding offsets for an array of shape `(height, width)`.
pub fn padding_for(shape: (usize, usize)) -> PaddingOffsets {
    PaddingOffsets::new(stride_padding(shape.0), stride_padding(shape.1))
}

/// Pads `array` on the top and left by replicating its first row and column.
pub fn pad_edge<T: Clone>(array: &Array2<T>, padding: PaddingOffsets) -> Array2<T> {
    if padding.is_zero() {
        return array.clone();
    }
    let (height, width) = array.dim();
    Array2::from_shape_fn((height + padding.top, width + padding.left), |(y, x)| {
        array[[y.saturating_sub(padding.top), x.saturating_sub(padding.left)]].clone()
    })
}

/// Converts an 8-bit gray image to an inverted `[0, 1]` plane: `1 - v / 255`.
pub fn invert_to_array(img: &GrayImage) -> Array2<f32> {
    let (width, height) = img.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
        1.0 - f32::from(img.get_pixel(x as u32, y as u32)[0]) / 255.0
    })
}

fn check_not_empty(name: &str, (width, height): (u32, u32)) -> DatasetResult<()> {
    if width == 0 || height == 0 {
        return Err(DatasetError::InvalidInput {
            message: format!("{name} is empty ({width}x{height})"),
        });
    }
    Ok(())
}

fn check_stride(name: &str, dim: (usize, usize)) -> DatasetResult<()> {
    if dim.0 % STRIDE != 0 || dim.1 % STRIDE != 0 {
        return Err(DatasetError::geometry(format!(
            "padding not working: {name} shape ({}x{}) should be divisible by {STRIDE}",
            dim.0, dim.1
        )));
    }
    Ok(())
}

/// Rescales and pads sample triples to a common line height.
#[derive(Debug, Clone)]
pub struct GeometryNormalizer {
    target_line_height: f64,
    unmatched_pixel_policy: UnmatchedPixelPolicy,
}

impl GeometryNormalizer {
    /// Creates a normalizer for the given target line height.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the target is not a finite positive number.
    pub fn new(target_line_height: f64) -> DatasetResult<Self> {
        if !target_line_height.is_finite() || target_line_height <= 0.0 {
            return Err(DatasetError::invalid_field(
                "target_line_height",
                "a positive number",
                target_line_height.to_string(),
            ));
        }
        Ok(Self {
            target_line_height,
            unmatched_pixel_policy: UnmatchedPixelPolicy::default(),
        })
    }

    /// Sets how off-palette mask pixels are labeled.
    pub fn with_unmatched_pixel_policy(mut self, policy: UnmatchedPixelPolicy) -> Self {
        self.unmatched_pixel_policy = policy;
        self
    }

    /// The configured target line height.
    pub fn target_line_height(&self) -> f64 {
        self.target_line_height
    }

    /// Normalizes one sample.
    ///
    /// The binary image is resized by `target_line_height / calibration_height`
    /// with nearest-neighbour sampling. The grayscale image and the mask are
    /// resized to exactly the binary's new shape, with Lanczos3 and
    /// nearest-neighbour sampling respectively, so shapes agree regardless of
    /// rounding. Both gray planes are inverted, the mask is encoded, and all
    /// outputs receive the same top/left edge padding.
    ///
    /// # Errors
    ///
    /// * `ConfigError` if `calibration_height` is not a finite positive number
    /// * `InvalidInput` if any input image is empty, or the binary image scales
    ///   to an empty image or beyond [`MAX_SCALED_DIMENSION`]
    /// * `GeometryInvariant` if an output shape is not stride aligned or the
    ///   image and mask shapes differ
    pub fn normalize(
        &self,
        binary: &GrayImage,
        image: &GrayImage,
        mask: Option<&RgbImage>,
        calibration_height: f64,
    ) -> DatasetResult<NormalizedSample> {
        let scale = resize_scale(self.target_line_height, calibration_height)?;

        let (src_w, src_h) = binary.dimensions();
        check_not_empty("binary image", (src_w, src_h))?;
        check_not_empty("grayscale image", image.dimensions())?;
        if let Some(m) = mask {
            check_not_empty("mask", m.dimensions())?;
        }
        let (width, height) = (scaled_dimension(src_w, scale)?, scaled_dimension(src_h, scale)?);
        if width == 0 || height == 0 {
            return Err(DatasetError::InvalidInput {
                message: format!(
                    "scale {scale} reduces a {src_w}x{src_h} image to {width}x{height}"
                ),
            });
        }

        let binary = invert_to_array(&imageops::resize(binary, width, height, FilterType::Nearest));
        let image = invert_to_array(&imageops::resize(image, width, height, FilterType::Lanczos3));
        let mask = mask.map(|m| {
            let resized = imageops::resize(m, width, height, FilterType::Nearest);
            if tracing::enabled!(tracing::Level::DEBUG) {
                let unmatched = color::unmatched_pixels(&resized);
                if unmatched > 0 {
                    debug!(
                        unmatched,
                        policy = ?self.unmatched_pixel_policy,
                        "mask contains colors outside the palette"
                    );
                }
            }
            color::encode_with_policy(&resized, self.unmatched_pixel_policy)
        });

        let resized_shape = binary.dim();
        let padding = padding_for(resized_shape);
        let binary = pad_edge(&binary, padding);
        let image = pad_edge(&image, padding);
        let mask = mask.map(|m| pad_edge(&m, padding));

        check_stride("image", image.dim())?;
        check_stride("binary", binary.dim())?;
        if let Some(ref m) = mask {
            check_stride("mask", m.dim())?;
            if m.dim() != image.dim() {
                return Err(DatasetError::geometry(format!(
                    "mask shape {:?} differs from image shape {:?}",
                    m.dim(),
                    image.dim()
                )));
            }
        }

        debug!(
            scale,
            resized = ?resized_shape,
            padded = ?binary.dim(),
            "normalized sample"
        );

        Ok(NormalizedSample {
            binary,
            image,
            mask,
            info: NormalizationInfo {
                scale,
                source_shape: (src_h as usize, src_w as usize),
                resized_shape,
                padding,
            },
        })
    }
}
