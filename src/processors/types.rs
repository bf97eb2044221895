//! Types used in geometric normalization
//!
//! This module defines the metadata describing what the normalizer did to a
//! sample: the applied scale, the resized shape and the stride padding.

/// Padding added in front of each axis.
///
/// Padding is always placed on the top rows and the left columns; the
/// trailing sides are never padded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaddingOffsets {
    /// Rows added above the image.
    pub top: usize,
    /// Columns added left of the image.
    pub left: usize,
}

impl PaddingOffsets {
    /// Creates padding offsets.
    pub fn new(top: usize, left: usize) -> Self {
        Self { top, left }
    }

    /// Returns `true` if no padding is applied.
    pub fn is_zero(&self) -> bool {
        self.top == 0 && self.left == 0
    }
}

/// Information about the geometric normalization of one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationInfo {
    /// Resize factor `target_line_height / calibration_height`.
    pub scale: f64,
    /// Original image shape as `(height, width)`.
    pub source_shape: (usize, usize),
    /// Shape after resizing and before padding, as `(height, width)`.
    pub resized_shape: (usize, usize),
    /// Stride padding applied after resizing.
    pub padding: PaddingOffsets,
}

impl NormalizationInfo {
    /// Final `(height, width)` after padding.
    pub fn padded_shape(&self) -> (usize, usize) {
        (
            self.resized_shape.0 + self.padding.top,
            self.resized_shape.1 + self.padding.left,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_shape() {
        let info = NormalizationInfo {
            scale: 0.5,
            source_shape: (200, 250),
            resized_shape: (100, 125),
            padding: PaddingOffsets::new(4, 3),
        };
        assert_eq!(info.padded_shape(), (104, 128));
    }

    #[test]
    fn test_padding_is_zero() {
        assert!(PaddingOffsets::default().is_zero());
        assert!(!PaddingOffsets::new(0, 1).is_zero());
    }
}
