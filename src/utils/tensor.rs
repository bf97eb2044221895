//! Conversion of normalized planes to model input tensors.

use ndarray::{Array2, Array4, Axis};

/// Wraps a single `H×W` plane as a `1×H×W×1` NHWC batch.
pub fn to_batch_tensor(plane: &Array2<f32>) -> Array4<f32> {
    plane
        .clone()
        .insert_axis(Axis(0))
        .insert_axis(Axis(3))
}
