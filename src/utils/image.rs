//! Image loading and preview helpers.

use crate::core::errors::{DatasetError, DatasetResult};
use image::{GrayImage, Luma, RgbImage};
use ndarray::Array2;
use std::path::Path;

/// Loads an image as a single-channel 8-bit luma image.
pub fn load_gray_image(path: impl AsRef<Path>) -> DatasetResult<GrayImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|e| DatasetError::image_load(path, e))?;
    Ok(img.to_luma8())
}

/// Loads an image as 8-bit RGB, dropping any alpha channel.
pub fn load_rgb_image(path: impl AsRef<Path>) -> DatasetResult<RgbImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|e| DatasetError::image_load(path, e))?;
    Ok(img.to_rgb8())
}

/// Renders an inverted `[0, 1]` plane back to a gray image (ink dark, paper white).
pub fn plane_to_gray_image(plane: &Array2<f32>) -> GrayImage {
    let (height, width) = plane.dim();
    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        let v = (1.0 - plane[[y as usize, x as usize]]).clamp(0.0, 1.0);
        Luma([(v * 255.0).round() as u8])
    })
}

/// Writes an image, creating parent directories as needed.
pub fn save_image<P, C>(img: &image::ImageBuffer<P, C>, path: impl AsRef<Path>) -> DatasetResult<()>
where
    P: image::Pixel + image::PixelWithColorType,
    [P::Subpixel]: image::EncodableLayout,
    C: std::ops::Deref<Target = [P::Subpixel]>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| DatasetError::io(parent, e))?;
    }
    img.save(path).map_err(|e| DatasetError::ImageWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
