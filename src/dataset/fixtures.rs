//! On-disk dataset fixtures for tests.

use super::SampleRecord;
use image::{GrayImage, Luma, Rgb, RgbImage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub(crate) struct DatasetFixture {
    dir: TempDir,
}

impl DatasetFixture {
    /// Creates a dataset root with empty `binary_images`, `images` and `masks`.
    pub(crate) fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["binary_images", "images", "masks"] {
            std::fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        Self { dir }
    }

    pub(crate) fn root(&self) -> &Path {
        self.dir.path()
    }

    pub(crate) fn path(&self, sub: &str, file: &str) -> PathBuf {
        self.dir.path().join(sub).join(file)
    }

    /// Writes one sample triple named after `name`.
    ///
    /// The mask is red in the top half and green in the bottom half; the
    /// binary page has a single black text stroke on white.
    pub(crate) fn add_sample(
        &self,
        name: &str,
        width: u32,
        height: u32,
        calibration_height: f64,
    ) -> SampleRecord {
        let mut binary = GrayImage::from_pixel(width, height, Luma([255]));
        for x in 0..width {
            binary.put_pixel(x, height / 2, Luma([0]));
        }
        let image = GrayImage::from_pixel(width, height, Luma([200]));
        let mask = RgbImage::from_fn(width, height, |_, y| {
            if y < height / 2 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 255, 0])
            }
        });

        let record = SampleRecord::new(
            self.path("binary_images", &format!("{name}.bin.png")),
            self.path("images", &format!("{name}.png")),
            self.path("masks", &format!("{name}_MASK.png")),
            calibration_height,
        );
        binary.save(&record.binary_path).unwrap();
        image.save(&record.image_path).unwrap();
        mask.save(&record.mask_path).unwrap();
        record
    }

    /// Writes `normalizations/<name>.json` with the given `char_height`.
    pub(crate) fn add_normalization(&self, name: &str, char_height: f64) {
        let dir = self.dir.path().join("normalizations");
        std::fs::create_dir_all(&dir).unwrap();
        let body = serde_json::json!({ "char_height": char_height });
        std::fs::write(dir.join(format!("{name}.json")), body.to_string()).unwrap();
    }
}
