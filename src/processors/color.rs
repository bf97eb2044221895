//! Conversion between color-coded label masks and integer class maps.
//!
//! Label masks are RGB images whose exact pixel colors encode semantic classes.
//! Several colors map to the same class, so decoding a class map renders one
//! canonical display color per class instead of the original mask colors.

use image::{Rgb, RgbImage};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Dense per-pixel class ids in `(height, width)` layout.
pub type ClassMap = Array2<i32>;

/// Number of distinct classes produced by [`encode`].
pub const NUM_CLASSES: usize = 4;

/// A palette color and the class it encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    /// Exact RGB value in the mask.
    pub color: [u8; 3],
    /// Class id assigned to pixels of this color.
    pub class_id: i32,
}

impl PaletteEntry {
    const fn new(color: [u8; 3], class_id: i32) -> Self {
        Self { color, class_id }
    }

    /// Packed `R * 65536 + G * 256 + B` key of this entry's color.
    pub const fn key(&self) -> u32 {
        pack_rgb(self.color)
    }
}

/// Mask colors and their class ids.
pub const PALETTE: [PaletteEntry; 10] = [
    PaletteEntry::new([0, 0, 0], 0),
    PaletteEntry::new([255, 255, 255], 0),
    PaletteEntry::new([255, 0, 0], 1),
    PaletteEntry::new([0, 255, 0], 2),
    PaletteEntry::new([0, 0, 255], 1),
    PaletteEntry::new([255, 0, 255], 1),
    PaletteEntry::new([255, 255, 0], 3),
    PaletteEntry::new([128, 0, 0], 1),
    PaletteEntry::new([0, 255, 255], 1),
    PaletteEntry::new([128, 128, 0], 2),
];

/// Display color of each class id, indexed by class.
pub const CLASS_COLORS: [[u8; 3]; NUM_CLASSES] = [
    [255, 255, 255],
    [255, 0, 0],
    [0, 255, 0],
    [255, 255, 0],
];

/// How mask pixels whose color is not in [`PALETTE`] are labeled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPixelPolicy {
    /// Unmatched pixels receive class 0, indistinguishable from background.
    #[default]
    Background,
}

impl UnmatchedPixelPolicy {
    fn class_id(self) -> i32 {
        match self {
            UnmatchedPixelPolicy::Background => 0,
        }
    }
}

/// Packs an RGB triple into a single integer key.
#[inline]
pub const fn pack_rgb(rgb: [u8; 3]) -> u32 {
    (rgb[0] as u32) * 65536 + (rgb[1] as u32) * 256 + rgb[2] as u32
}

#[inline]
fn lookup(key: u32) -> Option<i32> {
    PALETTE
        .iter()
        .find(|entry| entry.key() == key)
        .map(|entry| entry.class_id)
}

/// Encodes an RGB label mask into a class map using the default policy.
pub fn encode(mask: &RgbImage) -> ClassMap {
    encode_with_policy(mask, UnmatchedPixelPolicy::default())
}

/// Encodes an RGB label mask into a class map.
///
/// Pixels exactly matching a palette color get that color's class id; all
/// other pixels are labeled according to `policy`.
pub fn encode_with_policy(mask: &RgbImage, policy: UnmatchedPixelPolicy) -> ClassMap {
    let (width, height) = mask.dimensions();
    let fallback = policy.class_id();
    Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
        let Rgb(rgb) = *mask.get_pixel(x as u32, y as u32);
        lookup(pack_rgb(rgb)).unwrap_or(fallback)
    })
}

/// Counts the mask pixels whose color is not in [`PALETTE`].
pub fn unmatched_pixels(mask: &RgbImage) -> usize {
    mask.pixels()
        .filter(|Rgb(rgb)| lookup(pack_rgb(*rgb)).is_none())
        .count()
}

/// Renders a class map as an RGB image using [`CLASS_COLORS`].
///
/// Values outside `0..NUM_CLASSES` are rendered black.
pub fn decode(classes: &ClassMap) -> RgbImage {
    let (height, width) = classes.dim();
    let mut out = RgbImage::new(width as u32, height as u32);
    for ((y, x), &class_id) in classes.indexed_iter() {
        let color = usize::try_from(class_id)
            .ok()
            .and_then(|c| CLASS_COLORS.get(c))
            .copied()
            .unwrap_or([0, 0, 0]);
        out.put_pixel(x as u32, y as u32, Rgb(color));
    }
    out
}
