//! Region brightness and contrast measurement.
//!
//! A region is a rectangle sampled around a normalized center point. Its
//! brightness is the mean luma of the covered pixels and its contrast is the
//! population standard deviation of the same values.

use image::{DynamicImage, GrayImage, Luma};

/// Side length of a scored region as a fraction of the image dimensions.
pub const DEFAULT_REGION_RATIO: f64 = 0.2;

/// Luma weights for R, G and B.
const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Brightness and contrast of a sampled region.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RegionStats {
    /// Mean intensity in `[0, 255]`.
    pub brightness: f64,
    /// Population standard deviation of intensity.
    pub contrast: f64,
}

/// Pixel bounds of a region, half-open on the right and bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Left edge (inclusive).
    pub x1: u32,
    /// Top edge (inclusive).
    pub y1: u32,
    /// Right edge (exclusive).
    pub x2: u32,
    /// Bottom edge (exclusive).
    pub y2: u32,
}

impl Region {
    /// Compute clamped bounds for a region centered at `center` (normalized
    /// coordinates) covering `size_ratio` of each image dimension.
    ///
    /// Returns `None` when the clamped region has no area.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn around(width: u32, height: u32, center: (f64, f64), size_ratio: f64) -> Option<Self> {
        let (x1, x2) = axis_bounds(width, center.0, size_ratio);
        let (y1, y2) = axis_bounds(height, center.1, size_ratio);

        if x1 >= x2 || y1 >= y2 {
            return None;
        }

        Some(Self {
            x1: x1 as u32,
            y1: y1 as u32,
            x2: x2 as u32,
            y2: y2 as u32,
        })
    }

    /// Number of pixels covered.
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.x2 - self.x1) * u64::from(self.y2 - self.y1)
    }
}

/// Clamped `[start, end)` along one axis. May be empty or inverted.
#[allow(clippy::cast_possible_truncation)]
fn axis_bounds(extent: u32, center_ratio: f64, size_ratio: f64) -> (i64, i64) {
    let extent_f = f64::from(extent);
    let span = (extent_f * size_ratio).floor() as i64;
    let center = (extent_f * center_ratio).floor() as i64;
    let half = span.div_euclid(2);

    let start = (center - half).max(0);
    let end = (center + half).min(i64::from(extent));
    (start, end)
}

/// Convert an image to a single-channel intensity view.
///
/// 8-bit grayscale images are used as-is. Everything else goes through RGB
/// and the weights `0.299*R + 0.587*G + 0.114*B`, rounded to the nearest
/// integer. Alpha is ignored.
#[must_use]
pub fn intensity_view(image: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = image {
        return gray.clone();
    }

    let rgb = image.to_rgb8();
    let mut gray = GrayImage::new(rgb.width(), rgb.height());
    for (src, dst) in rgb.pixels().zip(gray.pixels_mut()) {
        let lum = LUMA_WEIGHTS[0] * f32::from(src[0])
            + LUMA_WEIGHTS[1] * f32::from(src[1])
            + LUMA_WEIGHTS[2] * f32::from(src[2]);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            *dst = Luma([lum.round().clamp(0.0, 255.0) as u8]);
        }
    }
    gray
}

/// Measure brightness and contrast of the region around `center`.
///
/// A region with zero area after clamping yields `RegionStats::default()`,
/// i.e. `(0, 0)`.
#[must_use]
pub fn score_region(intensity: &GrayImage, center: (f64, f64), size_ratio: f64) -> RegionStats {
    let Some(region) = Region::around(intensity.width(), intensity.height(), center, size_ratio)
    else {
        return RegionStats::default();
    };

    #[allow(clippy::cast_precision_loss)]
    let n = region.area() as f64;

    let mut sum = 0.0_f64;
    for y in region.y1..region.y2 {
        for x in region.x1..region.x2 {
            sum += f64::from(intensity.get_pixel(x, y)[0]);
        }
    }
    let mean = sum / n;

    let mut sq_dev = 0.0_f64;
    for y in region.y1..region.y2 {
        for x in region.x1..region.x2 {
            let d = f64::from(intensity.get_pixel(x, y)[0]) - mean;
            sq_dev += d * d;
        }
    }

    RegionStats {
        brightness: mean,
        contrast: (sq_dev / n).sqrt(),
    }
}
