//! Watermark renditions and light/dark selection.

use std::fmt;
use std::path::Path;

use image::RgbaImage;
use tracing::debug;

use crate::error::{Error, Result};

/// Region brightness below which the light rendition is used.
const LIGHT_BELOW: f64 = 128.0;

/// Which color rendition of the watermark to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// White mark, for dark backgrounds.
    Light,
    /// Black mark, for bright backgrounds.
    Dark,
}

impl Variant {
    /// Choose the rendition that contrasts with a region of the given mean
    /// brightness. Exactly 128 selects [`Variant::Dark`].
    #[must_use]
    pub fn for_brightness(region_brightness: f64) -> Self {
        if region_brightness < LIGHT_BELOW {
            Variant::Light
        } else {
            Variant::Dark
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Light => f.write_str("light"),
            Variant::Dark => f.write_str("dark"),
        }
    }
}

/// The light and dark watermark images, loaded once and shared read-only.
#[derive(Debug, Clone)]
pub struct WatermarkAssets {
    light: RgbaImage,
    dark: RgbaImage,
}

impl WatermarkAssets {
    /// Wrap already-decoded renditions.
    #[must_use]
    pub fn new(light: RgbaImage, dark: RgbaImage) -> Self {
        Self { light, dark }
    }

    /// Load both renditions from disk, converting them to RGBA.
    ///
    /// The dark file is checked first, then the light one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssetMissing`] if either file does not exist and
    /// [`Error::AssetDecode`] if either cannot be decoded.
    pub fn load(light_path: &Path, dark_path: &Path) -> Result<Self> {
        for (variant, path) in [(Variant::Dark, dark_path), (Variant::Light, light_path)] {
            if !path.is_file() {
                return Err(Error::AssetMissing {
                    variant,
                    path: path.to_path_buf(),
                });
            }
        }

        let dark = load_rgba(Variant::Dark, dark_path)?;
        let light = load_rgba(Variant::Light, light_path)?;
        Ok(Self { light, dark })
    }

    /// Borrow the rendition for `variant`.
    #[must_use]
    pub fn get(&self, variant: Variant) -> &RgbaImage {
        match variant {
            Variant::Light => &self.light,
            Variant::Dark => &self.dark,
        }
    }
}

fn load_rgba(variant: Variant, path: &Path) -> Result<RgbaImage> {
    let img = image::ImageReader::open(path)
        .and_then(image::ImageReader::with_guessed_format)
        .map_err(image::ImageError::IoError)
        .and_then(image::ImageReader::decode)
        .map_err(|source| Error::AssetDecode { variant, source })?
        .to_rgba8();
    debug!(
        %variant,
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "loaded watermark asset"
    );
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn brightness_threshold_is_non_strict_for_dark() {
        assert_eq!(Variant::for_brightness(0.0), Variant::Light);
        assert_eq!(Variant::for_brightness(127.9), Variant::Light);
        assert_eq!(Variant::for_brightness(128.0), Variant::Dark);
        assert_eq!(Variant::for_brightness(200.0), Variant::Dark);
    }

    #[test]
    fn get_returns_matching_rendition() {
        let light = RgbaImage::from_pixel(3, 2, Rgba([255, 255, 255, 255]));
        let dark = RgbaImage::from_pixel(3, 2, Rgba([0, 0, 0, 255]));
        let assets = WatermarkAssets::new(light, dark);
        assert_eq!(assets.get(Variant::Light).get_pixel(0, 0)[0], 255);
        assert_eq!(assets.get(Variant::Dark).get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn load_reports_missing_dark_first() {
        let err = WatermarkAssets::load(
            Path::new("/nonexistent/white.png"),
            Path::new("/nonexistent/black.png"),
        )
        .unwrap_err();
        match err {
            Error::AssetMissing { variant, path } => {
                assert_eq!(variant, Variant::Dark);
                assert_eq!(path, Path::new("/nonexistent/black.png"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
