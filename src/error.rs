//! Error types for the photo-watermark crate.

use std::path::PathBuf;

use crate::assets::Variant;

/// Errors that can occur while loading watermark assets or processing photos.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A watermark asset file does not exist.
    #[error("{variant} watermark file not found: {}", .path.display())]
    AssetMissing {
        /// Which rendition was being loaded.
        variant: Variant,
        /// Path that was looked up.
        path: PathBuf,
    },

    /// A watermark asset file exists but could not be decoded.
    #[error("failed to decode {variant} watermark: {source}")]
    AssetDecode {
        /// Which rendition was being loaded.
        variant: Variant,
        /// Underlying decoder error.
        source: image::ImageError,
    },

    /// The image is too small to derive a non-empty watermark size.
    #[error("image too small ({width}x{height}) for a watermark")]
    ImageTooSmall {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The output image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred during image decoding or encoding.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
