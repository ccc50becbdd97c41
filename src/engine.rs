//! Watermarking engine and batch driver.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::{debug, warn};

use crate::assets::{Variant, WatermarkAssets};
use crate::blending;
use crate::error::{Error, Result};
use crate::placement::{self, Position};
use crate::scoring;

/// JPEG quality used when none is configured.
pub const DEFAULT_QUALITY: u8 = 95;

/// Options controlling batch processing behavior.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// JPEG encoder quality (1-100).
    pub quality: u8,
    /// Enable verbose logging.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            verbose: false,
            quiet: false,
        }
    }
}

/// Where the mark went and which rendition was used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatermarkOutcome {
    /// Winning candidate position.
    pub position: Position,
    /// Mean intensity of the winning region.
    pub brightness: f64,
    /// Rendition that was applied.
    pub variant: Variant,
    /// Top-left corner of the pasted mark.
    pub origin: (u32, u32),
    /// Size of the pasted mark.
    pub size: (u32, u32),
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the processed file.
    pub path: PathBuf,
    /// Whether processing succeeded.
    pub success: bool,
    /// Placement details, when the image was watermarked.
    pub outcome: Option<WatermarkOutcome>,
    /// Human-readable status message.
    pub message: String,
}

impl ProcessResult {
    fn failed(path: &Path, message: String) -> Self {
        Self {
            path: path.to_path_buf(),
            success: false,
            outcome: None,
            message,
        }
    }
}

/// The watermark engine holding the shared watermark renditions.
///
/// Create once and reuse for every image in a batch. The renditions are never
/// modified; each image gets its own resized copy.
#[derive(Debug, Clone)]
pub struct WatermarkEngine {
    assets: WatermarkAssets,
}

impl WatermarkEngine {
    /// Create an engine from already-loaded renditions.
    #[must_use]
    pub fn new(assets: WatermarkAssets) -> Self {
        Self { assets }
    }

    /// Load the light and dark renditions from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssetMissing`] or [`Error::AssetDecode`] when either
    /// file is absent or unreadable.
    pub fn from_files(light: &Path, dark: &Path) -> Result<Self> {
        Ok(Self::new(WatermarkAssets::load(light, dark)?))
    }

    /// Borrow the shared renditions.
    #[must_use]
    pub fn assets(&self) -> &WatermarkAssets {
        &self.assets
    }

    /// Decide placement and rendition for an image without compositing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ImageTooSmall`] if the derived mark size is empty.
    pub fn plan(&self, image: &DynamicImage) -> Result<WatermarkOutcome> {
        let (w, h) = (image.width(), image.height());
        let (wm_w, wm_h) = blending::watermark_size(w, h);
        if wm_w == 0 || wm_h == 0 {
            return Err(Error::ImageTooSmall {
                width: w,
                height: h,
            });
        }

        let intensity = scoring::intensity_view(image);
        let placement = placement::find_best_position(&intensity);
        let variant = Variant::for_brightness(placement.brightness);
        let origin = blending::paste_origin(w, h, wm_w, wm_h, placement.position.center());

        debug!(
            position = %placement.position,
            brightness = placement.brightness,
            %variant,
            x = origin.0,
            y = origin.1,
            "planned watermark"
        );

        Ok(WatermarkOutcome {
            position: placement.position,
            brightness: placement.brightness,
            variant,
            origin,
            size: (wm_w, wm_h),
        })
    }

    /// Composite the watermark onto a copy of `image`.
    ///
    /// Returns the RGBA result and the placement that was used. The input and
    /// the shared renditions are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ImageTooSmall`] if the derived mark size is empty.
    pub fn add_watermark(&self, image: &DynamicImage) -> Result<(RgbaImage, WatermarkOutcome)> {
        let outcome = self.plan(image)?;
        let mut base = image.to_rgba8();

        let (wm_w, wm_h) = outcome.size;
        let mark = blending::resize_mark(self.assets.get(outcome.variant), wm_w, wm_h);
        blending::overlay_straight_alpha(&mut base, &mark, outcome.origin.0, outcome.origin.1);

        Ok((base, outcome))
    }

    /// Process a single image file: load, watermark, save.
    #[must_use]
    pub fn process_file(&self, input: &Path, output: &Path, opts: &ProcessOptions) -> ProcessResult {
        match self.try_process_file(input, output, opts) {
            Ok(outcome) => ProcessResult {
                path: input.to_path_buf(),
                success: true,
                outcome: Some(outcome),
                message: format!("{} {} watermark", outcome.position, outcome.variant),
            },
            Err(e) => {
                warn!(path = %input.display(), error = %e, "failed to watermark image");
                ProcessResult::failed(input, e.to_string())
            }
        }
    }

    fn try_process_file(
        &self,
        input: &Path,
        output: &Path,
        opts: &ProcessOptions,
    ) -> Result<WatermarkOutcome> {
        let dyn_img = decode_image(input)?;
        let (composited, outcome) = self.add_watermark(&dyn_img)?;

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        save_image(&composited, output, opts.quality)?;
        Ok(outcome)
    }

    /// Process every supported image directly inside `input_dir`.
    ///
    /// Files are handled one at a time in file-name order, and each output
    /// keeps its input's file name. A failure on one file does not stop the
    /// others.
    #[must_use]
    pub fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        opts: &ProcessOptions,
    ) -> Vec<ProcessResult> {
        let mut inputs = match list_images(input_dir) {
            Ok(paths) => paths,
            Err(e) => {
                return vec![ProcessResult::failed(
                    input_dir,
                    format!("Failed to read directory: {e}"),
                )];
            }
        };
        inputs.sort();

        // Create output directory
        if !output_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(output_dir) {
                return vec![ProcessResult::failed(
                    output_dir,
                    format!("Failed to create output directory: {e}"),
                )];
            }
        }

        inputs
            .iter()
            .filter_map(|input| {
                let filename = input.file_name()?;
                Some(self.process_file(input, &output_dir.join(filename), opts))
            })
            .collect()
    }
}

/// Regular files in `dir` (non-recursive) with a supported image extension.
fn list_images(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    Ok(std::fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .map(|e| e.path())
        .filter(|p| is_supported_image(p))
        .collect())
}

/// Decode an image, detecting its format from the file content rather than
/// the extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn decode_image(path: &Path) -> Result<DynamicImage> {
    let reader = image::ImageReader::open(path)?.with_guessed_format()?;
    Ok(reader.decode()?)
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "bmp"
        ),
        None => false,
    }
}

/// Flatten an RGBA image to opaque RGB and save it.
///
/// The format follows the file extension; JPEG uses the given quality.
///
/// # Errors
///
/// Returns an error if the format is unsupported or writing fails.
pub fn save_image(img: &RgbaImage, path: &Path, quality: u8) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    let rgb = blending::flatten(img);

    match format {
        ImageFormat::Jpeg => {
            let file = std::fs::File::create(path)?;
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, quality);
            encoder.encode_image(&rgb)?;
        }
        ImageFormat::Png | ImageFormat::Bmp => {
            rgb.save_with_format(path, format)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}
