//! Batch-apply a logo watermark to photos.
//!
//! For each image, six candidate positions (the four corners plus the top and
//! bottom centers) are scored by how close their surrounding region is to
//! mid-gray and how much texture it carries. The best position gets the mark,
//! in a light or dark rendition chosen to contrast with the region beneath it.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use photo_watermark::{save_image, WatermarkEngine, DEFAULT_QUALITY};
//!
//! let engine = WatermarkEngine::from_files(
//!     Path::new("white_watermark.png"),
//!     Path::new("black_watermark.png"),
//! )
//! .expect("failed to load watermark assets");
//! let img = image::open("photo.jpg").unwrap();
//! let (marked, outcome) = engine.add_watermark(&img).unwrap();
//! println!("placed {} mark at {}", outcome.variant, outcome.position);
//! save_image(&marked, Path::new("marked.jpg"), DEFAULT_QUALITY).unwrap();
//! ```
//!
//! # Batches
//!
//! ```no_run
//! use std::path::Path;
//! use photo_watermark::{ProcessOptions, WatermarkEngine};
//!
//! let engine = WatermarkEngine::from_files(
//!     Path::new("white_watermark.png"),
//!     Path::new("black_watermark.png"),
//! )
//! .unwrap();
//! let results = engine.process_directory(Path::new("in"), Path::new("out"), &ProcessOptions::default());
//! let ok = results.iter().filter(|r| r.success).count();
//! println!("{ok} images watermarked");
//! ```

#![deny(missing_docs)]

pub mod assets;
pub mod blending;
mod engine;
pub mod error;
pub mod placement;
pub mod report;
pub mod scoring;

pub use assets::{Variant, WatermarkAssets};
pub use engine::{
    decode_image, is_supported_image, save_image, ProcessOptions, ProcessResult, WatermarkEngine,
    WatermarkOutcome, DEFAULT_QUALITY,
};
pub use error::{Error, Result};
pub use placement::{find_best_position, Placement, Position};
pub use report::{result_lines, BatchSummary};
pub use scoring::{score_region, RegionStats};
