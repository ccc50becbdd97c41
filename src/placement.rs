//! Candidate positions and best-position selection.
//!
//! Six fixed centers are scored by how close their region brightness is to
//! mid-gray and how much texture they carry:
//!
//! - `brightness_score = 1 - |brightness - 128| / 128`
//! - `contrast_score = min(contrast / 64, 1)`
//! - `score = 0.6 * brightness_score + 0.4 * contrast_score`

use std::fmt;

use image::GrayImage;
use tracing::debug;

use crate::scoring::{score_region, RegionStats, DEFAULT_REGION_RATIO};

/// Weight of brightness-centeredness in the composite score.
const BRIGHTNESS_WEIGHT: f64 = 0.6;
/// Weight of normalized contrast in the composite score.
const CONTRAST_WEIGHT: f64 = 0.4;
/// Brightness at which the brightness score peaks.
const MID_GRAY: f64 = 128.0;
/// Contrast at which the contrast score saturates.
const CONTRAST_SATURATION: f64 = 64.0;

/// A candidate watermark position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// Center at (0.1, 0.1).
    TopLeft,
    /// Center at (0.5, 0.1).
    TopCenter,
    /// Center at (0.9, 0.1).
    TopRight,
    /// Center at (0.1, 0.9).
    BottomLeft,
    /// Center at (0.5, 0.9).
    BottomCenter,
    /// Center at (0.9, 0.9).
    BottomRight,
}

impl Position {
    /// All candidates in evaluation order.
    pub const ALL: [Position; 6] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Normalized `(x, y)` center of this candidate.
    #[must_use]
    pub fn center(self) -> (f64, f64) {
        match self {
            Position::TopLeft => (0.1, 0.1),
            Position::TopCenter => (0.5, 0.1),
            Position::TopRight => (0.9, 0.1),
            Position::BottomLeft => (0.1, 0.9),
            Position::BottomCenter => (0.5, 0.9),
            Position::BottomRight => (0.9, 0.9),
        }
    }

    /// Index of this candidate in [`Position::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Position::TopLeft => "top-left",
            Position::TopCenter => "top-center",
            Position::TopRight => "top-right",
            Position::BottomLeft => "bottom-left",
            Position::BottomCenter => "bottom-center",
            Position::BottomRight => "bottom-right",
        };
        f.write_str(name)
    }
}

/// Score of one candidate for one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateScore {
    /// The candidate that was scored.
    pub position: Position,
    /// Composite score, at most 1.0.
    pub score: f64,
    /// Mean intensity of the candidate's region.
    pub brightness: f64,
}

/// The selected position and the brightness beneath it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Winning candidate.
    pub position: Position,
    /// Raw mean intensity of the winning region.
    pub brightness: f64,
}

/// Combine region brightness and contrast into a single score.
///
/// Brightness outside `[0, 255]` is not clamped.
#[must_use]
pub fn composite_score(stats: RegionStats) -> f64 {
    let brightness_score = 1.0 - (stats.brightness - MID_GRAY).abs() / MID_GRAY;
    let contrast_score = (stats.contrast / CONTRAST_SATURATION).min(1.0);
    BRIGHTNESS_WEIGHT * brightness_score + CONTRAST_WEIGHT * contrast_score
}

/// Score every candidate, in [`Position::ALL`] order.
#[must_use]
pub fn score_candidates(intensity: &GrayImage) -> [CandidateScore; 6] {
    Position::ALL.map(|position| {
        let stats = score_region(intensity, position.center(), DEFAULT_REGION_RATIO);
        CandidateScore {
            position,
            score: composite_score(stats),
            brightness: stats.brightness,
        }
    })
}

/// Pick the best-scoring candidate.
///
/// The first candidate reaching the maximum wins; later candidates must score
/// strictly higher to replace it.
#[must_use]
pub fn find_best_position(intensity: &GrayImage) -> Placement {
    let scores = score_candidates(intensity);

    let mut best_score = -1.0_f64;
    let mut best = scores[0];
    for candidate in scores {
        debug!(
            position = %candidate.position,
            score = candidate.score,
            brightness = candidate.brightness,
            "scored candidate"
        );
        if candidate.score > best_score {
            best_score = candidate.score;
            best = candidate;
        }
    }

    Placement {
        position: best.position,
        brightness: best.brightness,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Fill the scored region around `position` with `value`.
    fn paint_region(img: &mut GrayImage, position: Position, value: u8) {
        let (w, h) = img.dimensions();
        let region =
            crate::scoring::Region::around(w, h, position.center(), DEFAULT_REGION_RATIO).unwrap();
        for y in region.y1..region.y2 {
            for x in region.x1..region.x2 {
                img.put_pixel(x, y, Luma([value]));
            }
        }
    }

    #[test]
    fn indices_match_evaluation_order() {
        for (i, p) in Position::ALL.iter().enumerate() {
            assert_eq!(p.index(), i);
        }
        assert_eq!(Position::BottomRight.center(), (0.9, 0.9));
    }

    #[test]
    fn composite_score_peaks_at_mid_gray() {
        let mid = composite_score(RegionStats {
            brightness: 128.0,
            contrast: 0.0,
        });
        assert!((mid - 0.6).abs() < 1e-12);

        let black = composite_score(RegionStats {
            brightness: 0.0,
            contrast: 0.0,
        });
        assert!(black.abs() < 1e-12);

        let textured = composite_score(RegionStats {
            brightness: 128.0,
            contrast: 500.0,
        });
        assert!((textured - 1.0).abs() < 1e-12);
    }

    #[test]
    fn uniform_mid_gray_picks_first_candidate() {
        let img = GrayImage::from_pixel(1000, 800, Luma([128]));
        let placement = find_best_position(&img);
        assert_eq!(placement.position, Position::TopLeft);
        assert_eq!(placement.position.index(), 0);
        assert!((placement.brightness - 128.0).abs() < 1e-9);
    }

    #[test]
    fn ties_go_to_earliest_candidate() {
        // Black everywhere except two mid-gray regions scoring identically.
        let mut img = GrayImage::from_pixel(500, 500, Luma([0]));
        paint_region(&mut img, Position::BottomCenter, 128);
        paint_region(&mut img, Position::TopRight, 128);

        let scores = score_candidates(&img);
        assert!((scores[2].score - scores[4].score).abs() < 1e-12);

        let placement = find_best_position(&img);
        assert_eq!(placement.position, Position::TopRight);
    }

    #[test]
    fn best_scoring_region_wins() {
        let mut img = GrayImage::from_pixel(400, 300, Luma([250]));
        paint_region(&mut img, Position::BottomLeft, 120);

        let placement = find_best_position(&img);
        assert_eq!(placement.position, Position::BottomLeft);
        assert!((placement.brightness - 120.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_image_still_returns_valid_index() {
        let img = GrayImage::from_pixel(3, 3, Luma([255]));
        let placement = find_best_position(&img);
        assert!(placement.position.index() <= 5);
        // Every region is empty, every score is 0, so the first wins.
        assert_eq!(placement.position, Position::TopLeft);
        assert!(placement.brightness.abs() < 1e-12);
    }
}
