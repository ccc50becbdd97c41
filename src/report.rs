//! Console lines for batch results.

use crate::engine::ProcessResult;

/// Success and failure counts for a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files watermarked and written.
    pub processed: usize,
    /// Files that failed and were skipped.
    pub failed: usize,
}

impl BatchSummary {
    /// Tally a batch.
    #[must_use]
    pub fn from_results(results: &[ProcessResult]) -> Self {
        let processed = results.iter().filter(|r| r.success).count();
        Self {
            processed,
            failed: results.len() - processed,
        }
    }

    /// Total number of files attempted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.processed + self.failed
    }

    /// `[Summary] Processed: N[, Failed: M] (Total: T)`.
    #[must_use]
    pub fn line(&self) -> String {
        let mut line = format!("[Summary] Processed: {}", self.processed);
        if self.failed > 0 {
            line.push_str(&format!(", Failed: {}", self.failed));
        }
        line.push_str(&format!(" (Total: {})", self.total()));
        line
    }
}

/// Lines describing one file: `[OK] name` or `[FAIL] name: detail`, plus a
/// placement detail line for successes when `verbose` is set.
#[must_use]
pub fn result_lines(result: &ProcessResult, verbose: bool) -> Vec<String> {
    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if !result.success {
        return vec![format!("[FAIL] {filename}: {}", result.message)];
    }

    let mut lines = vec![format!("[OK] {filename}")];
    if verbose {
        if let Some(o) = &result.outcome {
            lines.push(format!(
                "  -> {} at {} (brightness {:.1}), {}x{} at ({}, {})",
                o.variant, o.position, o.brightness, o.size.0, o.size.1, o.origin.0, o.origin.1
            ));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::assets::Variant;
    use crate::engine::WatermarkOutcome;
    use crate::placement::Position;

    fn ok(name: &str) -> ProcessResult {
        ProcessResult {
            path: PathBuf::from("/in").join(name),
            success: true,
            outcome: Some(WatermarkOutcome {
                position: Position::BottomRight,
                brightness: 42.0,
                variant: Variant::Light,
                origin: (850, 687),
                size: (100, 66),
            }),
            message: String::new(),
        }
    }

    fn failed(name: &str, message: &str) -> ProcessResult {
        ProcessResult {
            path: PathBuf::from("/in").join(name),
            success: false,
            outcome: None,
            message: message.to_string(),
        }
    }

    #[test]
    fn summary_line_omits_failed_when_zero() {
        let summary = BatchSummary::from_results(&[ok("a.jpg"), ok("b.png")]);
        assert_eq!(summary.line(), "[Summary] Processed: 2 (Total: 2)");
    }

    #[test]
    fn summary_line_counts_failures() {
        let results = [ok("a.jpg"), failed("broken.png", "bad"), ok("c.bmp"), ok("d.jpg")];
        let summary = BatchSummary::from_results(&results);
        assert_eq!(summary, BatchSummary { processed: 3, failed: 1 });
        assert_eq!(summary.line(), "[Summary] Processed: 3, Failed: 1 (Total: 4)");
    }

    #[test]
    fn result_lines_show_file_name_only() {
        assert_eq!(result_lines(&ok("a.jpg"), false), vec!["[OK] a.jpg"]);
        assert_eq!(
            result_lines(&failed("broken.png", "invalid signature"), true),
            vec!["[FAIL] broken.png: invalid signature"]
        );
    }

    #[test]
    fn verbose_adds_placement_detail() {
        let lines = result_lines(&ok("a.jpg"), true);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "  -> light at bottom-right (brightness 42.0), 100x66 at (850, 687)"
        );
    }
}
