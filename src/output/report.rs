use crate::scoring::{finalize, ConfusionCounts, Metrics};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// End-of-run summary: counts, derived metrics and frame bookkeeping
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub frames_scored: usize,
    pub frames_skipped: usize,
    /// All pixels compared, unknown ones included
    pub pixels: u64,
    /// Pixels that are foreground in either mask
    pub union: u64,
    pub counts: ConfusionCounts,
    pub metrics: Metrics,
}

impl Report {
    pub fn new(counts: ConfusionCounts, frames_scored: usize, frames_skipped: usize) -> Self {
        Self {
            frames_scored,
            frames_skipped,
            pixels: counts.total(),
            union: counts.union(),
            metrics: finalize(&counts),
            counts,
        }
    }

    /// Human-readable report, one value per line
    pub fn render_text(&self) -> String {
        self.to_string()
    }

    /// Save the report; a `.json` extension selects JSON, anything else plain text
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let body = if is_json {
            serde_json::to_string_pretty(self).context("Failed to serialize report")?
        } else {
            self.render_text()
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, body)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;

        tracing::info!("Report saved to {}", path.display());
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.counts;
        let m = &self.metrics;

        writeln!(f, "Frames scored      = {}", self.frames_scored)?;
        writeln!(f, "Frames skipped     = {}", self.frames_skipped)?;
        writeln!(f, "N                  = {}", self.pixels)?;
        writeln!(f, "U                  = {}", self.union)?;
        writeln!(f, "TP                 = {}", c.true_positive)?;
        writeln!(f, "FP                 = {}", c.false_positive)?;
        writeln!(f, "TN                 = {}", c.true_negative)?;
        writeln!(f, "FN                 = {}", c.false_negative)?;
        writeln!(f, "Unknown            = {}", c.unknown)?;
        writeln!(f, "Recall             = {}", m.recall)?;
        writeln!(f, "Precision          = {}", m.precision)?;
        writeln!(f, "Fscore             = {}", m.fscore)?;
        writeln!(f, "Accuracy           = {}", m.accuracy)?;
        writeln!(f, "FalsePositiveRate  = {}", m.false_positive_rate)?;
        writeln!(f, "FalseNegativeRate  = {}", m.false_negative_rate)?;
        writeln!(f, "Specificity        = {}", m.specificity)?;
        writeln!(f, "SimilarityMeasure  = {}", m.similarity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Report {
        let counts = ConfusionCounts {
            true_positive: 0,
            false_positive: 16,
            true_negative: 0,
            false_negative: 0,
            unknown: 0,
        };
        Report::new(counts, 1, 0)
    }

    #[test]
    fn text_report_labels_undefined_metrics() {
        let report = sample();
        let text = report.render_text();

        assert_eq!(text, report.to_string());
        assert_eq!(text.lines().count(), 17);
        assert!(text.ends_with("SimilarityMeasure  = 0.000000\n"));
        assert!(text.contains("FP                 = 16"));
        assert!(text.contains("Recall             = undefined"));
        assert!(text.contains("Precision          = 0.000000"));
    }

    #[test]
    fn json_report_writes_null_for_undefined() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out/report.json");

        sample().save(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value["metrics"]["recall"].is_null());
        assert_eq!(value["metrics"]["precision"], serde_json::json!(0.0));
        assert_eq!(value["counts"]["false_positive"], serde_json::json!(16));
        assert_eq!(value["pixels"], serde_json::json!(16));
    }

    #[test]
    fn other_extensions_write_text() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("report.txt");

        sample().save(&path).unwrap();

        assert!(fs::read_to_string(&path).unwrap().starts_with("Frames scored"));
    }
}
