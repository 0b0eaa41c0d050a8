use super::ScorecardSink;
use crate::error::EvalError;
use crate::scoring::Scorecard;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes each scorecard as an image file named after its ground truth frame
pub struct DirectorySink {
    dir: PathBuf,
    force_png: bool,
    written: usize,
}

impl DirectorySink {
    /// Open the output directory, creating it if absent
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create scorecard directory {}", dir.display()))?;

        tracing::info!("Writing scorecards to {}", dir.display());

        Ok(Self {
            dir: dir.to_path_buf(),
            force_png: false,
            written: 0,
        })
    }

    /// Always write PNG, replacing the ground truth extension.
    ///
    /// Lossy formats such as JPEG would otherwise blur the scorecard colors.
    pub fn force_png(mut self, force_png: bool) -> Self {
        self.force_png = force_png;
        self
    }

    /// Number of scorecards written so far
    pub fn written(&self) -> usize {
        self.written
    }
}

impl ScorecardSink for DirectorySink {
    fn write_scorecard(&mut self, name: &str, scorecard: &Scorecard) -> Result<()> {
        let path = if self.force_png {
            self.dir.join(Path::new(name).with_extension("png"))
        } else {
            // Format follows the extension of the ground truth file
            self.dir.join(name)
        };

        scorecard
            .save(&path)
            .map_err(|source| EvalError::Write {
                path: path.clone(),
                source,
            })?;

        self.written += 1;
        Ok(())
    }
}
