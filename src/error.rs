use std::path::PathBuf;
use thiserror::Error;

/// Failures that can happen while pairing, loading, or persisting masks.
///
/// Dimension mismatches are not listed here: the predicted mask is resized
/// to the ground truth instead.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("mask file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("no foreground mask paired with ground truth {name}")]
    Unpaired { name: String },

    #[error("failed to read mask {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("mask {} has zero width or height", path.display())]
    EmptyMask { path: PathBuf },

    #[error("failed to write scorecard {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("no frame pairs found under {}", dir.display())]
    NoFramePairs { dir: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
