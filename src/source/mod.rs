mod directory;

pub use directory::{load_mask, DirectoryPairs, Pairing};

use crate::error::EvalError;
use crate::scoring::Mask;
use std::path::PathBuf;

/// A ground truth file and the predicted mask file it is scored against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePair {
    /// Ground truth file name; also names the scorecard written for this frame
    pub name: String,
    pub ground_truth: PathBuf,
    /// `None` when no predicted file could be paired; loading such a pair fails
    pub predicted: Option<PathBuf>,
}

/// Both masks of a frame pair, decoded to single channel
#[derive(Debug, Clone)]
pub struct LoadedPair {
    pub ground_truth: Mask,
    pub predicted: Mask,
}

/// Trait for sources of (ground truth, predicted) mask pairs
///
/// Must be `Sync` so frames can be loaded from several worker threads.
pub trait FramePairSource: Sync {
    /// Frame pairs in processing order
    fn pairs(&self) -> &[FramePair];

    /// Load both masks of a pair
    fn load(&self, pair: &FramePair) -> Result<LoadedPair, EvalError>;
}
