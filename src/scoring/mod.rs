mod align;
mod classify;
pub mod metrics;
pub mod types;

pub use align::{align_to_ground_truth, ResizeFilter};
pub use classify::{Binarization, ScorecardStyle, SegmentationScorer};
pub use metrics::{finalize, Metrics, Score};
pub use types::{
    ConfusionCounts, FrameCounts, Mask, PixelClass, Scorecard, MASK_BACKGROUND, MASK_FOREGROUND,
};
