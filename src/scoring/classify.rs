use super::align::{align_to_ground_truth, ResizeFilter};
use super::types::{
    FrameCounts, Mask, PixelClass, Scorecard, MASK_BACKGROUND, MASK_FOREGROUND,
};
use image::Rgb;

/// How raw mask values are mapped onto background/foreground before classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Binarization {
    /// Only exact 0 and 255 are meaningful; any other value makes the pixel `Unknown`
    #[default]
    Strict,
    /// Values `>= threshold` are foreground, everything else background
    Threshold(u8),
}

impl Binarization {
    /// Map a raw mask value to 0/255, or `None` if it cannot be classified
    pub fn normalize(self, value: u8) -> Option<u8> {
        match self {
            Binarization::Strict => match value {
                MASK_BACKGROUND | MASK_FOREGROUND => Some(value),
                _ => None,
            },
            Binarization::Threshold(threshold) => Some(if value >= threshold {
                MASK_FOREGROUND
            } else {
                MASK_BACKGROUND
            }),
        }
    }

    /// Classify one (ground truth, predicted) pixel pair
    pub fn classify(self, ground_truth: u8, predicted: u8) -> PixelClass {
        match (self.normalize(ground_truth), self.normalize(predicted)) {
            (Some(MASK_FOREGROUND), Some(MASK_FOREGROUND)) => PixelClass::TruePositive,
            (Some(MASK_BACKGROUND), Some(MASK_FOREGROUND)) => PixelClass::FalsePositive,
            (Some(MASK_BACKGROUND), Some(MASK_BACKGROUND)) => PixelClass::TrueNegative,
            (Some(MASK_FOREGROUND), Some(MASK_BACKGROUND)) => PixelClass::FalseNegative,
            _ => PixelClass::Unknown,
        }
    }
}

/// Color scheme used to paint the per-frame scorecard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ScorecardStyle {
    /// White = TP, red = FP, black = TN, green = FN, blue = unknown
    #[default]
    Falsecolor,
    /// Gray levels: TP = 30, FP = 255, TN = 0, FN = 100, unknown = 200
    Roc,
}

impl ScorecardStyle {
    pub fn color(self, class: PixelClass) -> Rgb<u8> {
        match self {
            ScorecardStyle::Falsecolor => match class {
                PixelClass::TruePositive => Rgb([255, 255, 255]),
                PixelClass::FalsePositive => Rgb([255, 0, 0]),
                PixelClass::TrueNegative => Rgb([0, 0, 0]),
                PixelClass::FalseNegative => Rgb([0, 255, 0]),
                PixelClass::Unknown => Rgb([0, 0, 255]),
            },
            ScorecardStyle::Roc => {
                let level = match class {
                    PixelClass::TruePositive => 30,
                    PixelClass::FalsePositive => 255,
                    PixelClass::TrueNegative => 0,
                    PixelClass::FalseNegative => 100,
                    PixelClass::Unknown => 200,
                };
                Rgb([level, level, level])
            }
        }
    }
}

/// Compares predicted foreground masks against ground truth, one frame pair at a time.
///
/// The scorer holds only configuration; running totals are owned by the caller
/// and merged with [`ConfusionCounts::accumulate`](super::ConfusionCounts::accumulate).
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentationScorer {
    binarization: Binarization,
    resize_filter: ResizeFilter,
    style: ScorecardStyle,
}

impl SegmentationScorer {
    pub fn new(
        binarization: Binarization,
        resize_filter: ResizeFilter,
        style: ScorecardStyle,
    ) -> Self {
        Self {
            binarization,
            resize_filter,
            style,
        }
    }

    pub fn binarization(&self) -> Binarization {
        self.binarization
    }

    /// Classify every pixel of a frame pair
    ///
    /// # Arguments
    /// * `ground_truth` - Reference mask; defines the output dimensions
    /// * `predicted` - Foreground mask under evaluation; resized first if its size differs
    ///
    /// Returns the scorecard image and this frame's counts (not yet merged
    /// into any running total)
    pub fn classify_frame_pair(
        &self,
        ground_truth: &Mask,
        predicted: &Mask,
    ) -> (Scorecard, FrameCounts) {
        let _span = tracing::debug_span!("classify").entered();

        let predicted = align_to_ground_truth(ground_truth, predicted, self.resize_filter);

        let (width, height) = ground_truth.dimensions();
        let mut scorecard = Scorecard::new(width, height);
        let mut counts = FrameCounts::new();

        for ((gt, fg), out) in ground_truth
            .pixels()
            .zip(predicted.pixels())
            .zip(scorecard.pixels_mut())
        {
            let class = self.binarization.classify(gt[0], fg[0]);
            counts.record(class);
            *out = self.style.color(class);
        }

        (scorecard, counts)
    }
}
