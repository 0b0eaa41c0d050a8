use image::{GrayImage, RgbImage};
use serde::Serialize;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Single-channel segmentation mask: 0 = background, 255 = foreground
pub type Mask = GrayImage;

/// Per-frame falsecolor diagnostic image, same dimensions as the masks
pub type Scorecard = RgbImage;

/// Background value in a binary mask
pub const MASK_BACKGROUND: u8 = 0;

/// Foreground value in a binary mask
pub const MASK_FOREGROUND: u8 = u8::MAX;

/// Category assigned to a single (ground truth, predicted) pixel pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelClass {
    /// Foreground classified as foreground
    TruePositive,
    /// Background classified as foreground
    FalsePositive,
    /// Background classified as background
    TrueNegative,
    /// Foreground classified as background
    FalseNegative,
    /// At least one of the two values is neither 0 nor 255
    Unknown,
}

/// Pixel tallies for the four confusion-matrix cells plus unclassifiable pixels.
///
/// Used both for a single frame and as the running total of a scoring run.
/// Addition is commutative and associative, so frames can be merged in any
/// order (or in parallel) with identical results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionCounts {
    pub true_positive: u64,
    pub false_positive: u64,
    pub true_negative: u64,
    pub false_negative: u64,
    /// Pixels excluded from the four cells above
    pub unknown: u64,
}

/// Counts for one frame pair, before merging into the running total
pub type FrameCounts = ConfusionCounts;

impl ConfusionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one classified pixel
    pub fn record(&mut self, class: PixelClass) {
        match class {
            PixelClass::TruePositive => self.true_positive += 1,
            PixelClass::FalsePositive => self.false_positive += 1,
            PixelClass::TrueNegative => self.true_negative += 1,
            PixelClass::FalseNegative => self.false_negative += 1,
            PixelClass::Unknown => self.unknown += 1,
        }
    }

    /// Merge a frame's counts into this running total
    pub fn accumulate(self, frame: FrameCounts) -> Self {
        self + frame
    }

    /// Pixels that landed in one of the four confusion-matrix cells
    pub fn classified(&self) -> u64 {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    /// Every pixel seen, including unknown ones
    pub fn total(&self) -> u64 {
        self.classified() + self.unknown
    }

    /// Pixels that are foreground in either mask (the union of both foregrounds)
    pub fn union(&self) -> u64 {
        self.true_positive + self.false_positive + self.false_negative
    }
}

impl Add for ConfusionCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            true_positive: self.true_positive + rhs.true_positive,
            false_positive: self.false_positive + rhs.false_positive,
            true_negative: self.true_negative + rhs.true_negative,
            false_negative: self.false_negative + rhs.false_negative,
            unknown: self.unknown + rhs.unknown,
        }
    }
}

impl AddAssign for ConfusionCounts {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for ConfusionCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}
