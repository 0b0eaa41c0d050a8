use super::types::Mask;
use image::imageops::{self, FilterType};
use std::borrow::Cow;

/// Resampling used when a predicted mask must be brought to ground truth size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ResizeFilter {
    /// Keeps masks binary
    #[default]
    Nearest,
    /// Bilinear; may introduce intermediate gray values along edges
    Linear,
}

impl ResizeFilter {
    fn filter_type(self) -> FilterType {
        match self {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Linear => FilterType::Triangle,
        }
    }
}

/// Bring `predicted` to the dimensions of `ground_truth`.
///
/// Ground truth is always the sizing reference. Returns the predicted mask
/// unchanged (borrowed) when the dimensions already match.
pub fn align_to_ground_truth<'a>(
    ground_truth: &Mask,
    predicted: &'a Mask,
    filter: ResizeFilter,
) -> Cow<'a, Mask> {
    let target = ground_truth.dimensions();
    if predicted.dimensions() == target {
        return Cow::Borrowed(predicted);
    }

    let _span = tracing::debug_span!("align").entered();
    tracing::debug!(
        "Resizing predicted mask {}x{} -> {}x{}",
        predicted.width(),
        predicted.height(),
        target.0,
        target.1
    );

    Cow::Owned(imageops::resize(
        predicted,
        target.0,
        target.1,
        filter.filter_type(),
    ))
}
