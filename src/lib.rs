//! Pixel-level evaluation of foreground masks against ground truth.
//!
//! Each frame pair is classified into true/false positives and negatives,
//! painted into a falsecolor scorecard, and folded into running totals from
//! which recall, precision, F-score and related metrics are derived.

pub mod error;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod source;

pub use error::EvalError;
pub use pipeline::{run_pipeline, FailurePolicy, PipelineOptions, RunSummary};
