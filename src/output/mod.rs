mod directory;
mod report;

pub use directory::DirectorySink;
pub use report::Report;

use crate::scoring::Scorecard;
use anyhow::Result;

/// Trait for scorecard destinations
pub trait ScorecardSink {
    /// Persist the scorecard of one frame, keyed by the ground truth file name
    fn write_scorecard(&mut self, name: &str, scorecard: &Scorecard) -> Result<()>;
}
