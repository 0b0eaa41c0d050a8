use super::types::ConfusionCounts;
use serde::{Serialize, Serializer};
use std::fmt;

/// A ratio derived from confusion counts.
///
/// A zero denominator yields `Undefined`, which is never the same as a
/// computed `0.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    Value(f64),
    Undefined,
}

impl Score {
    pub fn ratio(numerator: u64, denominator: u64) -> Self {
        if denominator == 0 {
            Score::Undefined
        } else {
            Score::Value(numerator as f64 / denominator as f64)
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Score::Value(v) => Some(v),
            Score::Undefined => None,
        }
    }

    /// Numeric view; `Undefined` becomes NaN
    pub fn as_f64(self) -> f64 {
        self.value().unwrap_or(f64::NAN)
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Score::Undefined)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Value(v) => write!(f, "{v:.6}"),
            Score::Undefined => f.write_str("undefined"),
        }
    }
}

// JSON has no NaN, so undefined scores go out as null
impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Score::Value(v) => serializer.serialize_some(v),
            Score::Undefined => serializer.serialize_none(),
        }
    }
}

/// Quality metrics derived from the final confusion counts of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    /// TP / (TP + FN)
    pub recall: Score,
    /// TP / (TP + FP)
    pub precision: Score,
    /// 2 * Precision * Recall / (Precision + Recall)
    pub fscore: Score,
    /// (TP + TN) / (TP + FP + TN + FN)
    pub accuracy: Score,
    /// FP / (FP + TN)
    pub false_positive_rate: Score,
    /// FN / (TP + FN)
    pub false_negative_rate: Score,
    /// TN / (TN + FP)
    pub specificity: Score,
    /// Intersection over union of the foregrounds, or of the backgrounds
    /// when the ground truth has no foreground at all
    pub similarity: Score,
}

/// Derive all metrics from accumulated counts.
///
/// Unknown pixels take no part in any metric.
pub fn finalize(counts: &ConfusionCounts) -> Metrics {
    let tp = counts.true_positive;
    let fp = counts.false_positive;
    let tn = counts.true_negative;
    let fn_ = counts.false_negative;

    let recall = Score::ratio(tp, tp + fn_);
    let precision = Score::ratio(tp, tp + fp);

    let fscore = match (precision, recall) {
        (Score::Value(p), Score::Value(r)) if p + r > 0.0 => Score::Value(2.0 * p * r / (p + r)),
        _ => Score::Undefined,
    };

    Metrics {
        recall,
        precision,
        fscore,
        accuracy: Score::ratio(tp + tn, counts.classified()),
        false_positive_rate: Score::ratio(fp, fp + tn),
        false_negative_rate: Score::ratio(fn_, tp + fn_),
        specificity: Score::ratio(tn, tn + fp),
        similarity: similarity(counts),
    }
}

/// Similarity measure of a single frame or a whole run.
///
/// When the ground truth contains foreground this is |A ∩ B| / |A ∪ B| over
/// foreground pixels. Otherwise both masks are inverted and the same ratio
/// is taken over background pixels.
pub fn similarity(counts: &ConfusionCounts) -> Score {
    let tp = counts.true_positive;
    let fp = counts.false_positive;
    let tn = counts.true_negative;
    let fn_ = counts.false_negative;

    if tp + fn_ > 0 {
        Score::ratio(tp, tp + fp + fn_)
    } else {
        Score::ratio(tn, tn + fp + fn_)
    }
}
