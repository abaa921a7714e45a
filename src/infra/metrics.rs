// ============================================================
// Layer 6 — Evaluator (confusion matrix + precision/recall)
// ============================================================
// Scores prediction records against their ground truth.
// "Positive" means "grammar error" (label 1):
//
//                     prediction = 1   prediction = 0
//   ground_truth = 1       TP               FN
//   ground_truth = 0       FP               TN
//
//   precision = TP / (TP + FP)
//   recall    = TP / (TP + FN)
//
// When a denominator is zero the ZeroDivisionPolicy decides the
// value. The default, Zero, reports 0.0, which makes
// "no positive predictions at all" indistinguishable from
// "every positive prediction was wrong". NaN keeps them apart.
//
// Example (one record of each kind):
//   TP=1 FP=1 FN=1 TN=1 → precision 0.5, recall 0.5

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::example::{Label, PredictionRecord};

/// Value reported for a ratio whose denominator is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroDivisionPolicy {
    /// Report 0.0.
    #[default]
    Zero,
    /// Report NaN ("undefined").
    NaN,
}

impl ZeroDivisionPolicy {
    pub fn ratio(self, numerator: usize, denominator: usize) -> f64 {
        if denominator > 0 {
            return numerator as f64 / denominator as f64;
        }
        self.sentinel()
    }

    pub fn sentinel(self) -> f64 {
        match self {
            ZeroDivisionPolicy::Zero => 0.0,
            ZeroDivisionPolicy::NaN => f64::NAN,
        }
    }
}

impl fmt::Display for ZeroDivisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZeroDivisionPolicy::Zero => write!(f, "zero"),
            ZeroDivisionPolicy::NaN => write!(f, "nan"),
        }
    }
}

impl FromStr for ZeroDivisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero" | "0" => Ok(ZeroDivisionPolicy::Zero),
            "nan" => Ok(ZeroDivisionPolicy::NaN),
            other => Err(format!("unknown zero-division policy '{other}' (expected zero or nan)")),
        }
    }
}

/// Four-way tally of predicted vs. actual labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub tp: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
    pub tn: usize,
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one (ground truth, prediction) pair.
    pub fn record(&mut self, ground_truth: Label, prediction: Label) {
        match (ground_truth, prediction) {
            (Label::Error, Label::Error) => self.tp += 1,
            (Label::NoError, Label::Error) => self.fp += 1,
            (Label::Error, Label::NoError) => self.fn_ += 1,
            (Label::NoError, Label::NoError) => self.tn += 1,
        }
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a PredictionRecord>) -> Self {
        let mut cm = Self::new();
        for r in records {
            cm.record(r.ground_truth, r.prediction);
        }
        cm
    }

    /// Always equals the number of records counted.
    pub fn total(&self) -> usize {
        self.tp + self.fp + self.fn_ + self.tn
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TP={} FP={} FN={} TN={}", self.tp, self.fp, self.fn_, self.tn)
    }
}

/// Everything the evaluator derives from one confusion matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub confusion: ConfusionMatrix,
    #[serde(deserialize_with = "nan_from_null")]
    pub precision: f64,
    #[serde(deserialize_with = "nan_from_null")]
    pub recall: f64,
    #[serde(deserialize_with = "nan_from_null")]
    pub accuracy: f64,
    #[serde(deserialize_with = "nan_from_null")]
    pub f1: f64,
}

// serde_json writes NaN as `null`; read it back as NaN.
fn nan_from_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl Metrics {
    pub fn from_confusion(cm: ConfusionMatrix, policy: ZeroDivisionPolicy) -> Self {
        let precision = policy.ratio(cm.tp, cm.tp + cm.fp);
        let recall = policy.ratio(cm.tp, cm.tp + cm.fn_);
        let accuracy = policy.ratio(cm.tp + cm.tn, cm.total());
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            policy.sentinel()
        };

        Self {
            confusion: cm,
            precision,
            recall,
            accuracy,
            f1,
        }
    }
}

/// Score a set of prediction records.
pub fn evaluate(records: &[PredictionRecord], policy: ZeroDivisionPolicy) -> Metrics {
    let cm = ConfusionMatrix::from_records(records);
    tracing::debug!("Confusion matrix over {} records: {}", cm.total(), cm);
    Metrics::from_confusion(cm, policy)
}
