// ============================================================
// Layer 3 — Example and Prediction Domain Types
// ============================================================
// One row of the input dataset becomes a LabeledExample.
// Classifying it produces exactly one PredictionRecord, which
// is written to the results table and later re-read by the
// evaluator.
//
//   id    label  pos               id    ground_truth  prediction
//   1     0      DT NN VBZ    ──►  1     0             0
//
// Labels are binary by construction: the Label enum has only
// two variants, so a prediction can never be anything but 0/1.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Binary grammaticality label.
///
/// `0` means the sentence has no grammar error, `1` means an error
/// was detected (or, for ground truth, is present).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    NoError,
    Error,
}

impl Label {
    /// The numeric value written to and read from TSV files.
    pub fn as_u8(self) -> u8 {
        match self {
            Label::NoError => 0,
            Label::Error => 1,
        }
    }

    pub fn is_error(self) -> bool {
        matches!(self, Label::Error)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl FromStr for Label {
    type Err = String;

    /// Accepts exactly `0` or `1`, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Label::NoError),
            "1" => Ok(Label::Error),
            other => Err(format!("label must be 0 or 1, got '{other}'")),
        }
    }
}

/// One input row: an identifier, its ground-truth label and the
/// POS-tag sequence to judge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub id: String,
    pub ground_truth: Label,
    pub tokens: Vec<String>,
}

impl LabeledExample {
    /// Build an example from a whitespace-separated tag string.
    ///
    /// Example:
    ///   let ex = LabeledExample::new("1", Label::NoError, "DT NN VBZ");
    ///   assert_eq!(ex.tokens, ["DT", "NN", "VBZ"]);
    pub fn new(id: impl Into<String>, ground_truth: Label, pos: &str) -> Self {
        Self {
            id: id.into(),
            ground_truth,
            tokens: pos.split_whitespace().map(str::to_string).collect(),
        }
    }
}

/// One output row: the example id, its ground truth and the
/// classifier's prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: String,
    pub ground_truth: Label,
    pub prediction: Label,
}

impl PredictionRecord {
    pub fn new(id: impl Into<String>, ground_truth: Label, prediction: Label) -> Self {
        Self {
            id: id.into(),
            ground_truth,
            prediction,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parses_only_binary_values() {
        assert_eq!("0".parse::<Label>(), Ok(Label::NoError));
        assert_eq!(" 1 ".parse::<Label>(), Ok(Label::Error));
        assert!("2".parse::<Label>().is_err());
        assert!("".parse::<Label>().is_err());
        assert!("yes".parse::<Label>().is_err());
    }

    #[test]
    fn test_label_display_is_numeric() {
        assert_eq!(Label::NoError.to_string(), "0");
        assert_eq!(Label::Error.to_string(), "1");
    }

    #[test]
    fn test_example_splits_on_any_whitespace() {
        let ex = LabeledExample::new("7", Label::Error, "  DT\tNN   VBZ ");
        assert_eq!(ex.tokens, vec!["DT", "NN", "VBZ"]);
    }

    #[test]
    fn test_empty_pos_gives_empty_sequence() {
        let ex = LabeledExample::new("8", Label::NoError, "");
        assert!(ex.tokens.is_empty());
    }
}
