// ============================================================
// Layer 5 — Classifier
// ============================================================
// Turns a recognition result into a binary label:
//
//   Ok(true)   → 0  (derivable, no grammar error)
//   Ok(false)  → 1  (not derivable → error detected)
//   Err(_)     → 1  (recognition failed → error detected)
//
// Recognition failures are never propagated; a timed-out
// sequence is scored exactly like a rejected one.

use tracing::debug;

use crate::domain::example::{Label, LabeledExample, PredictionRecord};
use crate::domain::traits::Recognizer;

/// Classify a single token sequence.
pub fn classify(recognizer: &dyn Recognizer, tokens: &[String]) -> Label {
    match recognizer.recognize(tokens) {
        Ok(true) => Label::NoError,
        Ok(false) => Label::Error,
        Err(e) => {
            debug!("recognition failed, classifying as error: {}", e);
            Label::Error
        }
    }
}

/// Owns a recognizer and produces one prediction per example.
pub struct Classifier {
    recognizer: Box<dyn Recognizer>,
}

impl Classifier {
    pub fn new(recognizer: Box<dyn Recognizer>) -> Self {
        Self { recognizer }
    }

    pub fn strategy(&self) -> &'static str {
        self.recognizer.name()
    }

    pub fn predict(&self, example: &LabeledExample) -> PredictionRecord {
        let prediction = classify(self.recognizer.as_ref(), &example.tokens);
        debug!(
            id = %example.id,
            ground_truth = %example.ground_truth,
            prediction = %prediction,
            "classified"
        );
        PredictionRecord::new(example.id.clone(), example.ground_truth, prediction)
    }

    /// Classify every example, preserving input order.
    pub fn predict_all(&self, examples: &[LabeledExample]) -> Vec<PredictionRecord> {
        examples.iter().map(|ex| self.predict(ex)).collect()
    }
}
