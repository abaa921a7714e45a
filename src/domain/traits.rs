// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits, not
// against concrete parsers or file formats:
//   - EarleyRecognizer and CykRecognizer implement Recognizer
//   - TsvExampleSource implements ExampleSource
//
// Swapping the recognition algorithm or the dataset format
// therefore never touches the pipeline code.

use anyhow::Result;

use crate::domain::error::RecognitionError;
use crate::domain::example::LabeledExample;

// ─── Recognizer ───────────────────────────────────────────────────────────────
/// A membership test for a context-free language.
///
/// Implementations own their grammar and must be sound and complete:
/// `Ok(true)` exactly when the tokens are derivable from the start
/// symbol. A token the grammar has never heard of is a plain
/// rejection (`Ok(false)`), never an error.
pub trait Recognizer: Send + Sync {
    fn recognize(&self, tokens: &[String]) -> Result<bool, RecognitionError>;

    /// Short human-readable name of the strategy, used in logs.
    fn name(&self) -> &'static str;
}

// ─── ExampleSource ────────────────────────────────────────────────────────────
/// Any component that can produce labelled examples in input order.
pub trait ExampleSource {
    fn load_all(&self) -> Result<Vec<LabeledExample>>;
}
