// ============================================================
// Layer 2 — CheckUseCase
// ============================================================
// Judges a single tag sequence against a grammar. Useful when
// writing a grammar: try a pattern, see whether it is accepted,
// without preparing a dataset.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::domain::error::RecognitionError;
use crate::domain::example::Label;
use crate::domain::traits::Recognizer;
use crate::parsing::{load_grammar_file, Strategy};

/// Result of checking one sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Accepted,
    Rejected,
    /// Recognition did not finish; classified like a rejection.
    Failed(RecognitionError),
}

impl CheckOutcome {
    pub fn label(&self) -> Label {
        match self {
            CheckOutcome::Accepted => Label::NoError,
            CheckOutcome::Rejected | CheckOutcome::Failed(_) => Label::Error,
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Accepted => write!(f, "accepted"),
            CheckOutcome::Rejected => write!(f, "rejected"),
            CheckOutcome::Failed(e) => write!(f, "rejected ({e})"),
        }
    }
}

pub struct CheckUseCase {
    recognizer: Box<dyn Recognizer>,
}

impl CheckUseCase {
    /// Load the grammar at `grammar_path` and build the chosen recognizer.
    pub fn new(grammar_path: impl Into<PathBuf>, strategy: Strategy, timeout: Option<Duration>) -> Result<Self> {
        let grammar = load_grammar_file(grammar_path.into())?;
        Ok(Self {
            recognizer: strategy.build(grammar, timeout),
        })
    }

    pub fn check(&self, tokens: &[String]) -> CheckOutcome {
        match self.recognizer.recognize(tokens) {
            Ok(true) => CheckOutcome::Accepted,
            Ok(false) => CheckOutcome::Rejected,
            Err(e) => CheckOutcome::Failed(e),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn use_case(strategy: Strategy, timeout: Option<Duration>) -> (tempfile::TempDir, CheckUseCase) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toy.cfg");
        fs::write(&path, "S -> NP VP\nNP -> DT NN\nVP -> VBZ\n").unwrap();
        let uc = CheckUseCase::new(&path, strategy, timeout).unwrap();
        (dir, uc)
    }

    fn seq(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_check_outcomes() {
        for strategy in [Strategy::Earley, Strategy::Cyk] {
            let (_dir, uc) = use_case(strategy, None);
            assert_eq!(uc.check(&seq("DT NN VBZ")), CheckOutcome::Accepted);
            assert_eq!(uc.check(&seq("NN VBZ DT")), CheckOutcome::Rejected);
            assert_eq!(uc.check(&seq("DT NN JJR")).label(), Label::Error);
        }
    }

    #[test]
    fn test_failed_recognition_is_an_error_label() {
        let (_dir, uc) = use_case(Strategy::Earley, Some(Duration::ZERO));
        let outcome = uc.check(&seq("DT NN VBZ"));
        assert!(matches!(outcome, CheckOutcome::Failed(_)));
        assert_eq!(outcome.label(), Label::Error);
        assert!(outcome.to_string().starts_with("rejected"));
    }
}
