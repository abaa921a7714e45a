// ============================================================
// Layer 5 — Parsing Layer
// ============================================================
// Everything that knows about context-free grammars lives here.
// No other layer looks inside a Grammar or a chart.
//
//   grammar.rs    — symbols, rules and the immutable Grammar
//   loader.rs     — text → Grammar (NLTK-style notation)
//   earley.rs     — Earley recognizer (default strategy)
//   cyk.rs        — CYK recognizer over a binarised grammar
//   classifier.rs — recognition result → 0/1 label
//
// Both recognizers implement the domain Recognizer trait, so
// the pipeline picks one with a Strategy value and never
// touches the algorithm directly.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::traits::Recognizer;

mod budget;
pub mod classifier;
pub mod cyk;
pub mod earley;
pub mod grammar;
pub mod loader;

pub use classifier::{classify, Classifier};
pub use cyk::CykRecognizer;
pub use earley::EarleyRecognizer;
pub use grammar::{Grammar, NonTerminal, Rule, Symbol, Terminal};
pub use loader::{load_grammar, load_grammar_file};

/// Which membership algorithm to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Earley,
    Cyk,
}

impl Strategy {
    /// Build a recognizer that owns `grammar`.
    pub fn build(self, grammar: Grammar, timeout: Option<Duration>) -> Box<dyn Recognizer> {
        match self {
            Strategy::Earley => Box::new(EarleyRecognizer::new(grammar).with_timeout(timeout)),
            Strategy::Cyk => Box::new(CykRecognizer::new(&grammar).with_timeout(timeout)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Earley => write!(f, "earley"),
            Strategy::Cyk => write!(f, "cyk"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "earley" => Ok(Strategy::Earley),
            "cyk" => Ok(Strategy::Cyk),
            other => Err(format!("unknown strategy '{other}' (expected earley or cyk)")),
        }
    }
}
