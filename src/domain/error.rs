// ============================================================
// Layer 3 — Error Kinds
// ============================================================
// EvalError covers every fatal condition and maps each one to a
// process exit code:
//
//   GrammarNotFound 2   GrammarFormat 3
//   DatasetNotFound 4   DatasetFormat 5
//   EmptyDataset    6   OutputWrite   7
//   ResultsNotFound 8   ResultsFormat 9
//
// RowFormatError and RecognitionError are local: a bad row may be
// skipped, and a failed recognition is classified as "error
// detected" instead of being propagated.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Fatal errors that abort a run (or the evaluation step).
#[derive(Debug, Error)]
pub enum EvalError {
    /// The grammar definition file could not be opened or read.
    #[error("grammar file '{}' could not be read: {source}", path.display())]
    GrammarNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The grammar text does not describe well-formed productions.
    #[error("invalid grammar at line {line}: {message}")]
    GrammarFormat { line: usize, message: String },

    /// The input dataset file is absent or unreadable.
    #[error("dataset file '{}' could not be read: {source}", path.display())]
    DatasetNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The dataset header is unusable, or a row was malformed under the
    /// abort policy.
    #[error("invalid dataset at line {line}: {message}")]
    DatasetFormat { line: usize, message: String },

    /// The dataset was read successfully but produced no examples.
    #[error("no data available for parsing in '{}'", path.display())]
    EmptyDataset { path: PathBuf },

    /// Writing predictions or the report failed.
    #[error("could not write '{}': {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The evaluation step could not open the results table.
    #[error("results file '{}' could not be read: {source}", path.display())]
    ResultsNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The results table has a bad header or row.
    #[error("invalid results file at line {line}: {message}")]
    ResultsFormat { line: usize, message: String },
}

impl EvalError {
    /// Process exit code for this error kind. `1` is reserved for
    /// failures that are not an `EvalError`.
    pub fn exit_code(&self) -> u8 {
        match self {
            EvalError::GrammarNotFound { .. } => 2,
            EvalError::GrammarFormat { .. } => 3,
            EvalError::DatasetNotFound { .. } => 4,
            EvalError::DatasetFormat { .. } => 5,
            EvalError::EmptyDataset { .. } => 6,
            EvalError::OutputWrite { .. } => 7,
            EvalError::ResultsNotFound { .. } => 8,
            EvalError::ResultsFormat { .. } => 9,
        }
    }

    pub(crate) fn grammar_format(line: usize, message: impl Into<String>) -> Self {
        EvalError::GrammarFormat {
            line,
            message: message.into(),
        }
    }
}

/// A single malformed dataset row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct RowFormatError {
    pub line: usize,
    pub message: String,
}

impl RowFormatError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl From<RowFormatError> for EvalError {
    fn from(e: RowFormatError) -> Self {
        EvalError::DatasetFormat {
            line: e.line,
            message: e.message,
        }
    }
}

/// Failures inside a recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionError {
    #[error("recognition exceeded its time budget of {0:?}")]
    Timeout(Duration),
}
