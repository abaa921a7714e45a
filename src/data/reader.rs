// ============================================================
// Layer 4 — Dataset and Results Readers
// ============================================================
// Reads tab-separated tables with a header row.
//
// Input dataset (columns found by name, extra columns ignored):
//
//   id    label    pos
//   1     0        DT NN VBZ
//   2     1        NN VBZ DT
//
// Results table (written by the writer, re-read for scoring):
//
//   id    ground_truth    prediction
//
// A malformed dataset row is handled by BadRowPolicy: skipped
// with a warning (default) or fatal. A malformed results row is
// always fatal, because the results file is our own output.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::tsv::{self, Header};
use crate::domain::error::{EvalError, RowFormatError};
use crate::domain::example::{Label, LabeledExample, PredictionRecord};
use crate::domain::traits::ExampleSource;

/// What to do with a dataset row that lacks an id, label or pos field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadRowPolicy {
    /// Log a warning and continue with the next row.
    #[default]
    Skip,
    /// Stop the run with a DatasetFormat error.
    Abort,
}

impl fmt::Display for BadRowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BadRowPolicy::Skip => write!(f, "skip"),
            BadRowPolicy::Abort => write!(f, "abort"),
        }
    }
}

impl FromStr for BadRowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(BadRowPolicy::Skip),
            "abort" => Ok(BadRowPolicy::Abort),
            other => Err(format!("unknown bad-row policy '{other}' (expected skip or abort)")),
        }
    }
}

/// Loads labelled examples from a TSV file.
/// Implements the ExampleSource trait from Layer 3.
pub struct TsvExampleSource {
    path: PathBuf,
    policy: BadRowPolicy,
}

impl TsvExampleSource {
    pub fn new(path: impl Into<PathBuf>, policy: BadRowPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
        }
    }
}

impl ExampleSource for TsvExampleSource {
    fn load_all(&self) -> Result<Vec<LabeledExample>> {
        Ok(read_examples(&self.path, self.policy)?)
    }
}

/// Read every example from `path`, in file order.
///
/// An empty file yields an empty Vec; deciding that "no data" is fatal
/// is up to the caller.
pub fn read_examples(
    path: impl AsRef<Path>,
    policy: BadRowPolicy,
) -> Result<Vec<LabeledExample>, EvalError> {
    let path = path.as_ref();
    let not_found = |source| EvalError::DatasetNotFound {
        path: path.to_path_buf(),
        source,
    };

    let lines = tsv::numbered_lines(path).map_err(not_found)?;

    let mut columns: Option<[usize; 3]> = None;
    let mut examples = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut skipped = 0usize;

    for (line_no, bytes) in lines {
        let line = match tsv::decode(bytes.map_err(not_found)?) {
            Ok(line) => line,
            Err(message) => {
                let e = RowFormatError::new(line_no, message);
                if columns.is_none() || policy == BadRowPolicy::Abort {
                    return Err(e.into());
                }
                tracing::warn!("Skipping malformed row in '{}': {}", path.display(), e);
                skipped += 1;
                continue;
            }
        };
        if tsv::is_blank(&line) {
            continue;
        }

        let [id_col, label_col, pos_col] = match columns {
            Some(cols) => cols,
            None => {
                let cols = Header::parse(&line)
                    .require([tsv::ID, tsv::LABEL, tsv::POS])
                    .map_err(|message| EvalError::DatasetFormat {
                        line: line_no,
                        message,
                    })?;
                columns = Some(cols);
                continue;
            }
        };

        match parse_example(&line, line_no, id_col, label_col, pos_col) {
            Ok(example) => {
                if !seen_ids.insert(example.id.clone()) {
                    tracing::warn!("Duplicate id '{}' at line {}", example.id, line_no);
                }
                examples.push(example);
            }
            Err(e) if policy == BadRowPolicy::Skip => {
                tracing::warn!("Skipping malformed row in '{}': {}", path.display(), e);
                skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(
        "Loaded {} examples from '{}' ({} skipped)",
        examples.len(),
        path.display(),
        skipped
    );
    Ok(examples)
}

fn parse_example(
    line: &str,
    line_no: usize,
    id_col: usize,
    label_col: usize,
    pos_col: usize,
) -> Result<LabeledExample, RowFormatError> {
    let fields = tsv::fields(line);
    let needed = id_col.max(label_col).max(pos_col) + 1;
    if fields.len() < needed {
        return Err(RowFormatError::new(
            line_no,
            format!("expected at least {needed} fields, found {}", fields.len()),
        ));
    }

    let id = fields[id_col].trim();
    if id.is_empty() {
        return Err(RowFormatError::new(line_no, "empty id"));
    }

    let label: Label = fields[label_col]
        .parse()
        .map_err(|msg: String| RowFormatError::new(line_no, msg))?;

    Ok(LabeledExample::new(id, label, fields[pos_col]))
}

/// Re-read a results table written by
/// [`write_predictions`](crate::data::writer::write_predictions).
pub fn read_predictions(path: impl AsRef<Path>) -> Result<Vec<PredictionRecord>, EvalError> {
    let path = path.as_ref();
    let not_found = |source| EvalError::ResultsNotFound {
        path: path.to_path_buf(),
        source,
    };
    let bad = |line: usize, message: String| EvalError::ResultsFormat { line, message };

    let lines = tsv::numbered_lines(path).map_err(not_found)?;

    let mut columns: Option<[usize; 3]> = None;
    let mut records = Vec::new();

    for (line_no, bytes) in lines {
        let line = tsv::decode(bytes.map_err(not_found)?).map_err(|msg| bad(line_no, msg))?;
        if tsv::is_blank(&line) {
            continue;
        }

        let [id_col, gt_col, pred_col] = match columns {
            Some(cols) => cols,
            None => {
                let cols = Header::parse(&line)
                    .require(tsv::RESULT_COLUMNS)
                    .map_err(|msg| bad(line_no, msg))?;
                columns = Some(cols);
                continue;
            }
        };

        let fields = tsv::fields(&line);
        let field = |col: usize| {
            fields
                .get(col)
                .copied()
                .ok_or_else(|| bad(line_no, format!("missing field {}", col + 1)))
        };

        let id = field(id_col)?.trim().to_string();
        let ground_truth: Label = field(gt_col)?
            .parse()
            .map_err(|msg| bad(line_no, format!("ground_truth: {msg}")))?;
        let prediction: Label = field(pred_col)?
            .parse()
            .map_err(|msg| bad(line_no, format!("prediction: {msg}")))?;

        records.push(PredictionRecord::new(id, ground_truth, prediction));
    }

    if columns.is_none() {
        return Err(bad(1, "results file has no header row".to_string()));
    }

    tracing::debug!("Read {} prediction records from '{}'", records.len(), path.display());
    Ok(records)
}
