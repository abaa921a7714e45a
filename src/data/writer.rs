// ============================================================
// Layer 4 — Predictions Writer
// ============================================================
// Writes the results table:
//
//   id    ground_truth    prediction
//   1     0               0
//   2     1               1
//
// Missing parent directories are created first (like
// `mkdir -p`). Any I/O failure is fatal for the run; a partly
// written file is left on disk but must not be scored.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::data::tsv;
use crate::domain::error::EvalError;
use crate::domain::example::PredictionRecord;

/// Write `records` to `path` in the order given.
pub fn write_predictions(path: impl AsRef<Path>, records: &[PredictionRecord]) -> Result<(), EvalError> {
    let path = path.as_ref();
    write_table(path, records).map_err(|source| EvalError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!("Wrote {} predictions to '{}'", records.len(), path.display());
    Ok(())
}

fn write_table(path: &Path, records: &[PredictionRecord]) -> io::Result<()> {
    ensure_parent_dir(path)?;

    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", tsv::RESULT_COLUMNS.join("\t"))?;
    for r in records {
        writeln!(out, "{}\t{}\t{}", r.id, r.ground_truth, r.prediction)?;
    }
    out.flush()
}

/// Create the parent directory of `path` if it has one and it is missing.
pub(crate) fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::reader::read_predictions;
    use crate::domain::example::Label;

    fn sample() -> Vec<PredictionRecord> {
        vec![
            PredictionRecord::new("3", Label::Error, Label::Error),
            PredictionRecord::new("1", Label::NoError, Label::Error),
            PredictionRecord::new("2", Label::Error, Label::NoError),
        ]
    }

    #[test]
    fn test_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.tsv");
        write_predictions(&path, &sample()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "id\tground_truth\tprediction\n3\t1\t1\n1\t0\t1\n2\t1\t0\n");
    }

    #[test]
    fn test_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output").join("nested").join("results.tsv");
        write_predictions(&path, &sample()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_reread_preserves_records_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.tsv");
        let records = sample();
        write_predictions(&path, &records).unwrap();
        assert_eq!(read_predictions(&path).unwrap(), records);
    }

    #[test]
    fn test_write_failure_is_output_error() {
        let dir = tempfile::tempdir().unwrap();
        // a regular file where a directory is expected
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let err = write_predictions(blocker.join("results.tsv"), &sample()).unwrap_err();
        assert!(matches!(err, EvalError::OutputWrite { .. }));
        assert_eq!(err.exit_code(), 7);
    }

    #[test]
    fn test_relative_file_without_parent() {
        assert!(ensure_parent_dir(Path::new("results.tsv")).is_ok());
    }
}
