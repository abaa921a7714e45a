// ============================================================
// Layer 4 — TSV helpers
// ============================================================
// Shared by the dataset reader and the results reader.
// Fields are separated by a single tab; no quoting is applied,
// which is safe here because ids and tag sequences can never
// contain a tab or a newline once they have been split out of
// a TSV line themselves.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Column names of the input dataset.
pub const ID: &str = "id";
pub const LABEL: &str = "label";
pub const POS: &str = "pos";

/// Column names of the results table, in output order.
pub const RESULT_COLUMNS: [&str; 3] = ["id", "ground_truth", "prediction"];

/// Split one line into fields, dropping a trailing `\r` first.
pub fn fields(line: &str) -> Vec<&str> {
    line.trim_end_matches('\r').split('\t').collect()
}

/// A blank or whitespace-only line carries no row.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Open `path` and yield `(line_number, raw_line)` pairs, 1-based.
///
/// Lines stay as bytes so that one undecodable row can be reported
/// on its own instead of failing the whole read.
pub fn numbered_lines(path: &Path) -> io::Result<impl Iterator<Item = (usize, io::Result<Vec<u8>>)>> {
    let file = File::open(path)?;
    Ok(BufReader::new(file)
        .split(b'\n')
        .enumerate()
        .map(|(idx, line)| (idx + 1, line)))
}

/// Decode one raw line as UTF-8.
pub fn decode(bytes: Vec<u8>) -> Result<String, String> {
    String::from_utf8(bytes).map_err(|e| format!("row is not valid UTF-8: {}", e.utf8_error()))
}

/// Column positions resolved from a header row.
#[derive(Debug, Clone)]
pub struct Header {
    columns: Vec<String>,
}

impl Header {
    pub fn parse(line: &str) -> Self {
        let line = line.trim_start_matches('\u{FEFF}');
        Self {
            columns: fields(line).into_iter().map(|c| c.trim().to_string()).collect(),
        }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Positions of every required column, or a message naming the
    /// missing ones.
    pub fn require<const N: usize>(&self, names: [&str; N]) -> Result<[usize; N], String> {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|n| self.position(n).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(format!(
                "header is missing required column(s): {} (found: {})",
                missing.join(", "),
                self.columns.join(", ")
            ));
        }
        Ok(names.map(|n| self.position(n).unwrap_or_default()))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_strip_carriage_return() {
        assert_eq!(fields("1\t0\tDT NN\r"), vec!["1", "0", "DT NN"]);
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        assert_eq!(decode(b"1\t0\tDT".to_vec()), Ok("1\t0\tDT".to_string()));
        assert!(decode(vec![b'2', b'\t', 0xFF, 0xFE]).unwrap_err().contains("UTF-8"));
    }

    #[test]
    fn test_numbered_lines_keep_bad_bytes_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.tsv");
        std::fs::write(&path, b"a\n\xFF\nb\n").unwrap();

        let lines: Vec<(usize, Vec<u8>)> = numbered_lines(&path)
            .unwrap()
            .map(|(n, l)| (n, l.unwrap()))
            .collect();
        assert_eq!(lines, vec![(1, b"a".to_vec()), (2, vec![0xFF]), (3, b"b".to_vec())]);
    }

    #[test]
    fn test_header_resolves_columns_in_any_order() {
        let h = Header::parse("pos\tsentence\tlabel\tid");
        assert_eq!(h.require([ID, LABEL, POS]), Ok([3, 2, 0]));
    }

    #[test]
    fn test_header_reports_missing_columns() {
        let err = Header::parse("id\tpos").require([ID, LABEL, POS]).unwrap_err();
        assert!(err.contains("label"));
        assert!(!err.contains("missing required column(s): id"));
    }
}
