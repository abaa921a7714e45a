// ============================================================
// Layer 6 — Run Report
// ============================================================
// Optional JSON summary of a pipeline run: the configuration
// that produced it, the number of examples scored and the
// metrics. Written with serde_json::to_string_pretty so it can
// be diffed between runs.
//
// Example:
//   {
//     "config": { "input": "data/train.tsv", ... },
//     "strategy": "earley",
//     "examples": 4,
//     "metrics": { "confusion": { "tp": 1, ... }, "precision": 0.5, ... }
//   }

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::application::evaluate_use_case::EvaluateConfig;
use crate::data::writer::ensure_parent_dir;
use crate::domain::error::EvalError;
use crate::infra::metrics::Metrics;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub config: EvaluateConfig,
    pub strategy: String,
    pub examples: usize,
    pub metrics: Metrics,
}

/// Write `report` as pretty-printed JSON, creating parent directories.
pub fn save_report(path: impl AsRef<Path>, report: &RunReport) -> Result<(), EvalError> {
    let path = path.as_ref();
    let write = || -> io::Result<()> {
        ensure_parent_dir(path)?;
        let json = serde_json::to_string_pretty(report)?;
        fs::write(path, json)
    };

    write().map_err(|source| EvalError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Saved run report to '{}'", path.display());
    Ok(())
}

/// Read a report back (used by tests and for comparing runs).
pub fn load_report(path: impl AsRef<Path>) -> anyhow::Result<RunReport> {
    use anyhow::Context;

    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read report from '{}'", path.display()))?;
    Ok(serde_json::from_str(&json)?)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::metrics::{ConfusionMatrix, ZeroDivisionPolicy};

    #[test]
    fn test_report_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("run.json");
        let cm = ConfusionMatrix {
            tp: 2,
            fp: 1,
            fn_: 0,
            tn: 3,
        };
        let report = RunReport {
            config: EvaluateConfig::default(),
            strategy: "earley".into(),
            examples: 6,
            metrics: Metrics::from_confusion(cm, ZeroDivisionPolicy::Zero),
        };

        save_report(&path, &report).unwrap();
        let back = load_report(&path).unwrap();
        assert_eq!(back.examples, 6);
        assert_eq!(back.metrics, report.metrics);
        assert_eq!(back.config.input, report.config.input);

        let cm = ConfusionMatrix {
            tn: 3,
            ..ConfusionMatrix::default()
        };
        let report = RunReport {
            config: EvaluateConfig {
                zero_division: ZeroDivisionPolicy::NaN,
                ..EvaluateConfig::default()
            },
            strategy: "cyk".into(),
            examples: 3,
            metrics: Metrics::from_confusion(cm, ZeroDivisionPolicy::NaN),
        };
        save_report(&path, &report).unwrap();
        let back = load_report(&path).unwrap();
        assert!(back.metrics.precision.is_nan());
        assert!(back.metrics.recall.is_nan());
        assert!(back.metrics.f1.is_nan());
        assert_eq!(back.metrics.accuracy, 1.0);
        assert_eq!(back.config.zero_division, ZeroDivisionPolicy::NaN);
    }

    #[test]
    fn test_nan_metrics_serialise_as_null() {
        let report = RunReport {
            config: EvaluateConfig::default(),
            strategy: "cyk".into(),
            examples: 0,
            metrics: Metrics::from_confusion(ConfusionMatrix::default(), ZeroDivisionPolicy::NaN),
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""precision":null"#));
    }
}
