// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Orchestrates the full evaluation pipeline in order:
//
//   Step 1: Load the grammar           (Layer 5 - parsing)
//   Step 2: Build the recognizer       (Layer 5 - parsing)
//   Step 3: Read labelled examples     (Layer 4 - data)
//   Step 4: Classify every example     (Layer 5 - parsing)
//   Step 5: Write predictions          (Layer 4 - data)
//   Step 6: Re-read and score them     (Layer 4 + Layer 6)
//   Step 7: Save the JSON report       (Layer 6 - infra, optional)
//
// Fatal conditions surface as EvalError inside the anyhow chain
// so the CLI can map them to exit codes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::reader::{read_predictions, BadRowPolicy, TsvExampleSource};
use crate::data::writer::write_predictions;
use crate::domain::error::EvalError;
use crate::domain::traits::ExampleSource;
use crate::infra::metrics::{evaluate, Metrics, ZeroDivisionPolicy};
use crate::infra::report::{save_report, RunReport};
use crate::parsing::{load_grammar_file, Classifier, Strategy};

// ─── Evaluation Configuration ────────────────────────────────────────────────
// Every knob of a run, with the conventional working-directory
// relative paths as defaults. Serialisable so it can be embedded
// in the run report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateConfig {
    pub input:         PathBuf,
    pub grammar:       PathBuf,
    pub output:        PathBuf,
    pub strategy:      Strategy,
    pub timeout_ms:    Option<u64>,
    pub on_bad_row:    BadRowPolicy,
    pub zero_division: ZeroDivisionPolicy,
    pub report:        Option<PathBuf>,
}

impl Default for EvaluateConfig {
    fn default() -> Self {
        Self {
            input:         PathBuf::from("data/train.tsv"),
            grammar:       PathBuf::from("grammars/toy.cfg"),
            output:        PathBuf::from("output/train_results.tsv"),
            strategy:      Strategy::default(),
            timeout_ms:    None,
            on_bad_row:    BadRowPolicy::default(),
            zero_division: ZeroDivisionPolicy::default(),
            report:        None,
        }
    }
}

impl EvaluateConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

// ─── EvaluateUseCase ──────────────────────────────────────────────────────────
pub struct EvaluateUseCase {
    config: EvaluateConfig,
}

impl EvaluateUseCase {
    pub fn new(config: EvaluateConfig) -> Self {
        Self { config }
    }

    /// Execute the full pipeline and return the metrics of the
    /// freshly written results file.
    pub fn execute(&self) -> Result<Metrics> {
        let cfg = &self.config;

        // ── Step 1: Load the grammar ──────────────────────────────────────────
        // No grammar, no work: this fails before any file is written.
        let grammar = load_grammar_file(&cfg.grammar)?;

        // ── Step 2: Build the recognizer ──────────────────────────────────────
        let classifier = Classifier::new(cfg.strategy.build(grammar, cfg.timeout()));
        tracing::info!(
            "Using {} recognizer (timeout: {})",
            classifier.strategy(),
            cfg.timeout_ms
                .map(|ms| format!("{ms} ms"))
                .unwrap_or_else(|| "none".to_string())
        );

        // ── Step 3: Read labelled examples ────────────────────────────────────
        let source = TsvExampleSource::new(&cfg.input, cfg.on_bad_row);
        let examples = source.load_all()?;
        if examples.is_empty() {
            return Err(EvalError::EmptyDataset {
                path: cfg.input.clone(),
            }
            .into());
        }

        // ── Step 4: Classify in input order ───────────────────────────────────
        let records = classifier.predict_all(&examples);
        let flagged = records.iter().filter(|r| r.prediction.is_error()).count();
        tracing::info!(
            "Classified {} examples: {} flagged as grammar errors",
            records.len(),
            flagged
        );

        // ── Step 5: Write predictions ─────────────────────────────────────────
        write_predictions(&cfg.output, &records)?;

        // ── Step 6: Re-read the results and score them ────────────────────────
        let metrics = score_results(&cfg.output, cfg.zero_division)?;

        // ── Step 7: Optional JSON report ──────────────────────────────────────
        if let Some(path) = &cfg.report {
            let report = RunReport {
                config:   cfg.clone(),
                strategy: classifier.strategy().to_string(),
                examples: records.len(),
                metrics,
            };
            save_report(path, &report)?;
        }

        Ok(metrics)
    }
}

/// Score an existing results table.
pub fn score_results(path: &Path, policy: ZeroDivisionPolicy) -> Result<Metrics, EvalError> {
    let records = read_predictions(path)?;
    let metrics = evaluate(&records, policy);
    tracing::info!(
        "Scored {} records from '{}': {}",
        metrics.confusion.total(),
        path.display(),
        metrics.confusion
    );
    Ok(metrics)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir, grammar: &str, data: &str) -> EvaluateConfig {
        let grammar_path = dir.path().join("grammars").join("toy.cfg");
        let input_path = dir.path().join("data").join("train.tsv");
        fs::create_dir_all(grammar_path.parent().unwrap()).unwrap();
        fs::create_dir_all(input_path.parent().unwrap()).unwrap();
        fs::write(&grammar_path, grammar).unwrap();
        fs::write(&input_path, data).unwrap();

        EvaluateConfig {
            input: input_path,
            grammar: grammar_path,
            output: dir.path().join("output").join("train_results.tsv"),
            ..EvaluateConfig::default()
        }
    }

    const TOY: &str = "S -> NP VP\nNP -> DT NN\nVP -> VBZ\n";

    #[test]
    fn test_default_paths() {
        let cfg = EvaluateConfig::default();
        assert_eq!(cfg.input, PathBuf::from("data/train.tsv"));
        assert_eq!(cfg.grammar, PathBuf::from("grammars/toy.cfg"));
        assert_eq!(cfg.output, PathBuf::from("output/train_results.tsv"));
        assert_eq!(cfg.timeout(), None);
    }

    #[test]
    fn test_pipeline_writes_results_and_scores_them() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(
            &dir,
            TOY,
            "id\tlabel\tpos\n1\t0\tDT NN VBZ\n2\t1\tNN VBZ DT\n3\t1\tDT NN JJR\n4\t0\tDT NN\n",
        );

        let metrics = EvaluateUseCase::new(cfg.clone()).execute().unwrap();
        assert_eq!(metrics.confusion.tp, 2);
        assert_eq!(metrics.confusion.fp, 1);
        assert_eq!(metrics.confusion.tn, 1);
        assert_eq!(metrics.confusion.fn_, 0);

        let text = fs::read_to_string(&cfg.output).unwrap();
        assert_eq!(
            text,
            "id\tground_truth\tprediction\n1\t0\t0\n2\t1\t1\n3\t1\t1\n4\t0\t1\n"
        );
    }

    #[test]
    fn test_missing_grammar_aborts_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config_in(&dir, TOY, "id\tlabel\tpos\n1\t0\tDT NN VBZ\n");
        cfg.grammar = dir.path().join("missing.cfg");

        let err = EvaluateUseCase::new(cfg.clone()).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EvalError>(),
            Some(EvalError::GrammarNotFound { .. })
        ));
        assert!(!cfg.output.exists());
    }

    #[test]
    fn test_empty_dataset_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(&dir, TOY, "id\tlabel\tpos\n");

        let err = EvaluateUseCase::new(cfg.clone()).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EvalError>(),
            Some(EvalError::EmptyDataset { .. })
        ));
        assert!(!cfg.output.exists());
    }

    #[test]
    fn test_report_is_written_when_requested() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config_in(&dir, TOY, "id\tlabel\tpos\n1\t0\tDT NN VBZ\n");
        cfg.report = Some(dir.path().join("output").join("report.json"));
        cfg.strategy = Strategy::Cyk;

        EvaluateUseCase::new(cfg.clone()).execute().unwrap();
        let report = crate::infra::report::load_report(cfg.report.as_ref().unwrap()).unwrap();
        assert_eq!(report.strategy, "cyk");
        assert_eq!(report.examples, 1);
    }

    #[test]
    fn test_zero_timeout_flags_everything() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config_in(&dir, TOY, "id\tlabel\tpos\n1\t0\tDT NN VBZ\n2\t0\tDT NN VBZ\n");
        cfg.timeout_ms = Some(0);

        let metrics = EvaluateUseCase::new(cfg).execute().unwrap();
        assert_eq!(metrics.confusion.fp, 2);
    }
}
