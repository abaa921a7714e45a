// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// The default invocation runs the whole pipeline:
//
//   grammar-eval --input data/train.tsv \
//                --grammar grammars/toy.cfg \
//                --output output/train_results.tsv
//
// Two subcommands cover the pieces on their own:
//   evaluate  — re-score an existing results file
//   check     — judge one tag sequence
//
// Policy enums are parsed through their FromStr impls, so the
// lower layers never depend on clap.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::evaluate_use_case::EvaluateConfig;
use crate::data::reader::BadRowPolicy;
use crate::infra::metrics::ZeroDivisionPolicy;
use crate::parsing::Strategy;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute precision/recall for an existing results file
    Evaluate(EvaluateArgs),

    /// Check whether one tag sequence is accepted by a grammar
    Check(CheckArgs),
}

/// Arguments of the default pipeline run.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// TSV dataset with `id`, `label` and `pos` columns
    #[arg(long, default_value = "data/train.tsv")]
    pub input: PathBuf,

    /// Context-free grammar definition
    #[arg(long, default_value = "grammars/toy.cfg")]
    pub grammar: PathBuf,

    /// Where to write `id / ground_truth / prediction` rows
    #[arg(long, default_value = "output/train_results.tsv")]
    pub output: PathBuf,

    /// Recognition algorithm: earley or cyk
    #[arg(long, default_value = "earley")]
    pub strategy: Strategy,

    /// Per-sequence recognition budget in milliseconds; sequences
    /// that exceed it are classified as errors
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// What to do with malformed dataset rows: skip or abort
    #[arg(long, default_value = "skip")]
    pub on_bad_row: BadRowPolicy,

    /// Value of precision/recall when undefined: zero or nan
    #[arg(long, default_value = "zero")]
    pub zero_division: ZeroDivisionPolicy,

    /// Also write a JSON report with the configuration and metrics
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl Default for RunArgs {
    fn default() -> Self {
        let cfg = EvaluateConfig::default();
        Self {
            input:         cfg.input,
            grammar:       cfg.grammar,
            output:        cfg.output,
            strategy:      cfg.strategy,
            timeout_ms:    cfg.timeout_ms,
            on_bad_row:    cfg.on_bad_row,
            zero_division: cfg.zero_division,
            report:        cfg.report,
        }
    }
}

/// Boundary between Layer 1 and Layer 2: the application layer
/// never sees clap types.
impl From<RunArgs> for EvaluateConfig {
    fn from(a: RunArgs) -> Self {
        EvaluateConfig {
            input:         a.input,
            grammar:       a.grammar,
            output:        a.output,
            strategy:      a.strategy,
            timeout_ms:    a.timeout_ms,
            on_bad_row:    a.on_bad_row,
            zero_division: a.zero_division,
            report:        a.report,
        }
    }
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Results TSV with `id`, `ground_truth` and `prediction` columns
    #[arg(long, default_value = "output/train_results.tsv")]
    pub results: PathBuf,

    /// Value of precision/recall when undefined: zero or nan
    #[arg(long, default_value = "zero")]
    pub zero_division: ZeroDivisionPolicy,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Context-free grammar definition
    #[arg(long, default_value = "grammars/toy.cfg")]
    pub grammar: PathBuf,

    /// Recognition algorithm: earley or cyk
    #[arg(long, default_value = "earley")]
    pub strategy: Strategy,

    /// Recognition budget in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// POS tags, either as separate arguments or one quoted string
    #[arg(value_name = "TAG", allow_hyphen_values = true)]
    pub tags: Vec<String>,
}

impl CheckArgs {
    /// Flatten `"DT NN" VBZ` into `[DT, NN, VBZ]`.
    pub fn tokens(&self) -> Vec<String> {
        self.tags
            .iter()
            .flat_map(|t| t.split_whitespace())
            .map(str::to_string)
            .collect()
    }
}
