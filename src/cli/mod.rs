// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Uses `clap` to parse
// command line arguments and delegates all work to Layer 2.
//
// This is also the only layer that prints results:
//   Precision: 0.5000
//   Recall: 0.5000
// Logs and diagnostics go to stderr.

pub mod commands;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use commands::{CheckArgs, Commands, EvaluateArgs, RunArgs};

use crate::infra::metrics::Metrics;

#[derive(Parser, Debug)]
#[command(
    name = "grammar-eval",
    version,
    about = "Check POS-tag sequences against a context-free grammar and score the judgments.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Optional subcommand; without one the full pipeline runs
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub pipeline: RunArgs,
}

impl Cli {
    /// Dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            None => run_pipeline(self.pipeline),
            Some(Commands::Evaluate(args)) => run_evaluate(args),
            Some(Commands::Check(args)) => run_check(args),
        }
    }
}

fn run_pipeline(args: RunArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    tracing::info!(
        "Evaluating '{}' against grammar '{}'",
        args.input.display(),
        args.grammar.display()
    );

    let use_case = EvaluateUseCase::new(args.into());
    let metrics = use_case.execute()?;
    print_metrics(&metrics);
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::score_results;

    let metrics = score_results(&args.results, args.zero_division)?;
    print_metrics(&metrics);
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<()> {
    use crate::application::check_use_case::CheckUseCase;

    let tokens = args.tokens();
    let timeout = args.timeout_ms.map(Duration::from_millis);
    let use_case = CheckUseCase::new(args.grammar, args.strategy, timeout)?;

    let outcome = use_case.check(&tokens);
    println!("{outcome}");
    Ok(())
}

fn print_metrics(m: &Metrics) {
    tracing::info!("{}", m.confusion);
    println!("Precision: {:.4}", m.precision);
    println!("Recall: {:.4}", m.recall);
}
