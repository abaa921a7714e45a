use std::process::ExitCode;

use clap::Parser;
use grammar_eval::cli::Cli;
use grammar_eval::domain::error::EvalError;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("grammar_eval=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e
                .chain()
                .find_map(|cause| cause.downcast_ref::<EvalError>())
                .map_or(1, EvalError::exit_code);
            ExitCode::from(code)
        }
    }
}
