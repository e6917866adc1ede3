//! quorum-merge entry point

mod cli;

use clap::Parser;
use cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli::run(&cli).await {
        Ok((pr, outcome)) => {
            cli::report_outcome(&pr, &outcome, &cli.base_branch);
            ExitCode::SUCCESS
        }
        Err(e) => {
            anstream::eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
