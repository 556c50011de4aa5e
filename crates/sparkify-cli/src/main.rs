//! Sparkify CLI - build the song-play star schema from raw JSON logs

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::Cli;
use commands::common::ExitCode;
use commands::{clean, ls, run};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result = match &cli.command {
        cli::Commands::Run(args) => run::execute(args, &cli.global).await,
        cli::Commands::Ls(args) => ls::execute(args, &cli.global).await,
        cli::Commands::Clean(args) => clean::execute(args, &cli.global).await,
    };

    if let Err(err) = result {
        let code = match err.downcast_ref::<ExitCode>() {
            Some(ExitCode(code)) => *code,
            None => {
                eprintln!("Error: {:#}", err);
                1
            }
        };
        std::process::exit(code);
    }
}

/// Install the stderr subscriber; `log` records from the library crates are
/// forwarded to it.
fn init_logging(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
