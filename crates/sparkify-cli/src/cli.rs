//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use sparkify_etl::Pipeline;

/// Sparkify - build the song-play star schema from raw JSON logs
#[derive(Parser, Debug)]
#[command(name = "sparkify")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Target to apply from the config (falls back to SPARKIFY_TARGET)
    #[arg(short, long, global = true)]
    pub target: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the pipelines and write the output tables
    Run(RunArgs),

    /// List the output tables and where they are written
    Ls(LsArgs),

    /// Remove local table output
    Clean(CleanArgs),
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Pipelines to run
    #[arg(long, value_enum, default_value = "all")]
    pub pipeline: PipelineArg,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: RunOutput,

    /// Override the input root (local path or s3:// URI)
    #[arg(long)]
    pub input_root: Option<String>,

    /// Override the output root (local path or s3:// URI)
    #[arg(long)]
    pub output_root: Option<String>,
}

/// Pipeline selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineArg {
    /// Songs, then logs
    All,
    /// songs and artists
    Songs,
    /// users, time and songplays
    Logs,
}

impl PipelineArg {
    pub fn pipelines(&self) -> &'static [Pipeline] {
        match self {
            PipelineArg::All => &Pipeline::ALL,
            PipelineArg::Songs => &[Pipeline::Songs],
            PipelineArg::Logs => &[Pipeline::Logs],
        }
    }
}

/// Run output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutput {
    /// One line per table
    Text,
    /// JSON run summary
    Json,
}

/// Arguments for the ls command
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: LsOutput,
}

/// List output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LsOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

/// Arguments for the clean command
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Show what would be removed without removing it
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
