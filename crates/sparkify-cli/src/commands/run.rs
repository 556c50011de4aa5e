//! Run command implementation

use anyhow::{Context, Result};
use sparkify_etl::{RunStatus, RunSummary};
use std::path::Path;

use crate::cli::{GlobalArgs, RunArgs, RunOutput};
use crate::commands::common::{anchor_root, load_config, open_engine, ExitCode};

/// Execute the run command
pub async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let mut config = load_config(global)?;
    let cwd = Path::new(".");
    if let Some(root) = &args.input_root {
        config.input_root = anchor_root(root, cwd);
    }
    if let Some(root) = &args.output_root {
        config.output_root = anchor_root(root, cwd);
    }

    let engine = open_engine(&config)?;
    let pipelines = args.pipeline.pipelines();

    if args.output == RunOutput::Text {
        println!(
            "Running {} pipeline(s) for project '{}'{}",
            pipelines.len(),
            config.name,
            config
                .target
                .as_deref()
                .map(|t| format!(" (target: {})", t))
                .unwrap_or_default()
        );
        println!("  input:  {}", config.input_root);
        println!("  output: {}", config.output_root);
        println!();
    }

    let summary = sparkify_etl::run(&engine, &config, pipelines).await;

    match args.output {
        RunOutput::Text => print_text(&summary),
        RunOutput::Json => print_json(&summary)?,
    }

    if !summary.is_success() {
        return Err(ExitCode(1).into());
    }
    Ok(())
}

fn print_text(summary: &RunSummary) {
    for result in &summary.pipelines {
        println!("{} pipeline:", result.pipeline);
        for table in &result.tables {
            println!(
                "  \u{2713} {} ({} rows) [{}ms]",
                table.table, table.rows, table.duration_ms
            );
        }
        if result.status == RunStatus::Error {
            println!(
                "  \u{2717} {} - {} [{}ms]",
                result.pipeline,
                result.error.as_deref().unwrap_or("unknown error"),
                result.duration_ms
            );
        }
    }

    println!();
    println!(
        "Completed: {} succeeded, {} failed in {:.2}s",
        summary.success_count, summary.failure_count, summary.elapsed_secs
    );
}

fn print_json(summary: &RunSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}
