//! List command implementation

use anyhow::{Context, Result};
use serde::Serialize;
use sparkify_core::OutputTable;
use sparkify_etl::Pipeline;

use crate::cli::{GlobalArgs, LsArgs, LsOutput};
use crate::commands::common::load_config;

/// Table information for display
#[derive(Debug, Serialize)]
struct TableInfo {
    name: &'static str,
    pipeline: Pipeline,
    partition_by: Vec<&'static str>,
    columns: Vec<&'static str>,
    destination: String,
}

/// Execute the ls command
pub async fn execute(args: &LsArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;

    let tables: Vec<TableInfo> = OutputTable::ALL
        .into_iter()
        .map(|table| TableInfo {
            name: table.name(),
            pipeline: Pipeline::for_table(table),
            partition_by: table.partition_by().to_vec(),
            columns: table.columns().iter().map(|c| c.name).collect(),
            destination: config.table_destination(table),
        })
        .collect();

    match args.output {
        LsOutput::Table => print_table(&tables),
        LsOutput::Json => print_json(&tables)?,
    }

    Ok(())
}

/// Print tables in table format
fn print_table(tables: &[TableInfo]) {
    let name_width = tables.iter().map(|t| t.name.len()).max().unwrap_or(4).max(4);
    let partition_width = tables
        .iter()
        .map(|t| partition_label(t).len())
        .max()
        .unwrap_or(9)
        .max(9);

    println!(
        "{:<name_width$}  {:<8}  {:<partition_width$}  DESTINATION",
        "NAME", "PIPELINE", "PARTITION"
    );
    println!(
        "{}  {}  {}  {}",
        "-".repeat(name_width),
        "-".repeat(8),
        "-".repeat(partition_width),
        "-".repeat(11)
    );

    for table in tables {
        println!(
            "{:<name_width$}  {:<8}  {:<partition_width$}  {}",
            table.name,
            table.pipeline.name(),
            partition_label(table),
            table.destination
        );
    }

    println!();
    println!("{} tables", tables.len());
}

fn partition_label(table: &TableInfo) -> String {
    if table.partition_by.is_empty() {
        "-".to_string()
    } else {
        table.partition_by.join(", ")
    }
}

/// Print tables as JSON
fn print_json(tables: &[TableInfo]) -> Result<()> {
    let json = serde_json::to_string_pretty(tables).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}
