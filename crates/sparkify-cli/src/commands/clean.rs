//! Clean command implementation

use anyhow::{Context, Result};

use crate::cli::{CleanArgs, GlobalArgs};
use crate::commands::common::load_config;

/// Execute the clean command
pub async fn execute(args: &CleanArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;

    if args.dry_run {
        println!("Dry run - would clean the following directories:");
    } else {
        println!("Cleaning project: {}", config.name);
    }

    let removed = sparkify_etl::clean_outputs(&config, args.dry_run)
        .context("Failed to clean output tables")?;

    for dir in &removed {
        if args.dry_run {
            println!("  Would remove: {}", dir.display());
        } else {
            println!("  Removed: {}", dir.display());
        }
    }

    println!();
    let count = removed.len();
    let noun = if count == 1 { "directory" } else { "directories" };
    if args.dry_run {
        println!("Would clean {} {}", count, noun);
    } else {
        println!("Cleaned {} {}", count, noun);
    }

    Ok(())
}

#[cfg(test)]
#[path = "clean_test.rs"]
mod tests;
