//! Table output: stage typed rows, then write them as Parquet

use crate::error::{EtlError, EtlResult};
use serde::Serialize;
use sparkify_core::{Frame, OutputTable, ResolvedConfig, TableRow};
use sparkify_db::Engine;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Outcome of writing one output table
#[derive(Debug, Clone, Serialize)]
pub struct TableResult {
    pub table: OutputTable,
    pub rows: usize,
    pub destination: String,
    pub partition_by: Vec<&'static str>,
    pub duration_ms: u64,
}

/// Write rows as their table's Parquet output, replacing any prior output.
///
/// The staging table is dropped once the write succeeds.
pub async fn write_table<T: TableRow>(
    engine: &dyn Engine,
    config: &ResolvedConfig,
    rows: &[T],
) -> EtlResult<TableResult> {
    let start = Instant::now();
    let table = T::TABLE;
    let frame = Frame::from_rows(rows);
    let dest = config.table_destination(table);

    engine
        .stage(&frame)
        .await
        .map_err(|source| EtlError::Stage { table, source })?;

    engine
        .write_parquet(table, &dest)
        .await
        .map_err(|source| EtlError::Write {
            table,
            dest: dest.clone(),
            source,
        })?;

    engine
        .drop_staged(table)
        .await
        .map_err(|source| EtlError::Stage { table, source })?;

    log::info!("Wrote {} rows to {} ({})", frame.len(), table, dest);

    Ok(TableResult {
        table,
        rows: frame.len(),
        destination: dest,
        partition_by: table.partition_by().to_vec(),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Remove the local output directory of every table.
///
/// Returns the directories that existed. With `dry_run` nothing is removed.
pub fn clean_outputs(config: &ResolvedConfig, dry_run: bool) -> EtlResult<Vec<PathBuf>> {
    if !config.output_is_local() {
        return Err(EtlError::RemoteOutput(config.output_root.clone()));
    }

    let mut removed = Vec::new();
    for table in OutputTable::ALL {
        let dir = PathBuf::from(config.table_destination(table));
        if !dir.exists() {
            log::debug!("Skipping {} (not found)", dir.display());
            continue;
        }
        if !dry_run {
            remove_dir(&dir)?;
            log::info!("Removed {}", dir.display());
        }
        removed.push(dir);
    }
    Ok(removed)
}

fn remove_dir(dir: &Path) -> EtlResult<()> {
    std::fs::remove_dir_all(dir).map_err(|source| EtlError::Io {
        path: dir.display().to_string(),
        source,
    })
}

#[cfg(test)]
#[path = "writer_test.rs"]
mod tests;
