//! Song and log pipelines and the run that drives them

use crate::error::{EtlError, EtlResult};
use crate::events::{extract_time, extract_users, filter_song_plays};
use crate::songplays::{derive_songplays, SongplayIdGenerator};
use crate::songs::{extract_artists, extract_songs};
use crate::writer::{write_table, TableResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sparkify_core::{OutputTable, ResolvedConfig};
use sparkify_db::{DbError, Engine};
use std::fmt;
use std::time::Instant;

/// The two independent pipelines of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pipeline {
    /// Song metadata into `songs` and `artists`
    Songs,
    /// User activity into `users`, `time` and `songplays`
    Logs,
}

impl Pipeline {
    pub const ALL: [Pipeline; 2] = [Pipeline::Songs, Pipeline::Logs];

    pub fn name(&self) -> &'static str {
        match self {
            Pipeline::Songs => "songs",
            Pipeline::Logs => "logs",
        }
    }

    /// Tables this pipeline writes, in write order.
    pub fn tables(&self) -> &'static [OutputTable] {
        match self {
            Pipeline::Songs => &[OutputTable::Songs, OutputTable::Artists],
            Pipeline::Logs => &[OutputTable::Users, OutputTable::Time, OutputTable::Songplays],
        }
    }

    /// The pipeline producing a table.
    pub fn for_table(table: OutputTable) -> Self {
        match table {
            OutputTable::Songs | OutputTable::Artists => Pipeline::Songs,
            OutputTable::Users | OutputTable::Time | OutputTable::Songplays => Pipeline::Logs,
        }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Status of one pipeline in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Error,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Success => write!(f, "success"),
            RunStatus::Error => write!(f, "error"),
        }
    }
}

/// Outcome of one pipeline
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub pipeline: Pipeline,
    pub status: RunStatus,
    pub tables: Vec<TableResult>,
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub project: String,
    pub target: Option<String>,
    pub started_at: DateTime<Utc>,
    pub elapsed_secs: f64,
    pub success_count: usize,
    pub failure_count: usize,
    pub pipelines: Vec<PipelineResult>,
}

impl RunSummary {
    /// Returns true when every pipeline succeeded.
    pub fn is_success(&self) -> bool {
        self.failure_count == 0
    }
}

/// Build the `songs` and `artists` tables from the song-metadata source.
///
/// Each table is pushed onto `results` as soon as it is written, so the
/// tables finished before a failure stay reported.
pub async fn run_song_pipeline(
    engine: &dyn Engine,
    config: &ResolvedConfig,
    results: &mut Vec<TableResult>,
) -> EtlResult<()> {
    let source = config.song_source();
    log::info!("Reading song metadata from {}", source);
    let records = engine
        .read_song_records(&source)
        .await
        .map_err(|source| EtlError::Read {
            pipeline: Pipeline::Songs.to_string(),
            source,
        })?;
    log::info!("Read {} song records", records.len());

    let songs = extract_songs(&records);
    let artists = extract_artists(&records);

    results.push(write_table(engine, config, &songs).await?);
    results.push(write_table(engine, config, &artists).await?);
    Ok(())
}

/// Build the `users`, `time` and `songplays` tables from the activity logs.
///
/// Song metadata is read again for the songplay join so this pipeline does
/// not depend on the song pipeline having run. Written tables are pushed
/// onto `results` as in [`run_song_pipeline`].
pub async fn run_log_pipeline(
    engine: &dyn Engine,
    config: &ResolvedConfig,
    results: &mut Vec<TableResult>,
) -> EtlResult<()> {
    let read_err = |source: DbError| EtlError::Read {
        pipeline: Pipeline::Logs.to_string(),
        source,
    };

    let source = config.log_source();
    log::info!("Reading activity logs from {}", source);
    let events = engine.read_log_events(&source).await.map_err(read_err)?;
    let total = events.len();
    let plays = filter_song_plays(events);
    log::info!("Read {} log events, {} song plays", total, plays.len());

    let users = extract_users(&plays);
    results.push(write_table(engine, config, &users).await?);

    let time = extract_time(&plays, config.time_basis);
    results.push(write_table(engine, config, &time).await?);

    let records = engine
        .read_song_records(&config.song_source())
        .await
        .map_err(read_err)?;
    let ids = SongplayIdGenerator::new();
    let songplays = derive_songplays(&records, &plays, config.time_basis, &ids)?;
    log::info!(
        "Matched {} songplays from {} plays against {} song records",
        songplays.len(),
        plays.len(),
        records.len()
    );
    results.push(write_table(engine, config, &songplays).await?);

    Ok(())
}

/// Run the selected pipelines in order.
///
/// A failing pipeline is recorded and does not stop the next one.
pub async fn run(
    engine: &dyn Engine,
    config: &ResolvedConfig,
    pipelines: &[Pipeline],
) -> RunSummary {
    let started_at = Utc::now();
    let run_start = Instant::now();
    let mut results = Vec::with_capacity(pipelines.len());

    for &pipeline in pipelines {
        log::info!("Starting {} pipeline on {}", pipeline, engine.db_type());
        let start = Instant::now();
        let mut tables = Vec::with_capacity(pipeline.tables().len());
        let outcome = match pipeline {
            Pipeline::Songs => run_song_pipeline(engine, config, &mut tables).await,
            Pipeline::Logs => run_log_pipeline(engine, config, &mut tables).await,
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(()) => {
                log::info!("Finished {} pipeline in {}ms", pipeline, duration_ms);
                PipelineResult {
                    pipeline,
                    status: RunStatus::Success,
                    tables,
                    error: None,
                    duration_ms,
                }
            }
            Err(e) => {
                log::error!("{} pipeline failed: {}", pipeline, e);
                PipelineResult {
                    pipeline,
                    status: RunStatus::Error,
                    tables,
                    error: Some(e.to_string()),
                    duration_ms,
                }
            }
        };
        results.push(result);
    }

    let failure_count = results
        .iter()
        .filter(|r| r.status == RunStatus::Error)
        .count();

    RunSummary {
        project: config.name.clone(),
        target: config.target.clone(),
        started_at,
        elapsed_secs: run_start.elapsed().as_secs_f64(),
        success_count: results.len() - failure_count,
        failure_count,
        pipelines: results,
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
