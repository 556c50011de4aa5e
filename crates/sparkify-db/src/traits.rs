//! Engine trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use sparkify_core::{Frame, LogEvent, OutputTable, SongRecord};

/// Dataframe engine the pipelines run against
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Load every song-metadata record matching a JSON glob
    async fn read_song_records(&self, glob: &str) -> DbResult<Vec<SongRecord>>;

    /// Load every log event matching a JSON glob
    async fn read_log_events(&self, glob: &str) -> DbResult<Vec<LogEvent>>;

    /// Materialize a frame in the engine's staging area, replacing any
    /// earlier staging of the same table
    async fn stage(&self, frame: &Frame) -> DbResult<()>;

    /// Write a staged table as Parquet under `dest`, replacing prior output.
    ///
    /// Partitioned tables get one `key=value` directory level per partition
    /// column; the rest are written as a single file.
    async fn write_parquet(&self, table: OutputTable, dest: &str) -> DbResult<()>;

    /// Release a table's staging area
    async fn drop_staged(&self, table: OutputTable) -> DbResult<()>;

    /// Engine type identifier for logging
    fn db_type(&self) -> &'static str;
}
