//! Error types for sparkify-etl

use sparkify_core::OutputTable;
use sparkify_db::DbError;
use thiserror::Error;

/// Pipeline errors, carrying the pipeline or table they occurred in
#[derive(Error, Debug)]
pub enum EtlError {
    /// P001: Source data could not be loaded
    #[error("[P001] {pipeline} pipeline failed to read input: {source}")]
    Read {
        pipeline: String,
        #[source]
        source: DbError,
    },

    /// P002: Rows could not be staged in the engine
    #[error("[P002] Failed to stage table '{table}': {source}")]
    Stage {
        table: OutputTable,
        #[source]
        source: DbError,
    },

    /// P003: Table output could not be written
    #[error("[P003] Failed to write table '{table}' to {dest}: {source}")]
    Write {
        table: OutputTable,
        dest: String,
        #[source]
        source: DbError,
    },

    /// P004: Filesystem error on local output
    #[error("[P004] IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// P005: Operation needs a local output root
    #[error("[P005] Output root '{0}' is not on the local filesystem")]
    RemoteOutput(String),

    /// P006: Songplay id space used up
    #[error("[P006] Songplay id generator exhausted after {last}")]
    IdsExhausted { last: i64 },
}

/// Result type alias for EtlError
pub type EtlResult<T> = Result<T, EtlError>;
