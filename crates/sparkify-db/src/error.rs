//! Error types for sparkify-db

use thiserror::Error;

/// Engine operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Engine connection failed: {0}")]
    ConnectionError(String),

    /// Statement execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Source unreachable or not valid JSON (D003)
    #[error("[D003] Failed to read source '{glob}': {message}")]
    SourceReadError { glob: String, message: String },

    /// Output sink unreachable or unwritable (D004)
    #[error("[D004] Failed to write '{dest}': {message}")]
    WriteError { dest: String, message: String },

    /// Credential registration failed (D005)
    #[error("[D005] Failed to register object-store credentials: {0}")]
    CredentialsError(String),

    /// Mutex poisoned (D006)
    #[error("[D006] Engine mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}
