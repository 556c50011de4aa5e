//! DuckDB engine implementation

use crate::error::{DbError, DbResult};
use crate::remote::{clear_prefix, parse_s3_uri, s3_store};
use crate::traits::Engine;
use async_trait::async_trait;
use duckdb::types::Value;
use duckdb::{params_from_iter, Connection, Row};
use object_store::path::Path as ObjectPath;
use sparkify_core::config::{is_remote_uri, join_uri};
use sparkify_core::sql_utils::{quote_ident, quote_literal};
use sparkify_core::{
    AwsCredentials, CellValue, ColumnDef, ColumnType, EngineConfig, Frame, LogEvent,
    OutputTable, SongRecord,
};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Name of the S3 secret registered on the connection
const S3_SECRET_NAME: &str = "sparkify_s3";

/// File name used for unpartitioned table output
const SINGLE_FILE_NAME: &str = "part-0.parquet";

/// Prefix keeping staging tables apart from user tables in a file database
const STAGING_PREFIX: &str = "_sparkify_stage_";

/// DuckDB engine
pub struct DuckDbEngine {
    conn: Mutex<Connection>,
    credentials: Option<AwsCredentials>,
}

impl DuckDbEngine {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
            credentials: None,
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
            credentials: None,
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Open a connection, apply engine settings, and register credentials.
    ///
    /// Credentials are scoped to this connection only.
    pub fn connect(config: &EngineConfig, credentials: Option<&AwsCredentials>) -> DbResult<Self> {
        let mut engine = Self::new(&config.path)?;

        let settings = settings_sql(config);
        if !settings.is_empty() {
            engine
                .execute_batch_sync(&settings)
                .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        }

        if let Some(creds) = credentials {
            log::debug!("Registering S3 credentials for key {}", creds.access_key_id);
            engine
                .execute_batch_sync(&s3_secret_sql(creds))
                .map_err(|e| DbError::CredentialsError(e.to_string()))?;
        }
        engine.credentials = credentials.cloned();

        Ok(engine)
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        log::debug!("execute: {}", sql);
        conn.execute_batch(sql).map_err(DbError::from)
    }

    fn read_records_sync<T>(
        &self,
        glob: &str,
        fields: &[ColumnDef],
        map_row: fn(&Row<'_>) -> duckdb::Result<T>,
    ) -> DbResult<Vec<T>> {
        let sql = read_json_sql(glob, fields);
        let source_err = |e: duckdb::Error| DbError::SourceReadError {
            glob: glob.to_string(),
            message: e.to_string(),
        };

        let conn = self.lock()?;
        log::debug!("read: {}", sql);
        let mut stmt = conn.prepare(&sql).map_err(source_err)?;
        let rows = stmt.query_map([], map_row).map_err(source_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(source_err)
    }

    fn stage_sync(&self, frame: &Frame) -> DbResult<()> {
        let mut conn = self.lock()?;

        conn.execute_batch(&create_table_sql(frame))?;

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&insert_sql(frame))?;
            for row in &frame.rows {
                stmt.execute(params_from_iter(row.iter().map(to_value)))?;
            }
        }
        tx.commit()?;

        log::debug!(
            "Staged {} rows into {}",
            frame.len(),
            staging_table(frame.table)
        );
        Ok(())
    }

    fn copy_sync(&self, table: OutputTable, dest: &str) -> DbResult<()> {
        let sql = copy_sql(&staging_table(table), dest, table.partition_by());
        let conn = self.lock()?;
        log::debug!("write: {}", sql);
        conn.execute_batch(&sql).map_err(|e| DbError::WriteError {
            dest: dest.to_string(),
            message: e.to_string(),
        })
    }

    /// Delete earlier objects under a remote table prefix.
    async fn clear_remote(&self, dest: &str) -> DbResult<()> {
        let write_err = |message: String| DbError::WriteError {
            dest: dest.to_string(),
            message,
        };
        let (bucket, key) = parse_s3_uri(dest)
            .ok_or_else(|| write_err("expected s3://bucket/prefix".to_string()))?;
        let store = s3_store(bucket, self.credentials.as_ref())
            .map_err(|e| write_err(e.to_string()))?;
        let removed = clear_prefix(&store, &ObjectPath::from(key))
            .await
            .map_err(|e| write_err(e.to_string()))?;
        if removed > 0 {
            log::debug!("Removed {} stale objects under {}", removed, dest);
        }
        Ok(())
    }
}

#[async_trait]
impl Engine for DuckDbEngine {
    async fn read_song_records(&self, glob: &str) -> DbResult<Vec<SongRecord>> {
        self.read_records_sync(glob, SongRecord::FIELDS, |row| {
            Ok(SongRecord {
                song_id: row.get(0)?,
                title: row.get(1)?,
                artist_id: row.get(2)?,
                artist_name: row.get(3)?,
                artist_location: row.get(4)?,
                artist_latitude: row.get(5)?,
                artist_longitude: row.get(6)?,
                year: row.get(7)?,
                duration: row.get(8)?,
            })
        })
    }

    async fn read_log_events(&self, glob: &str) -> DbResult<Vec<LogEvent>> {
        self.read_records_sync(glob, LogEvent::FIELDS, |row| {
            Ok(LogEvent {
                page: row.get(0)?,
                user_id: row.get(1)?,
                first_name: row.get(2)?,
                last_name: row.get(3)?,
                gender: row.get(4)?,
                level: row.get(5)?,
                ts: row.get(6)?,
                session_id: row.get(7)?,
                artist: row.get(8)?,
                user_agent: row.get(9)?,
            })
        })
    }

    async fn stage(&self, frame: &Frame) -> DbResult<()> {
        self.stage_sync(frame)
    }

    async fn write_parquet(&self, table: OutputTable, dest: &str) -> DbResult<()> {
        if is_remote_uri(dest) {
            self.clear_remote(dest).await?;
        } else {
            reset_local_dir(Path::new(dest)).map_err(|e| DbError::WriteError {
                dest: dest.to_string(),
                message: e.to_string(),
            })?;
        }
        self.copy_sync(table, dest)
    }

    async fn drop_staged(&self, table: OutputTable) -> DbResult<()> {
        self.execute_batch_sync(&format!(
            "DROP TABLE IF EXISTS {}",
            quote_ident(&staging_table(table))
        ))
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

/// `SET` statements for the configured engine settings
fn settings_sql(config: &EngineConfig) -> String {
    let mut stmts = Vec::new();
    if let Some(threads) = config.threads {
        stmts.push(format!("SET threads = {};", threads));
    }
    if let Some(limit) = &config.memory_limit {
        stmts.push(format!("SET memory_limit = {};", quote_literal(limit)));
    }
    stmts.join("\n")
}

/// Statements loading httpfs and registering an S3 secret
fn s3_secret_sql(creds: &AwsCredentials) -> String {
    let mut options = vec![
        "TYPE S3".to_string(),
        format!("KEY_ID {}", quote_literal(&creds.access_key_id)),
        format!("SECRET {}", quote_literal(&creds.secret_access_key)),
    ];
    if let Some(region) = &creds.region {
        options.push(format!("REGION {}", quote_literal(region)));
    }
    if let Some(endpoint) = &creds.endpoint {
        let (host, use_ssl) = match endpoint.strip_prefix("http://") {
            Some(host) => (host, false),
            None => (endpoint.strip_prefix("https://").unwrap_or(endpoint), true),
        };
        options.push(format!("ENDPOINT {}", quote_literal(host.trim_end_matches('/'))));
        options.push("URL_STYLE 'path'".to_string());
        options.push(format!("USE_SSL {}", use_ssl));
    }
    format!(
        "INSTALL httpfs;\nLOAD httpfs;\nCREATE OR REPLACE SECRET {} ({});",
        S3_SECRET_NAME,
        options.join(", ")
    )
}

/// Schema-on-read projection of a JSON glob.
///
/// Every field is read as text and cast afterwards with `TRY_CAST`, so a
/// missing or malformed value becomes NULL instead of failing the batch.
fn read_json_sql(glob: &str, fields: &[ColumnDef]) -> String {
    let columns = fields
        .iter()
        .map(|f| format!("{}: 'VARCHAR'", quote_literal(f.name)))
        .collect::<Vec<_>>()
        .join(", ");
    let projection = fields
        .iter()
        .map(|f| match f.column_type {
            ColumnType::Text => quote_ident(f.name),
            other => format!("TRY_CAST({} AS {})", quote_ident(f.name), other.sql_type()),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT {} FROM read_json({}, format = 'auto', columns = {{{}}})",
        projection,
        quote_literal(glob),
        columns
    )
}

/// Engine-side name of a table's staging area
fn staging_table(table: OutputTable) -> String {
    format!("{}{}", STAGING_PREFIX, table.name())
}

fn create_table_sql(frame: &Frame) -> String {
    let columns = frame
        .columns
        .iter()
        .map(|c| format!("{} {}", quote_ident(c.name), c.column_type.sql_type()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE OR REPLACE TABLE {} ({})",
        quote_ident(&staging_table(frame.table)),
        columns
    )
}

fn insert_sql(frame: &Frame) -> String {
    let placeholders = frame
        .columns
        .iter()
        .map(|c| match c.column_type {
            ColumnType::Timestamp => "make_timestamp(CAST(? AS BIGINT))",
            _ => "?",
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} VALUES ({})",
        quote_ident(&staging_table(frame.table)),
        placeholders
    )
}

fn copy_sql(source: &str, dest: &str, partition_by: &[&str]) -> String {
    if partition_by.is_empty() {
        format!(
            "COPY {} TO {} (FORMAT PARQUET, COMPRESSION SNAPPY)",
            quote_ident(source),
            quote_literal(&join_uri(dest, SINGLE_FILE_NAME))
        )
    } else {
        let columns = partition_by
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "COPY {} TO {} (FORMAT PARQUET, COMPRESSION SNAPPY, PARTITION_BY ({}), OVERWRITE_OR_IGNORE true)",
            quote_ident(source),
            quote_literal(dest),
            columns
        )
    }
}

/// Remove a previous local output directory and recreate it empty.
fn reset_local_dir(dir: &Path) -> std::io::Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)?;
    }
    std::fs::create_dir_all(dir)
}

/// Timestamps are bound as epoch microseconds and rebuilt by `make_timestamp`.
fn to_value(cell: &CellValue) -> Value {
    match cell {
        CellValue::Null => Value::Null,
        CellValue::Text(s) => Value::Text(s.clone()),
        CellValue::Integer(v) => Value::Int(*v),
        CellValue::BigInt(v) => Value::BigInt(*v),
        CellValue::Double(v) => Value::Double(*v),
        CellValue::Timestamp(us) => Value::BigInt(*us),
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
