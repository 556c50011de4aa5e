//! sparkify-core - Core library for Sparkify
//!
//! This crate provides the source record types, the star-schema output
//! tables, the shared timestamp decomposition, row deduplication, and
//! configuration parsing used across all Sparkify components. It has no
//! engine dependency: everything here is pure transformation logic.

pub mod config;
pub mod error;
pub mod model;
pub mod record;
pub mod sql_utils;
pub mod table;
pub mod time;

pub use config::{AwsConfig, AwsCredentials, Config, EngineConfig, ResolvedConfig, TargetConfig};
pub use error::{CoreError, CoreResult};
pub use model::{Artist, Song, Songplay, TimeRow, User};
pub use record::{LogEvent, SongRecord, NEXT_SONG_PAGE};
pub use table::{dedup_rows, CellValue, ColumnDef, ColumnType, Frame, OutputTable, TableRow};
pub use time::{decompose, epoch_seconds, start_time, TimeBasis, TimeParts};
