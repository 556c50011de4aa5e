//! Star-schema rows: four dimensions and the songplay fact.

use crate::record::{LogEvent, SongRecord};
use crate::table::{CellValue, ColumnDef, ColumnType, OutputTable, TableRow};
use crate::time::{decompose, epoch_seconds, TimeBasis};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Song dimension row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Song {
    pub song_id: Option<String>,
    pub title: Option<String>,
    pub artist_id: Option<String>,
    pub year: Option<i32>,
    pub duration: Option<f64>,
}

impl From<&SongRecord> for Song {
    fn from(record: &SongRecord) -> Self {
        Self {
            song_id: record.song_id.clone(),
            title: record.title.clone(),
            artist_id: record.artist_id.clone(),
            year: record.year,
            duration: record.duration,
        }
    }
}

const SONG_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("song_id", ColumnType::Text),
    ColumnDef::new("title", ColumnType::Text),
    ColumnDef::new("artist_id", ColumnType::Text),
    ColumnDef::new("year", ColumnType::Integer),
    ColumnDef::new("duration", ColumnType::Double),
];

impl TableRow for Song {
    const TABLE: OutputTable = OutputTable::Songs;

    fn columns() -> &'static [ColumnDef] {
        SONG_COLUMNS
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![
            self.song_id.clone().into(),
            self.title.clone().into(),
            self.artist_id.clone().into(),
            self.year.into(),
            self.duration.into(),
        ]
    }
}

/// Artist dimension row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artist {
    pub artist_id: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<&SongRecord> for Artist {
    fn from(record: &SongRecord) -> Self {
        Self {
            artist_id: record.artist_id.clone(),
            name: record.artist_name.clone(),
            location: record.artist_location.clone(),
            latitude: record.artist_latitude,
            longitude: record.artist_longitude,
        }
    }
}

const ARTIST_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("artist_id", ColumnType::Text),
    ColumnDef::new("name", ColumnType::Text),
    ColumnDef::new("location", ColumnType::Text),
    ColumnDef::new("latitude", ColumnType::Double),
    ColumnDef::new("longitude", ColumnType::Double),
];

impl TableRow for Artist {
    const TABLE: OutputTable = OutputTable::Artists;

    fn columns() -> &'static [ColumnDef] {
        ARTIST_COLUMNS
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![
            self.artist_id.clone().into(),
            self.name.clone().into(),
            self.location.clone().into(),
            self.latitude.into(),
            self.longitude.into(),
        ]
    }
}

/// User dimension row.
///
/// `level` changes over time in the source, so one user may appear once per
/// distinct tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct User {
    pub user_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
}

impl From<&LogEvent> for User {
    fn from(event: &LogEvent) -> Self {
        Self {
            user_id: event.user_id.clone(),
            first_name: event.first_name.clone(),
            last_name: event.last_name.clone(),
            gender: event.gender.clone(),
            level: event.level.clone(),
        }
    }
}

const USER_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("user_id", ColumnType::Text),
    ColumnDef::new("first_name", ColumnType::Text),
    ColumnDef::new("last_name", ColumnType::Text),
    ColumnDef::new("gender", ColumnType::Text),
    ColumnDef::new("level", ColumnType::Text),
];

impl TableRow for User {
    const TABLE: OutputTable = OutputTable::Users;

    fn columns() -> &'static [ColumnDef] {
        USER_COLUMNS
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![
            self.user_id.clone().into(),
            self.first_name.clone().into(),
            self.last_name.clone().into(),
            self.gender.clone().into(),
            self.level.clone().into(),
        ]
    }
}

/// Time dimension row, keyed by `timestamp`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TimeRow {
    /// Whole epoch seconds as a decimal string
    pub timestamp: String,
    pub hour: i32,
    pub day: i32,
    pub week: i32,
    pub month: i32,
    pub year: i32,
    pub weekday: i32,
}

impl TimeRow {
    /// Derive the time row for an event timestamp in epoch milliseconds.
    pub fn from_millis(ts_millis: i64, basis: TimeBasis) -> Option<Self> {
        let parts = decompose(ts_millis, basis)?;
        Some(Self {
            timestamp: epoch_seconds(ts_millis).to_string(),
            hour: parts.hour,
            day: parts.day,
            week: parts.week,
            month: parts.month,
            year: parts.year,
            weekday: parts.weekday,
        })
    }
}

const TIME_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("timestamp", ColumnType::Text),
    ColumnDef::new("hour", ColumnType::Integer),
    ColumnDef::new("day", ColumnType::Integer),
    ColumnDef::new("week", ColumnType::Integer),
    ColumnDef::new("month", ColumnType::Integer),
    ColumnDef::new("year", ColumnType::Integer),
    ColumnDef::new("weekday", ColumnType::Integer),
];

impl TableRow for TimeRow {
    const TABLE: OutputTable = OutputTable::Time;

    fn columns() -> &'static [ColumnDef] {
        TIME_COLUMNS
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![
            self.timestamp.clone().into(),
            self.hour.into(),
            self.day.into(),
            self.week.into(),
            self.month.into(),
            self.year.into(),
            self.weekday.into(),
        ]
    }
}

/// Songplay fact row: one matched (song record, play event) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Songplay {
    pub songplay_id: i64,
    pub start_time: Option<DateTime<Utc>>,
    pub user_id: Option<String>,
    pub level: Option<String>,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
    pub month: Option<i32>,
    pub year: Option<i32>,
}

const SONGPLAY_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("songplay_id", ColumnType::BigInt),
    ColumnDef::new("start_time", ColumnType::Timestamp),
    ColumnDef::new("user_id", ColumnType::Text),
    ColumnDef::new("level", ColumnType::Text),
    ColumnDef::new("song_id", ColumnType::Text),
    ColumnDef::new("artist_id", ColumnType::Text),
    ColumnDef::new("session_id", ColumnType::BigInt),
    ColumnDef::new("location", ColumnType::Text),
    ColumnDef::new("user_agent", ColumnType::Text),
    ColumnDef::new("month", ColumnType::Integer),
    ColumnDef::new("year", ColumnType::Integer),
];

impl TableRow for Songplay {
    const TABLE: OutputTable = OutputTable::Songplays;

    fn columns() -> &'static [ColumnDef] {
        SONGPLAY_COLUMNS
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![
            self.songplay_id.into(),
            self.start_time.into(),
            self.user_id.clone().into(),
            self.level.clone().into(),
            self.song_id.clone().into(),
            self.artist_id.clone().into(),
            self.session_id.into(),
            self.location.clone().into(),
            self.user_agent.clone().into(),
            self.month.into(),
            self.year.into(),
        ]
    }
}

impl OutputTable {
    /// Column definitions of the table's row type.
    pub fn columns(&self) -> &'static [ColumnDef] {
        match self {
            OutputTable::Songs => Song::columns(),
            OutputTable::Artists => Artist::columns(),
            OutputTable::Users => User::columns(),
            OutputTable::Time => TimeRow::columns(),
            OutputTable::Songplays => Songplay::columns(),
        }
    }
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
