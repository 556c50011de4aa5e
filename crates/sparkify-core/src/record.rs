//! Source records read from the raw JSON datasets.
//!
//! Both datasets are schema-on-read: any field may be absent, null, or carry
//! a value that does not cast to the expected type. Every field is therefore
//! an `Option`, and `None` flows through to the output tables as a null.

use crate::table::{ColumnDef, ColumnType};
use serde::{Deserialize, Serialize};

/// `page` value marking a log event as a song play.
pub const NEXT_SONG_PAGE: &str = "NextSong";

/// One song-metadata record from `song_data/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongRecord {
    pub song_id: Option<String>,
    pub title: Option<String>,
    pub artist_id: Option<String>,
    pub artist_name: Option<String>,
    pub artist_location: Option<String>,
    pub artist_latitude: Option<f64>,
    pub artist_longitude: Option<f64>,
    /// Release year, `0` when unknown
    pub year: Option<i32>,
    /// Track length in seconds
    pub duration: Option<f64>,
}

impl SongRecord {
    /// JSON fields and their read types, in struct order.
    pub const FIELDS: &'static [ColumnDef] = &[
        ColumnDef::new("song_id", ColumnType::Text),
        ColumnDef::new("title", ColumnType::Text),
        ColumnDef::new("artist_id", ColumnType::Text),
        ColumnDef::new("artist_name", ColumnType::Text),
        ColumnDef::new("artist_location", ColumnType::Text),
        ColumnDef::new("artist_latitude", ColumnType::Double),
        ColumnDef::new("artist_longitude", ColumnType::Double),
        ColumnDef::new("year", ColumnType::Integer),
        ColumnDef::new("duration", ColumnType::Double),
    ];
}

/// One user-activity event from `log_data/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    /// Page discriminator; only [`NEXT_SONG_PAGE`] events are plays
    pub page: Option<String>,
    /// User id as text (logged-out events carry an empty string)
    pub user_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    /// Subscription tier (`free` / `paid`)
    pub level: Option<String>,
    /// Event time in epoch milliseconds
    pub ts: Option<i64>,
    pub session_id: Option<i64>,
    /// Artist name as free text, matched against `SongRecord::artist_name`
    pub artist: Option<String>,
    pub user_agent: Option<String>,
}

impl LogEvent {
    /// JSON fields (camelCase, as in the source) and their read types, in
    /// struct order.
    pub const FIELDS: &'static [ColumnDef] = &[
        ColumnDef::new("page", ColumnType::Text),
        ColumnDef::new("userId", ColumnType::Text),
        ColumnDef::new("firstName", ColumnType::Text),
        ColumnDef::new("lastName", ColumnType::Text),
        ColumnDef::new("gender", ColumnType::Text),
        ColumnDef::new("level", ColumnType::Text),
        ColumnDef::new("ts", ColumnType::BigInt),
        ColumnDef::new("sessionId", ColumnType::BigInt),
        ColumnDef::new("artist", ColumnType::Text),
        ColumnDef::new("userAgent", ColumnType::Text),
    ];

    /// Whether this event represents a song play.
    pub fn is_song_play(&self) -> bool {
        self.page.as_deref() == Some(NEXT_SONG_PAGE)
    }
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
