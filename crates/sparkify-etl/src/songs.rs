//! Song pipeline transformations

use sparkify_core::{dedup_rows, Artist, Song, SongRecord};

/// Project song records onto the `songs` dimension, dropping duplicate rows.
pub fn extract_songs(records: &[SongRecord]) -> Vec<Song> {
    dedup_rows(records.iter().map(Song::from))
}

/// Project song records onto the `artists` dimension, dropping duplicate rows.
///
/// An artist with several songs collapses to one row only when every
/// artist attribute agrees across those records.
pub fn extract_artists(records: &[SongRecord]) -> Vec<Artist> {
    dedup_rows(records.iter().map(Artist::from))
}

#[cfg(test)]
#[path = "songs_test.rs"]
mod tests;
