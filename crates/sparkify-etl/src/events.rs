//! Log pipeline transformations for the `users` and `time` dimensions

use sparkify_core::table::dedup_by_key;
use sparkify_core::{dedup_rows, LogEvent, TimeBasis, TimeRow, User};

/// Keep only song-play events; every log-derived table reads from these.
pub fn filter_song_plays(events: Vec<LogEvent>) -> Vec<LogEvent> {
    events.into_iter().filter(LogEvent::is_song_play).collect()
}

/// Project play events onto the `users` dimension, dropping duplicate rows.
pub fn extract_users(plays: &[LogEvent]) -> Vec<User> {
    dedup_rows(plays.iter().map(User::from))
}

/// Derive one `time` row per distinct event second.
///
/// Events without a usable `ts` contribute no row and are counted in a
/// warning.
pub fn extract_time(plays: &[LogEvent], basis: TimeBasis) -> Vec<TimeRow> {
    let mut skipped = 0usize;
    let rows = plays.iter().filter_map(|event| {
        let row = event.ts.and_then(|ts| TimeRow::from_millis(ts, basis));
        if row.is_none() {
            skipped += 1;
        }
        row
    });
    let rows = dedup_by_key(rows, |row| row.timestamp.clone());

    if skipped > 0 {
        log::warn!(
            "Skipped {} play event(s) without a usable ts for the time table",
            skipped
        );
    }
    rows
}

#[cfg(test)]
#[path = "events_test.rs"]
mod tests;
