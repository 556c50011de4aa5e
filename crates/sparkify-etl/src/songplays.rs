//! Songplay fact derivation

use crate::error::{EtlError, EtlResult};
use sparkify_core::{decompose, start_time, LogEvent, SongRecord, Songplay, TimeBasis};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// Run-scoped source of songplay ids.
///
/// Ids are unique and strictly increasing in issue order within one
/// generator. They are not dense across runs and carry no meaning beyond
/// identity.
#[derive(Debug, Default)]
pub struct SongplayIdGenerator {
    next: AtomicI64,
}

impl SongplayIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }

    /// Issue the next id. Fails instead of wrapping once `i64::MAX` is issued.
    pub fn next_id(&self) -> EtlResult<i64> {
        self.next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1))
            .map_err(|last| EtlError::IdsExhausted { last })
    }
}

/// Join song records to play events on artist name and build fact rows.
///
/// Matching is exact string equality of `SongRecord::artist_name` and
/// `LogEvent::artist`; a missing name on either side never matches. Every
/// matching pair yields one row, so an artist with several songs fans out.
/// Rows come out in play order, then song-record order.
pub fn derive_songplays(
    songs: &[SongRecord],
    plays: &[LogEvent],
    basis: TimeBasis,
    ids: &SongplayIdGenerator,
) -> EtlResult<Vec<Songplay>> {
    let mut by_artist: HashMap<&str, Vec<&SongRecord>> = HashMap::new();
    for song in songs {
        if let Some(name) = song.artist_name.as_deref() {
            by_artist.entry(name).or_default().push(song);
        }
    }

    let mut rows = Vec::new();
    for play in plays {
        let Some(matches) = play.artist.as_deref().and_then(|a| by_artist.get(a)) else {
            continue;
        };
        let parts = play.ts.and_then(|ts| decompose(ts, basis));
        for song in matches {
            rows.push(Songplay {
                songplay_id: ids.next_id()?,
                start_time: play.ts.and_then(start_time),
                user_id: play.user_id.clone(),
                level: play.level.clone(),
                song_id: song.song_id.clone(),
                artist_id: song.artist_id.clone(),
                session_id: play.session_id,
                location: song.artist_location.clone(),
                user_agent: play.user_agent.clone(),
                month: parts.map(|p| p.month),
                year: parts.map(|p| p.year),
            });
        }
    }
    Ok(rows)
}

#[cfg(test)]
#[path = "songplays_test.rs"]
mod tests;
