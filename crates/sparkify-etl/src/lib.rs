//! sparkify-etl - Pipelines for Sparkify
//!
//! The song pipeline turns song metadata into the `songs` and `artists`
//! dimensions. The log pipeline turns user activity into `users`, `time`
//! and the `songplays` fact table. Transformations are pure functions over
//! typed records; reading and writing go through a [`sparkify_db::Engine`].

pub mod error;
pub mod events;
pub mod pipeline;
pub mod songplays;
pub mod songs;
pub mod writer;

pub use error::{EtlError, EtlResult};
pub use events::{extract_time, extract_users, filter_song_plays};
pub use pipeline::{
    run, run_log_pipeline, run_song_pipeline, Pipeline, PipelineResult, RunStatus, RunSummary,
};
pub use songplays::{derive_songplays, SongplayIdGenerator};
pub use songs::{extract_artists, extract_songs};
pub use writer::{clean_outputs, write_table, TableResult};
