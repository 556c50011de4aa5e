//! sparkify-db - Engine layer for Sparkify
//!
//! This crate provides the `Engine` trait the pipelines run against and its
//! DuckDB implementation: schema-on-read JSON ingestion, staging of typed
//! rows, and overwrite-mode partitioned Parquet output.

pub mod duckdb;
pub mod error;
mod remote;
pub mod traits;

pub use duckdb::DuckDbEngine;
pub use error::{DbError, DbResult};
pub use traits::Engine;
