//! CLI command implementations

pub mod clean;
pub mod common;
pub mod ls;
pub mod run;
