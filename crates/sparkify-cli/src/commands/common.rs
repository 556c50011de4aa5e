//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use sparkify_core::config::is_remote_uri;
use sparkify_core::{Config, ResolvedConfig};
use sparkify_db::DuckDbEngine;
use std::fmt;
use std::path::Path;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that destructors run before the process exits.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main exits with the code without printing.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load the config, apply the selected target, and anchor relative local
/// roots at the project directory.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<ResolvedConfig> {
    let project_dir = Path::new(&global.project_dir);
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir(project_dir),
    }
    .context("Failed to load config")?;

    let target = Config::resolve_target(global.target.as_deref());
    let mut resolved = config
        .resolve(target.as_deref())
        .context("Failed to resolve target")?;

    resolved.input_root = anchor_root(&resolved.input_root, project_dir);
    resolved.output_root = anchor_root(&resolved.output_root, project_dir);
    log::debug!(
        "Resolved config '{}' (target: {}): input {}, output {}",
        resolved.name,
        resolved.target.as_deref().unwrap_or("none"),
        resolved.input_root,
        resolved.output_root
    );
    Ok(resolved)
}

/// Open the engine described by the resolved config.
pub(crate) fn open_engine(config: &ResolvedConfig) -> Result<DuckDbEngine> {
    DuckDbEngine::connect(&config.engine, config.credentials.as_ref())
        .with_context(|| format!("Failed to open engine at {}", config.engine.path))
}

/// Resolve a relative local root against `base`; URIs and absolute paths
/// are returned unchanged.
pub(crate) fn anchor_root(root: &str, base: &Path) -> String {
    if is_remote_uri(root) || Path::new(root).is_absolute() || base == Path::new(".") {
        root.to_string()
    } else {
        base.join(root).display().to_string()
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
