//! Configuration types and parsing for sparkify.yml

use crate::error::{CoreError, CoreResult};
use crate::table::OutputTable;
use crate::time::TimeBasis;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Environment variable consulted when no `--target` flag is given
pub const TARGET_ENV_VAR: &str = "SPARKIFY_TARGET";

const AWS_ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
const AWS_SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
const AWS_REGION_VAR: &str = "AWS_REGION";

/// Main project configuration from sparkify.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Root containing `song_data/` and `log_data/` (local path or `s3://` URI)
    pub input_root: String,

    /// Root the five output tables are written under
    pub output_root: String,

    /// Song-metadata glob, relative to `input_root`
    #[serde(default = "default_song_glob")]
    pub song_glob: String,

    /// Session-log glob, relative to `input_root`
    #[serde(default = "default_log_glob")]
    pub log_glob: String,

    /// Clock used for time-dimension and songplay partition values
    #[serde(default)]
    pub time_basis: TimeBasis,

    /// Engine connection settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Object-store credentials; missing keys fall back to the AWS_* env vars
    #[serde(default)]
    pub aws: Option<AwsConfig>,

    /// Named target configurations (e.g., local, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    #[serde(default)]
    pub input_root: Option<String>,

    #[serde(default)]
    pub output_root: Option<String>,

    #[serde(default)]
    pub time_basis: Option<TimeBasis>,

    #[serde(default)]
    pub engine: Option<EngineConfig>,

    #[serde(default)]
    pub aws: Option<AwsConfig>,
}

/// Engine connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Database path (file-based or :memory:)
    #[serde(default = "default_engine_path")]
    pub path: String,

    /// Worker threads for the engine; engine default when unset
    #[serde(default)]
    pub threads: Option<usize>,

    /// Engine memory limit, e.g. "2GB"
    #[serde(default)]
    pub memory_limit: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: default_engine_path(),
            threads: None,
            memory_limit: None,
        }
    }
}

/// Object-store credentials as written in the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AwsConfig {
    #[serde(default)]
    pub access_key_id: Option<String>,

    #[serde(default)]
    pub secret_access_key: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    /// Custom S3-compatible endpoint (e.g. MinIO)
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Fully resolved credentials handed to the engine constructor
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: Option<String>,
    pub endpoint: Option<String>,
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl AwsCredentials {
    /// Combine file values with the AWS_* environment variables.
    ///
    /// File values win. Returns `None` unless both keys are known.
    pub fn resolve(file: Option<&AwsConfig>) -> Option<Self> {
        let from_env = |var: &str| std::env::var(var).ok().filter(|v| !v.is_empty());
        let file = file.cloned().unwrap_or_default();

        let access_key_id = file
            .access_key_id
            .or_else(|| from_env(AWS_ACCESS_KEY_ID_VAR))?;
        let secret_access_key = file
            .secret_access_key
            .or_else(|| from_env(AWS_SECRET_ACCESS_KEY_VAR))?;

        Some(Self {
            access_key_id,
            secret_access_key,
            region: file.region.or_else(|| from_env(AWS_REGION_VAR)),
            endpoint: file.endpoint,
        })
    }
}

/// Configuration with target overrides applied, ready for a run
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub name: String,
    pub target: Option<String>,
    pub input_root: String,
    pub output_root: String,
    pub song_glob: String,
    pub log_glob: String,
    pub time_basis: TimeBasis,
    pub engine: EngineConfig,
    pub credentials: Option<AwsCredentials>,
}

impl ResolvedConfig {
    /// Full glob of the song-metadata files
    pub fn song_source(&self) -> String {
        join_uri(&self.input_root, &self.song_glob)
    }

    /// Full glob of the session-log files
    pub fn log_source(&self) -> String {
        join_uri(&self.input_root, &self.log_glob)
    }

    /// Output location of one table
    pub fn table_destination(&self, table: OutputTable) -> String {
        join_uri(&self.output_root, table.name())
    }

    /// Returns true when the output root is on the local filesystem.
    pub fn output_is_local(&self) -> bool {
        !is_remote_uri(&self.output_root)
    }
}

fn default_song_glob() -> String {
    "song_data/*/*/*/*.json".to_string()
}

fn default_log_glob() -> String {
    "log_data/*/*/*.json".to_string()
}

const DEFAULT_ENGINE_PATH: &str = ":memory:";

fn default_engine_path() -> String {
    DEFAULT_ENGINE_PATH.to_string()
}

/// Join a root location and a relative path with exactly one `/`.
pub fn join_uri(root: &str, relative: &str) -> String {
    format!(
        "{}/{}",
        root.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

/// Returns true for scheme-qualified locations such as `s3://bucket/key`.
pub fn is_remote_uri(location: &str) -> bool {
    location.contains("://")
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded config '{}' from {}", config.name, path.display());
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for sparkify.yml or sparkify.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("sparkify.yml");
        let yaml_path = dir.join("sparkify.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        let required = [
            ("input_root", &self.input_root),
            ("output_root", &self.output_root),
            ("song_glob", &self.song_glob),
            ("log_glob", &self.log_glob),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("'{}' cannot be empty", field),
                });
            }
        }

        Self::validate_engine(&self.engine, "engine")?;

        for (name, target) in &self.targets {
            for (field, value) in [
                ("input_root", &target.input_root),
                ("output_root", &target.output_root),
            ] {
                if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                    return Err(CoreError::ConfigInvalid {
                        message: format!("Target '{}': '{}' cannot be empty", name, field),
                    });
                }
            }
            if let Some(engine) = &target.engine {
                Self::validate_engine(engine, &format!("targets.{}.engine", name))?;
            }
        }

        Ok(())
    }

    fn validate_engine(engine: &EngineConfig, scope: &str) -> CoreResult<()> {
        if engine.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: format!("'{}.path' cannot be empty", scope),
            });
        }
        if engine.threads == Some(0) {
            return Err(CoreError::ConfigInvalid {
                message: format!("'{}.threads' must be at least 1", scope),
            });
        }
        Ok(())
    }

    /// Get the list of available target names
    pub fn available_targets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Get target configuration by name
    pub fn get_target(&self, name: &str) -> Option<&TargetConfig> {
        self.targets.get(name)
    }

    /// Apply target overrides (if any) and resolve credentials.
    pub fn resolve(&self, target: Option<&str>) -> CoreResult<ResolvedConfig> {
        let target_config = match target {
            Some(name) => Some(self.get_target(name).ok_or_else(|| {
                CoreError::TargetNotFound {
                    name: name.to_string(),
                    available: self.available_targets().join(", "),
                }
            })?),
            None => None,
        };

        let aws = target_config
            .and_then(|tc| tc.aws.as_ref())
            .or(self.aws.as_ref());

        Ok(ResolvedConfig {
            name: self.name.clone(),
            target: target.map(String::from),
            input_root: target_config
                .and_then(|tc| tc.input_root.clone())
                .unwrap_or_else(|| self.input_root.clone()),
            output_root: target_config
                .and_then(|tc| tc.output_root.clone())
                .unwrap_or_else(|| self.output_root.clone()),
            song_glob: self.song_glob.clone(),
            log_glob: self.log_glob.clone(),
            time_basis: target_config
                .and_then(|tc| tc.time_basis)
                .unwrap_or(self.time_basis),
            engine: target_config
                .and_then(|tc| tc.engine.clone())
                .unwrap_or_else(|| self.engine.clone()),
            credentials: AwsCredentials::resolve(aws),
        })
    }

    /// Resolve target from CLI flag or SPARKIFY_TARGET environment variable
    ///
    /// Priority: CLI flag > SPARKIFY_TARGET env var > None
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var(TARGET_ENV_VAR).ok())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
