//! Host configuration, read from the environment.

use std::path::PathBuf;

use crate::error::AppError;

/// Environment variable naming the content manifest.
pub const CONTENT_VAR: &str = "JOURNEY_CONTENT";

/// Environment variable naming the progress directory.
pub const STATE_DIR_VAR: &str = "JOURNEY_STATE_DIR";

const DEFAULT_CONTENT: &str = "content/journey.yaml";
const DEFAULT_STATE_DIR: &str = ".journey";

/// Resolved host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// YAML manifest with the questions and narratives.
    pub content_path: PathBuf,
    /// Directory progress is persisted in.
    pub state_dir: PathBuf,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but empty.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, falling back to defaults for
    /// unset variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let path = |name: &str, default: &str| -> Result<PathBuf, AppError> {
            match lookup(name) {
                None => Ok(PathBuf::from(default)),
                Some(value) if value.trim().is_empty() => Err(AppError::Config(format!(
                    "{name} must not be empty"
                ))),
                Some(value) => Ok(PathBuf::from(value)),
            }
        };
        Ok(Self {
            content_path: path(CONTENT_VAR, DEFAULT_CONTENT)?,
            state_dir: path(STATE_DIR_VAR, DEFAULT_STATE_DIR)?,
        })
    }
}
