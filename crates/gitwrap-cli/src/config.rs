//! Configuration management for the CLI.
//!
//! Precedence, lowest first: built-in defaults, `config.json`, environment
//! variables, command-line flags (applied by `main`).

use crate::paths::Paths;
use gitwrap_ops::SystemInvoker;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Default git binary, resolved through `PATH`.
pub const DEFAULT_GIT_BINARY: &str = "git";

const ENV_LOG_LEVEL: &str = "GITWRAP_LOG_LEVEL";
const ENV_GIT_BINARY: &str = "GITWRAP_GIT_BINARY";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Path error (e.g., home directory not found)
    #[error("Path error: {0}")]
    Path(String),
}

/// Result type alias using ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// git executable to run.
    pub git_binary: PathBuf,
    /// Set `GIT_TERMINAL_PROMPT=0` so git never blocks on a credential prompt.
    pub disable_terminal_prompt: bool,
    /// Log JSON lines on stderr instead of compact text.
    pub log_json: bool,
    /// Also append JSON log lines to this file.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            git_binary: PathBuf::from(DEFAULT_GIT_BINARY),
            disable_terminal_prompt: true,
            log_json: false,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from `paths`, falling back to defaults when the
    /// file does not exist, then apply environment overrides.
    pub fn load(paths: &Paths) -> ConfigResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    fn load_from_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Override fields from `lookup`, which maps an environment variable
    /// name to its value.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(log_level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.is_empty()) {
            self.log_level = log_level;
        }
        if let Some(binary) = lookup(ENV_GIT_BINARY).filter(|v| !v.is_empty()) {
            self.git_binary = PathBuf::from(binary);
        }
    }

    /// The invoker every command runs through.
    pub fn system_invoker(&self) -> SystemInvoker {
        SystemInvoker::new()
            .with_binary(&self.git_binary)
            .with_terminal_prompt_disabled(self.disable_terminal_prompt)
    }
}
