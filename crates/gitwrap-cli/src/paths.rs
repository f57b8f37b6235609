//! File system paths for the CLI.

use crate::config::{ConfigError, ConfigResult};
use std::path::PathBuf;

/// Directory name under the home directory.
const BASE_DIR_NAME: &str = ".gitwrap";

/// Locates gitwrap's own files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory (~/.gitwrap)
    base_dir: PathBuf,
}

impl Paths {
    /// Uses `~/.gitwrap`.
    pub fn new() -> ConfigResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| ConfigError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(BASE_DIR_NAME),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the config file path (~/.gitwrap/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_with_base_dir() {
        let paths = Paths::with_base_dir(PathBuf::from("/tmp/gitwrap-test"));
        assert_eq!(
            paths.config_file(),
            PathBuf::from("/tmp/gitwrap-test/config.json")
        );
    }

    #[test]
    fn test_default_paths_live_under_home() {
        if let Some(home) = dirs::home_dir() {
            let paths = Paths::new().unwrap();
            assert_eq!(paths.config_file(), home.join(".gitwrap").join("config.json"));
        }
    }
}
