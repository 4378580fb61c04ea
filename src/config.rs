//! Runtime configuration loaded from YAML

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Settings for the worker binary
///
/// ```yaml
/// db_path: /var/lib/topicmod/topics.db
/// log_filter: topicmod=debug,info
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierConfig {
    /// SQLite database file; `None` means the per-user default
    pub db_path: Option<PathBuf>,
    /// `tracing` filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for ModifierConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_filter: "info".to_string(),
        }
    }
}

impl ModifierConfig {
    /// Load from a YAML file; missing keys take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Configured database path, or `<data dir>/topicmod/topicmod.db`
    pub fn resolved_db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(default_db_path)
    }
}

/// Get the default database path (~/.local/share/topicmod/topicmod.db)
pub fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("topicmod").join("topicmod.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(ModifierConfig::from_yaml("").unwrap(), ModifierConfig::default());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = ModifierConfig::from_yaml("db_path: /tmp/t.db\n").unwrap();
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/t.db")));
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.resolved_db_path(), PathBuf::from("/tmp/t.db"));
    }

    #[test]
    fn unknown_shape_is_rejected() {
        let err = ModifierConfig::from_yaml("log_filter: [1, 2]").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("topicmod.yaml");
        std::fs::write(&path, "log_filter: debug\n").unwrap();

        let config = ModifierConfig::load(&path).unwrap();
        assert_eq!(config.log_filter, "debug");
        assert!(config.db_path.is_none());
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = ModifierConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }

    #[test]
    fn default_path_ends_in_topicmod_db() {
        assert!(default_db_path().ends_with("topicmod/topicmod.db"));
    }
}
