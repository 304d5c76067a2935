//! Runtime configuration and logging setup.

use std::path::{Path, PathBuf};
use std::sync::Once;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

pub const APP_NAME: &str = "CareTracker";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default `tracing` filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    "info,care_tracker_core=debug".to_string()
}

fn default_database_path() -> PathBuf {
    PathBuf::from("care_tracker.db")
}

fn default_completed_task_preview() -> usize {
    5
}

/// Core configuration. Every field has a default, so `{}` is a valid file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoreConfig {
    /// SQLite file location
    pub database_path: PathBuf,
    /// `tracing` filter directive
    pub log_filter: String,
    /// How many completed tasks the task board shows
    pub completed_task_preview: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            log_filter: default_log_filter(),
            completed_task_preview: default_completed_task_preview(),
        }
    }
}

impl CoreConfig {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Invalid care tracker configuration")
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

static TRACING_INIT: Once = Once::new();

/// Install the global `tracing` subscriber. `RUST_LOG` overrides `filter`.
/// Later calls are ignored.
pub fn init_tracing(filter: &str) {
    TRACING_INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
        let installed = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .try_init()
            .is_ok();
        if installed {
            tracing::info!("{} core starting v{}", APP_NAME, APP_VERSION);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = CoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.completed_task_preview, 5);
    }

    #[test]
    fn test_partial_config_overrides_fields() {
        let config =
            CoreConfig::from_json_str(r#"{"database_path": "/data/care.db", "completed_task_preview": 3}"#)
                .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/data/care.db"));
        assert_eq!(config.completed_task_preview, 3);
        assert_eq!(config.log_filter, default_log_filter());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"log_filter": "warn"}}"#).unwrap();

        let config = CoreConfig::load(file.path()).unwrap();
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_load_reports_path_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = CoreConfig::load(&missing).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.json"));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "not json").unwrap();
        assert!(CoreConfig::load(&bad).is_err());
    }

    #[test]
    fn test_init_tracing_is_repeatable() {
        init_tracing("debug");
        init_tracing("trace");
    }
}
