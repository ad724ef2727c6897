//! Dashboard configuration.
//! Read from an optional `dashboard.json`; every field has a default so the
//! dashboard runs without one.

use crate::data::{DataLoader, FileSource, HttpSource, LoaderError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILE: &str = "dashboard.json";

const DEFAULT_SOURCE_URL: &str = "https://drive.google.com/uc?id=1Ek9-wZPLWuf3uZBAm8Sr_lEIbZCSD0Ia";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("fetch_timeout_secs must be greater than zero")]
    ZeroTimeout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Spreadsheet download URL.
    pub source_url: String,
    /// Local spreadsheet used instead of `source_url` when set.
    pub source_file: Option<PathBuf>,
    pub fetch_timeout_secs: u64,
    /// Middle part of the CSV file name: `uber_<context>_<YYYY-MM>.csv`.
    pub export_context: String,
    /// Tracing filter used when `DASHBOARD_LOG` is unset.
    pub log_level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            source_file: None,
            fetch_timeout_secs: 30,
            export_context: "byddolphin".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load `path`, or the defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Loader for the configured source: the local file when set, the URL otherwise.
    pub fn build_loader(&self) -> Result<DataLoader, LoaderError> {
        let loader = match &self.source_file {
            Some(path) => DataLoader::new(Box::new(FileSource::new(path))),
            None => DataLoader::new(Box::new(HttpSource::new(
                self.source_url.clone(),
                self.fetch_timeout(),
            )?)),
        };
        Ok(loader)
    }
}
