//! Configuration file
//!
//! ```json
//! {
//!   "data_dir": "./fishdoc-data",
//!   "default_chars_per_keystroke": 2,
//!   "log_level": "info"
//! }
//! ```
//!
//! Only `data_dir` is required. Unknown keys are rejected.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::metadata::RevealRate;
use crate::observability::Severity;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// Rate used when the metadata record is first created (default 2)
    #[serde(default = "default_chars_per_keystroke")]
    pub default_chars_per_keystroke: usize,

    /// Minimum log severity (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_chars_per_keystroke() -> usize {
    RevealRate::DEFAULT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        if !(RevealRate::MIN..=RevealRate::MAX).contains(&self.default_chars_per_keystroke) {
            return Err(CliError::config_error(format!(
                "default_chars_per_keystroke must be in {}..={}, got {}",
                RevealRate::MIN,
                RevealRate::MAX,
                self.default_chars_per_keystroke
            )));
        }

        if Severity::parse(&self.log_level).is_none() {
            return Err(CliError::config_error(format!(
                "Invalid log_level: '{}'. Must be one of trace, info, warn, error, fatal.",
                self.log_level
            )));
        }

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn default_rate(&self) -> RevealRate {
        RevealRate::new(self.default_chars_per_keystroke)
    }

    /// Validated log level
    pub fn log_severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Info)
    }
}
