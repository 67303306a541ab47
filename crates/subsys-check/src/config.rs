//! Validation thresholds.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use subsys_core::DEFAULT_FEATURE_TYPE;

use crate::error::CheckError;

/// Rows with this many non-empty fields or fewer carry no cell data.
pub const DEFAULT_MIN_ROW_FIELDS: usize = 2;

/// Cached error counts older than this are suspect: one week.
pub const DEFAULT_STALE_AFTER_SECS: u64 = 7 * 24 * 60 * 60;

/// Configuration for loading and validating subsystems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// A row is discarded unless it has more non-empty fields than this.
    /// Default: 2 (genome id and variant code alone).
    pub min_row_fields: usize,
    /// Maximum age of a cached error count, in seconds. Default: one week.
    pub stale_after_secs: u64,
    /// Feature type for bare numbers in spreadsheet cells. Default: "peg".
    pub default_feature_type: String,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        ValidationConfig {
            min_row_fields: DEFAULT_MIN_ROW_FIELDS,
            stale_after_secs: DEFAULT_STALE_AFTER_SECS,
            default_feature_type: DEFAULT_FEATURE_TYPE.to_string(),
        }
    }
}

impl ValidationConfig {
    /// Loads a configuration from a JSON file. Missing keys take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, CheckError> {
        let text = std::fs::read_to_string(path).map_err(|e| CheckError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| CheckError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }
}
