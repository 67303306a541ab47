//! Error types for the validation engine.
//!
//! A subsystem that does not exist and a subsystem whose cached count is
//! suspect are not errors; see [`crate::subsystem::SubsystemData`].

use std::path::PathBuf;

use subsys_store::StoreError;
use thiserror::Error;

/// Errors that can occur while loading or validating a subsystem.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Filesystem I/O error on a subsystem file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The spreadsheet file is structurally invalid.
    #[error("malformed spreadsheet {} line {line}: {reason}", path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// The genome store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A configuration file could not be parsed.
    #[error("invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CheckError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CheckError::Io {
            path: path.into(),
            source,
        }
    }
}
