//! Store error types for subsys-store.
//!
//! [`StoreError`] covers the failure modes of reading genome data. A genome
//! that does not exist is not an error; backends report it as `None` or as
//! an empty collection.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A genome data file exists but could not be read.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
