//! Where subsystem files live inside a core directory.
//!
//! ```text
//! <core>/Subsystems/<id>/spreadsheet
//! <core>/Subsystems/<id>/ERRORCOUNT
//! <core>/Subsystems/<id>/curator
//! <core>/Subsystems/<id>/EXCHANGABLE
//! ```

use std::path::{Path, PathBuf};

use crate::error::CheckError;

const SUBSYSTEMS_DIR: &str = "Subsystems";
const SPREADSHEET_FILE: &str = "spreadsheet";
const ERROR_COUNT_FILE: &str = "ERRORCOUNT";
const CURATOR_FILE: &str = "curator";
const EXCHANGABLE_FILE: &str = "EXCHANGABLE";

/// Paths of subsystem data under one core directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreLayout {
    root: PathBuf,
}

impl CoreLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        CoreLayout { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn subsystems_dir(&self) -> PathBuf {
        self.root.join(SUBSYSTEMS_DIR)
    }

    pub fn subsystem_dir(&self, ss_id: &str) -> PathBuf {
        self.subsystems_dir().join(ss_id)
    }

    pub fn spreadsheet_file(&self, ss_id: &str) -> PathBuf {
        self.subsystem_dir(ss_id).join(SPREADSHEET_FILE)
    }

    /// The cache artifact holding the last computed error count.
    pub fn error_count_file(&self, ss_id: &str) -> PathBuf {
        self.subsystem_dir(ss_id).join(ERROR_COUNT_FILE)
    }

    pub fn curator_file(&self, ss_id: &str) -> PathBuf {
        self.subsystem_dir(ss_id).join(CURATOR_FILE)
    }

    pub fn exchangable_file(&self, ss_id: &str) -> PathBuf {
        self.subsystem_dir(ss_id).join(EXCHANGABLE_FILE)
    }
}

/// Lists the ids of all subsystems that have a spreadsheet, sorted.
///
/// A core directory without a `Subsystems` directory has no subsystems.
pub fn list_subsystems(layout: &CoreLayout) -> Result<Vec<String>, CheckError> {
    let dir = layout.subsystems_dir();
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(&dir).map_err(|e| CheckError::io(&dir, e))?;
    let mut ids = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CheckError::io(&dir, e))?;
        let Some(ss_id) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if layout.spreadsheet_file(&ss_id).is_file() {
            ids.push(ss_id);
        }
    }
    ids.sort();
    Ok(ids)
}
