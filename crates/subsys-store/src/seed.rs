//! [`GenomeStore`] over a SEED data directory.
//!
//! Layout consumed, relative to the core directory:
//!
//! - `Organisms/<genome>/GENOME`: marker holding the display name
//! - `Organisms/<genome>/DELETED`: present if the genome was removed
//! - `Organisms/<genome>/Features/<type>/deleted.features`: one id per line
//! - `Organisms/<genome>/assigned_functions`: `fid\tfunction` lines, later
//!   lines overriding earlier ones

use std::collections::{BTreeSet, HashMap};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::marker::read_marker;
use crate::traits::GenomeStore;

const ORGANISMS_DIR: &str = "Organisms";
const GENOME_MARKER: &str = "GENOME";
const DELETED_MARKER: &str = "DELETED";
const FUNCTIONS_FILE: &str = "assigned_functions";
const DELETED_FEATURES_FILE: &str = "deleted.features";

/// Read-only access to the genomes of a SEED core directory.
#[derive(Debug, Clone)]
pub struct SeedDirStore {
    root: PathBuf,
}

impl SeedDirStore {
    /// Opens the store rooted at a core directory. Nothing is read until
    /// a genome is requested.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SeedDirStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one genome's data.
    pub fn organism_dir(&self, genome_id: &str) -> PathBuf {
        self.root.join(ORGANISMS_DIR).join(genome_id)
    }
}

/// Reads a whole file, treating absence as `None`.
///
/// Bytes that are not UTF-8 are replaced rather than failing the read, so
/// one badly encoded annotation file cannot abort a validation pass.
fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match std::fs::read(path) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => Ok(Some(text)),
            Err(e) => {
                tracing::warn!("{} is not valid UTF-8; decoding lossily.", path.display());
                Ok(Some(String::from_utf8_lossy(e.as_bytes()).into_owned()))
            }
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl GenomeStore for SeedDirStore {
    fn genome_name(&self, genome_id: &str) -> Result<Option<String>, StoreError> {
        let org_dir = self.organism_dir(genome_id);
        if !org_dir.is_dir() || org_dir.join(DELETED_MARKER).exists() {
            return Ok(None);
        }
        let marker = org_dir.join(GENOME_MARKER);
        let name = read_marker(&marker).map_err(|source| StoreError::Io {
            path: marker.clone(),
            source,
        })?;
        // A genome without a usable name still exists; fall back to its id.
        match name {
            Some(name) if !name.is_empty() => Ok(Some(name)),
            _ => {
                tracing::warn!("Genome {} has no name in {}.", genome_id, marker.display());
                Ok(Some(genome_id.to_string()))
            }
        }
    }

    fn deleted_features(
        &self,
        genome_id: &str,
        feature_type: &str,
    ) -> Result<BTreeSet<String>, StoreError> {
        let path = self
            .organism_dir(genome_id)
            .join("Features")
            .join(feature_type)
            .join(DELETED_FEATURES_FILE);
        let deleted = read_optional(&path)?
            .map(|text| {
                text.lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(deleted)
    }

    fn function_assignments(
        &self,
        genome_id: &str,
    ) -> Result<HashMap<String, String>, StoreError> {
        let path = self.organism_dir(genome_id).join(FUNCTIONS_FILE);
        let Some(text) = read_optional(&path)? else {
            tracing::warn!("No function assignments found for genome {}.", genome_id);
            return Ok(HashMap::new());
        };
        let mut functions = HashMap::new();
        for line in text.lines() {
            let mut parts = line.splitn(3, '\t');
            let fid = parts.next().unwrap_or("").trim();
            if fid.is_empty() {
                continue;
            }
            let function = parts.next().unwrap_or("").trim_end();
            functions.insert(fid.to_string(), function.to_string());
        }
        tracing::debug!(
            "{} function assignments read for genome {}.",
            functions.len(),
            genome_id
        );
        Ok(functions)
    }
}
