//! The [`GenomeStore`] trait defining the annotation source contract.
//!
//! The validation engine only ever reads from the store: it asks whether a
//! genome exists, what it is called, which features of a type have been
//! deleted, and what every feature is currently assigned. Filtering the
//! assignments by type and deletion is the caller's job.
//!
//! All backends (SeedDirStore, InMemoryStore) implement this trait,
//! ensuring they are fully swappable without changing the engine.

use std::collections::{BTreeSet, HashMap};

use crate::error::StoreError;

/// The read contract for genome annotations.
///
/// The trait is synchronous; the store is assumed to be local.
pub trait GenomeStore {
    /// Returns the display name of a genome, or `None` if it does not exist.
    fn genome_name(&self, genome_id: &str) -> Result<Option<String>, StoreError>;

    /// Returns true if the genome exists.
    fn genome_exists(&self, genome_id: &str) -> Result<bool, StoreError> {
        Ok(self.genome_name(genome_id)?.is_some())
    }

    /// Returns the ids of deleted features of one type in a genome.
    ///
    /// Unknown genomes and types yield an empty set.
    fn deleted_features(
        &self,
        genome_id: &str,
        feature_type: &str,
    ) -> Result<BTreeSet<String>, StoreError>;

    /// Returns every functional assignment recorded for a genome, unfiltered.
    ///
    /// An unknown genome yields an empty map.
    fn function_assignments(&self, genome_id: &str)
        -> Result<HashMap<String, String>, StoreError>;
}
