//! In-memory implementation of [`GenomeStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests and for callers that
//! already hold annotations in memory. It has the same semantics as the SEED
//! directory backend: unknown genomes have no name, no deleted features and
//! no assignments.

use std::collections::{BTreeSet, HashMap};

use subsys_core::FeatureId;

use crate::error::StoreError;
use crate::traits::GenomeStore;

/// Data stored for a single genome.
#[derive(Debug, Clone, Default)]
struct StoredGenome {
    name: String,
    /// Deleted feature ids indexed by feature type
    deleted: HashMap<String, BTreeSet<String>>,
    /// Functional assignments indexed by feature id
    functions: HashMap<String, String>,
}

/// In-memory implementation of [`GenomeStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    genomes: HashMap<String, StoredGenome>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        InMemoryStore::default()
    }

    /// Adds (or renames) a genome.
    pub fn add_genome(&mut self, genome_id: &str, name: &str) {
        self.genomes.entry(genome_id.to_string()).or_default().name = name.to_string();
    }

    /// Records a functional assignment, replacing any previous one.
    ///
    /// The owning genome is taken from the feature id; ids that do not parse
    /// are stored under no genome and therefore never returned.
    pub fn assign(&mut self, fid: &str, function: &str) {
        if let Some(parsed) = FeatureId::parse(fid) {
            self.genomes
                .entry(parsed.genome)
                .or_default()
                .functions
                .insert(fid.to_string(), function.to_string());
        }
    }

    /// Records a raw assignment under an explicit genome, without checking
    /// the feature id.
    pub fn assign_raw(&mut self, genome_id: &str, fid: &str, function: &str) {
        self.genomes
            .entry(genome_id.to_string())
            .or_default()
            .functions
            .insert(fid.to_string(), function.to_string());
    }

    /// Marks a feature deleted. The id must parse to learn its genome and type.
    pub fn delete_feature(&mut self, fid: &str) {
        if let Some(parsed) = FeatureId::parse(fid) {
            self.genomes
                .entry(parsed.genome)
                .or_default()
                .deleted
                .entry(parsed.ftype)
                .or_default()
                .insert(fid.to_string());
        }
    }
}

impl GenomeStore for InMemoryStore {
    fn genome_name(&self, genome_id: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .genomes
            .get(genome_id)
            .filter(|g| !g.name.is_empty())
            .map(|g| g.name.clone()))
    }

    fn deleted_features(
        &self,
        genome_id: &str,
        feature_type: &str,
    ) -> Result<BTreeSet<String>, StoreError> {
        Ok(self
            .genomes
            .get(genome_id)
            .and_then(|g| g.deleted.get(feature_type))
            .cloned()
            .unwrap_or_default())
    }

    fn function_assignments(
        &self,
        genome_id: &str,
    ) -> Result<HashMap<String, String>, StoreError> {
        Ok(self
            .genomes
            .get(genome_id)
            .map(|g| g.functions.clone())
            .unwrap_or_default())
    }
}
