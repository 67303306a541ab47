//! Genome annotation store for subsystem validation.
//!
//! Provides the [`GenomeStore`] trait defining what the validation engine
//! needs from the annotation source, plus the [`SeedDirStore`] and
//! [`InMemoryStore`] backends.
//!
//! # Modules
//!
//! - [`error`]: StoreError enum with all failure modes
//! - [`traits`]: GenomeStore trait definition
//! - [`marker`]: single-value marker file helpers
//! - [`memory`]: InMemoryStore implementation
//! - [`seed`]: SeedDirStore implementation over a SEED data directory

pub mod error;
pub mod marker;
pub mod memory;
pub mod seed;
pub mod traits;

// Re-export key types for ergonomic use.
pub use error::StoreError;
pub use memory::InMemoryStore;
pub use seed::SeedDirStore;
pub use traits::GenomeStore;
