//! Spreadsheet rows.
//!
//! A row holds one genome's cells. It also remembers which feature types its
//! cells mention, so that fetching the genome's assignments can be limited
//! to those types.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use subsys_core::{CellData, FeatureId};
use subsys_store::GenomeStore;

use crate::config::ValidationConfig;
use crate::error::CheckError;

/// Variant codes that mark a genome as not implementing the subsystem.
const INACTIVE_VARIANTS: [&str; 3] = ["0", "-1", "inactive"];

/// One genome's row in a subsystem spreadsheet.
///
/// Rows sort by genome name, then genome id. Equality is by genome id.
#[derive(Debug, Clone)]
pub struct RowData {
    genome_id: String,
    name: String,
    variant: String,
    types: BTreeSet<String>,
    cells: Vec<CellData>,
}

impl RowData {
    /// Creates a row with no cells.
    pub fn new(genome_id: &str, name: &str, variant: &str) -> Self {
        RowData {
            genome_id: genome_id.to_string(),
            name: name.to_string(),
            variant: variant.to_string(),
            types: BTreeSet::new(),
            cells: Vec::new(),
        }
    }

    /// Parses a spreadsheet row line.
    ///
    /// Returns `Ok(None)` for a row with no real data (no more than
    /// `config.min_row_fields` non-empty fields). A row whose genome is not
    /// in the store is still built, with an empty name, and reports
    /// [`RowData::is_missing`].
    pub fn load<S: GenomeStore + ?Sized>(
        store: &S,
        line: &str,
        columns: usize,
        config: &ValidationConfig,
    ) -> Result<Option<RowData>, CheckError> {
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        let filled = fields.iter().filter(|f| !f.is_empty()).count();
        if filled <= config.min_row_fields {
            return Ok(None);
        }
        let genome_id = fields[0];
        let variant = fields.get(1).copied().unwrap_or("");
        let name = store.genome_name(genome_id)?.unwrap_or_default();
        if fields.len() > columns + 2 {
            tracing::debug!(
                "Row for {} has {} cells but the subsystem has {} columns.",
                genome_id,
                fields.len() - 2,
                columns
            );
        }
        let cells: Vec<&str> = (0..columns)
            .map(|i| fields.get(i + 2).copied().unwrap_or(""))
            .collect();
        let mut row = RowData::new(genome_id, &name, variant);
        row.fill_cells(&cells, &config.default_feature_type);
        Ok(Some(row))
    }

    /// Replaces this row's cells with ones parsed from cell strings.
    pub fn fill_cells(&mut self, cells: &[&str], default_type: &str) {
        self.types.clear();
        self.cells = cells
            .iter()
            .map(|spec| CellData::parse(&self.genome_id, spec, default_type, &mut self.types))
            .collect();
    }

    /// Fetches the current assignments of this row's features of interest.
    ///
    /// Only well-formed feature ids of this genome, of a type some cell in
    /// this row mentions, and not deleted are returned.
    pub fn functions<S: GenomeStore + ?Sized>(
        &self,
        store: &S,
    ) -> Result<BTreeMap<String, String>, CheckError> {
        let mut deleted = BTreeSet::new();
        for ftype in &self.types {
            deleted.extend(store.deleted_features(&self.genome_id, ftype)?);
        }
        let functions = store
            .function_assignments(&self.genome_id)?
            .into_iter()
            .filter(|(fid, _)| {
                FeatureId::parse(fid).is_some_and(|parsed| {
                    parsed.genome == self.genome_id
                        && self.types.contains(&parsed.ftype)
                        && !deleted.contains(fid)
                })
            })
            .collect();
        Ok(functions)
    }

    pub fn genome_id(&self) -> &str {
        &self.genome_id
    }

    /// The genome's display name; empty if the genome is not in the store.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Feature types mentioned by this row's cells.
    pub fn types(&self) -> &BTreeSet<String> {
        &self.types
    }

    pub fn cells(&self) -> &[CellData] {
        &self.cells
    }

    /// The cell in a column. Panics if the column is out of range.
    pub fn cell(&self, column: usize) -> &CellData {
        &self.cells[column]
    }

    pub fn cell_mut(&mut self, column: usize) -> &mut CellData {
        &mut self.cells[column]
    }

    /// True if the genome does not exist in the store.
    pub fn is_missing(&self) -> bool {
        self.name.is_empty()
    }

    /// True unless the variant code says the genome lacks the subsystem.
    /// A leading `*` on the code is ignored.
    pub fn is_active(&self) -> bool {
        let code = self.variant.trim_start_matches('*');
        !INACTIVE_VARIANTS.contains(&code)
    }

    pub(crate) fn reset_cells(&mut self) {
        for cell in &mut self.cells {
            cell.reset();
        }
    }
}

impl PartialEq for RowData {
    fn eq(&self, other: &Self) -> bool {
        self.genome_id == other.genome_id
    }
}

impl Eq for RowData {}

impl Ord for RowData {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.genome_id.cmp(&other.genome_id))
    }
}

impl PartialOrd for RowData {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RowData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.genome_id, self.name)
    }
}
