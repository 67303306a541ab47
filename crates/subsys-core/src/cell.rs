//! A single spreadsheet cell: the features one genome claims for one role.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::column::ColumnData;
use crate::feature::FeatureId;
use crate::state::{FeatureStatus, PegState};

/// The features in one (row, column) intersection, keyed by feature id.
///
/// Keys are either claimed by the spreadsheet or injected by validation as
/// [`PegState::Disconnected`]. Iteration is in feature-id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CellData {
    features: BTreeMap<String, FeatureStatus>,
}

impl CellData {
    /// Creates an empty cell.
    pub fn new() -> Self {
        CellData::default()
    }

    /// Builds a cell from its spreadsheet text.
    ///
    /// `spec` is a comma-separated list of feature numbers, each either bare
    /// (of `default_type`) or `<type>.<number>`. Every feature type seen is
    /// added to `types`.
    pub fn parse(
        genome_id: &str,
        spec: &str,
        default_type: &str,
        types: &mut BTreeSet<String>,
    ) -> Self {
        let mut cell = CellData::new();
        for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let (fid, ftype) = FeatureId::from_cell_token(genome_id, token, default_type);
            cell.features.insert(fid, FeatureStatus::new());
            types.insert(ftype);
        }
        cell
    }

    /// Claims a feature for this cell in the [`PegState::Missing`] state.
    pub fn claim(&mut self, fid: impl Into<String>) {
        self.features.insert(fid.into(), FeatureStatus::new());
    }

    /// Classifies a feature against this cell's column.
    ///
    /// A matching feature becomes [`PegState::Good`] if claimed, or is added
    /// as [`PegState::Disconnected`] if not. A claimed feature that does not
    /// match becomes [`PegState::BadRole`] carrying `function`. An unclaimed,
    /// non-matching feature is ignored.
    pub fn set_state(&mut self, fid: &str, function: &str, column: &ColumnData) {
        let matches = column.matches(function);
        match self.features.get_mut(fid) {
            Some(status) if matches => status.set_state(PegState::Good, function),
            Some(status) => status.set_state(PegState::BadRole, function),
            None if matches => {
                self.features
                    .insert(fid.to_string(), FeatureStatus::disconnected());
            }
            None => {}
        }
    }

    /// Returns the cell to its freshly parsed condition: injected features
    /// are dropped and claimed ones go back to [`PegState::Missing`].
    pub fn reset(&mut self) {
        self.features
            .retain(|_, status| status.state() != PegState::Disconnected);
        for status in self.features.values_mut() {
            status.set_state(PegState::Missing, "");
        }
    }

    pub fn status(&self, fid: &str) -> Option<&FeatureStatus> {
        self.features.get(fid)
    }

    pub fn contains(&self, fid: &str) -> bool {
        self.features.contains_key(fid)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterates the features of this cell in id order.
    pub fn features(&self) -> impl Iterator<Item = (&str, &FeatureStatus)> {
        self.features.iter().map(|(fid, status)| (fid.as_str(), status))
    }
}
