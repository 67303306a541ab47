//! Subsystem columns.
//!
//! A column is defined by a single function, which is almost always one
//! role but may be several. After validation it also holds the per-state
//! tallies of every cell in the column and the bad-role features grouped by
//! their offending assignment.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::cell::CellData;
use crate::roles::{roles_cover, roles_of_function};
use crate::state::PegState;

/// Features sharing one offending assignment within a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadRole {
    /// The offending functional assignment.
    pub function: String,
    /// Features carrying it, in id order.
    pub fids: BTreeSet<String>,
}

impl Ord for BadRole {
    /// Largest group first, then by function text.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fids
            .len()
            .cmp(&self.fids.len())
            .then_with(|| self.function.cmp(&other.function))
    }
}

impl PartialOrd for BadRole {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One role definition of a subsystem.
#[derive(Debug, Clone)]
pub struct ColumnData {
    index: usize,
    abbr: String,
    function: String,
    roles: Vec<String>,
    aux: bool,
    counts: [usize; 4],
    bad_roles: BTreeMap<String, BTreeSet<String>>,
}

impl ColumnData {
    /// Creates a column at a 0-based `index`.
    pub fn new(index: usize, abbr: &str, function: &str) -> Self {
        ColumnData {
            index,
            abbr: abbr.to_string(),
            function: function.to_string(),
            roles: roles_of_function(function),
            aux: false,
            counts: [0; 4],
            bad_roles: BTreeMap::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn abbr(&self) -> &str {
        &self.abbr
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    /// The roles making up this column's function.
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn is_aux(&self) -> bool {
        self.aux
    }

    pub fn set_aux(&mut self, aux: bool) {
        self.aux = aux;
    }

    /// Returns true if a feature assigned `function` belongs in this column.
    pub fn matches(&self, function: &str) -> bool {
        function == self.function || roles_cover(&self.roles, function)
    }

    /// Zeroes the tallies and bad-role groups ahead of a validation pass.
    pub fn reset_tallies(&mut self) {
        self.counts = [0; 4];
        self.bad_roles.clear();
    }

    /// Adds the features of one cell to the tallies.
    ///
    /// Call exactly once per row per validation pass, after
    /// [`ColumnData::reset_tallies`]; a second call for the same cell counts
    /// its features twice.
    pub fn count_cell(&mut self, cell: &CellData) {
        for (fid, status) in cell.features() {
            if let (PegState::BadRole, Some(function)) = (status.state(), status.function()) {
                self.bad_roles
                    .entry(function.to_string())
                    .or_default()
                    .insert(fid.to_string());
            }
            self.counts[status.state().index()] += 1;
        }
    }

    /// The tally for one state.
    pub fn count(&self, state: PegState) -> usize {
        self.counts[state.index()]
    }

    /// Missing, disconnected and bad-role features in this column.
    pub fn error_count(&self) -> usize {
        PegState::ALL
            .iter()
            .filter(|s| s.is_error())
            .map(|&s| self.count(s))
            .sum()
    }

    /// Total features tallied in this column.
    pub fn total_count(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn has_errors(&self) -> bool {
        !self.bad_roles.is_empty()
            || self.count(PegState::Disconnected) > 0
            || self.count(PegState::Missing) > 0
    }

    /// Bad-role groups, largest first, ties broken by function text.
    pub fn bad_roles(&self) -> Vec<BadRole> {
        let mut groups: Vec<BadRole> = self
            .bad_roles
            .iter()
            .map(|(function, fids)| BadRole {
                function: function.clone(),
                fids: fids.clone(),
            })
            .collect();
        groups.sort();
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::DEFAULT_FEATURE_TYPE;

    fn cell(genome: &str, spec: &str) -> CellData {
        let mut types = BTreeSet::new();
        CellData::parse(genome, spec, DEFAULT_FEATURE_TYPE, &mut types)
    }

    #[test]
    fn column_accessors() {
        let mut col = ColumnData::new(0, "R1", "fake role / other role");
        assert_eq!(col.index(), 0);
        assert_eq!(col.abbr(), "R1");
        assert_eq!(col.function(), "fake role / other role");
        assert_eq!(col.roles(), &["fake role".to_string(), "other role".to_string()]);
        assert!(!col.is_aux());
        col.set_aux(true);
        assert!(col.is_aux());
    }

    #[test]
    fn reordered_multi_role_function_is_good() {
        let col = ColumnData::new(0, "R1", "fake role / other role");
        assert!(col.matches("other role / fake role"));
        let mut c = cell("83333.1", "101");
        c.set_state("fig|83333.1.peg.101", "other role / fake role", &col);
        assert_eq!(c.status("fig|83333.1.peg.101").unwrap().state(), PegState::Good);
    }

    #[test]
    fn counting_good_cell() {
        let mut col = ColumnData::new(0, "R1", "fake role / other role");
        let mut c = cell("83333.1", "101");
        c.set_state("fig|83333.1.peg.101", "fake role / other role # comment", &col);
        col.count_cell(&c);
        assert_eq!(col.count(PegState::Good), 1);
        assert_eq!(col.count(PegState::Missing), 0);
        assert_eq!(col.count(PegState::Disconnected), 0);
        assert_eq!(col.count(PegState::BadRole), 0);
        assert!(!col.has_errors());
    }

    #[test]
    fn counting_errors_and_bad_role_groups() {
        let mut col = ColumnData::new(1, "R2", "bonus role");

        let mut c = cell("83333.1", "102,103");
        c.set_state("fig|83333.1.peg.99", "bonus role / other role", &col);
        c.set_state("fig|83333.1.peg.102", "fake role", &col);
        col.count_cell(&c);
        assert_eq!(col.count(PegState::Good), 0);
        assert_eq!(col.count(PegState::Missing), 1);
        assert_eq!(col.count(PegState::Disconnected), 1);
        assert_eq!(col.count(PegState::BadRole), 1);
        assert!(col.has_errors());

        let mut c = cell("99287.1", "1,2");
        c.set_state("fig|99287.1.peg.1", "wrong role", &col);
        col.count_cell(&c);
        let mut c = cell("209261.1", "4");
        c.set_state("fig|209261.1.peg.4", "wrong role", &col);
        col.count_cell(&c);

        assert_eq!(col.count(PegState::Good), 0);
        assert_eq!(col.count(PegState::Missing), 2);
        assert_eq!(col.count(PegState::Disconnected), 1);
        assert_eq!(col.count(PegState::BadRole), 3);
        assert_eq!(col.error_count(), 6);
        assert_eq!(col.total_count(), 6);

        let groups = col.bad_roles();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].function, "wrong role");
        assert_eq!(
            groups[0].fids.iter().collect::<Vec<_>>(),
            vec!["fig|209261.1.peg.4", "fig|99287.1.peg.1"]
        );
        assert_eq!(groups[1].function, "fake role");
        assert_eq!(
            groups[1].fids.iter().collect::<Vec<_>>(),
            vec!["fig|83333.1.peg.102"]
        );
    }

    #[test]
    fn untouched_cell_counts_as_missing() {
        let mut col = ColumnData::new(2, "R3", "new role");
        col.count_cell(&cell("83333.1", "104"));
        assert_eq!(col.count(PegState::Missing), 1);
        assert!(col.has_errors());
    }

    #[test]
    fn bad_role_ties_sort_by_function() {
        let mut col = ColumnData::new(0, "R1", "right role");
        let mut c = cell("1.1", "1,2");
        c.set_state("fig|1.1.peg.1", "zeta role", &col);
        c.set_state("fig|1.1.peg.2", "alpha role", &col);
        col.count_cell(&c);
        let names: Vec<_> = col.bad_roles().into_iter().map(|b| b.function).collect();
        assert_eq!(names, vec!["alpha role", "zeta role"]);
    }

    #[test]
    fn reset_tallies_clears_everything() {
        let mut col = ColumnData::new(0, "R1", "right role");
        let mut c = cell("1.1", "1");
        c.set_state("fig|1.1.peg.1", "wrong role", &col);
        col.count_cell(&c);
        assert!(col.has_errors());
        col.reset_tallies();
        assert_eq!(col.total_count(), 0);
        assert!(col.bad_roles().is_empty());
        assert!(!col.has_errors());
    }

    #[test]
    fn counting_twice_double_counts() {
        let mut col = ColumnData::new(0, "R1", "right role");
        let c = cell("1.1", "1");
        col.count_cell(&c);
        col.count_cell(&c);
        assert_eq!(col.count(PegState::Missing), 2);
    }
}
