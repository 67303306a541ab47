//! Serializable views of subsystem data.
//!
//! These carry what a presentation layer needs to render a subsystem and
//! nothing more. They are plain data built from a [`SubsystemData`] and are
//! what the CLI prints.

use std::collections::BTreeMap;

use serde::Serialize;
use subsys_core::{BadRole, CellData, ColumnData, PegState};

use crate::row::RowData;
use crate::subsystem::SubsystemData;

/// A fully loaded (and usually validated) subsystem.
#[derive(Debug, Clone, Serialize)]
pub struct SubsystemReport {
    pub id: String,
    pub name: String,
    pub error_count: usize,
    pub health: f64,
    /// True if the counts below are not the result of a validation pass.
    pub suspect: bool,
    pub curator: String,
    pub private: bool,
    pub missing_genomes: Vec<String>,
    pub columns: Vec<ColumnReport>,
    pub rows: Vec<RowReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnReport {
    pub index: usize,
    pub abbr: String,
    pub function: String,
    pub aux: bool,
    pub counts: BTreeMap<PegState, usize>,
    pub bad_roles: Vec<BadRole>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowReport {
    pub genome_id: String,
    pub name: String,
    pub variant: String,
    pub active: bool,
    pub cells: Vec<CellData>,
}

/// The cheap summary produced by a survey.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyReport {
    pub id: String,
    pub name: String,
    pub error_count: usize,
    pub suspect: bool,
    pub curator: String,
    pub private: bool,
}

impl SubsystemReport {
    pub fn from_subsystem(ss: &SubsystemData) -> Self {
        SubsystemReport {
            id: ss.id().to_string(),
            name: ss.name().to_string(),
            error_count: ss.error_count(),
            health: ss.health(),
            suspect: ss.is_suspect_error_count(),
            curator: ss.curator().to_string(),
            private: ss.is_private(),
            missing_genomes: ss.missing_genomes().iter().cloned().collect(),
            columns: ss.columns().iter().map(ColumnReport::from_column).collect(),
            rows: ss.rows().into_iter().map(RowReport::from_row).collect(),
        }
    }
}

impl ColumnReport {
    pub fn from_column(col: &ColumnData) -> Self {
        ColumnReport {
            index: col.index(),
            abbr: col.abbr().to_string(),
            function: col.function().to_string(),
            aux: col.is_aux(),
            counts: PegState::ALL.iter().map(|&s| (s, col.count(s))).collect(),
            bad_roles: col.bad_roles(),
        }
    }
}

impl RowReport {
    pub fn from_row(row: &RowData) -> Self {
        RowReport {
            genome_id: row.genome_id().to_string(),
            name: row.name().to_string(),
            variant: row.variant().to_string(),
            active: row.is_active(),
            cells: row.cells().to_vec(),
        }
    }
}

impl SurveyReport {
    pub fn from_subsystem(ss: &SubsystemData) -> Self {
        SurveyReport {
            id: ss.id().to_string(),
            name: ss.name().to_string(),
            error_count: ss.error_count(),
            suspect: ss.is_suspect_error_count(),
            curator: ss.curator().to_string(),
            private: ss.is_private(),
        }
    }
}
