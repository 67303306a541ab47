//! The subsystem aggregate and its validation pass.
//!
//! A [`SubsystemData`] comes from one of two paths. [`SubsystemData::load`]
//! parses the whole spreadsheet and resolves every row's genome, leaving the
//! tallies empty and the error count suspect until
//! [`SubsystemData::validate_rows`] runs. [`SubsystemData::survey`] reads
//! only the cached error count and judges how far to trust it.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use subsys_core::ColumnData;
use subsys_store::marker::read_marker;
use subsys_store::GenomeStore;

use crate::cache::{file_modified, is_stale, read_cached_count, write_cached_count};
use crate::config::ValidationConfig;
use crate::error::CheckError;
use crate::layout::CoreLayout;
use crate::report::{SubsystemReport, SurveyReport};
use crate::row::RowData;
use crate::spreadsheet::Spreadsheet;

/// Marker content that makes a subsystem public.
const PUBLIC_FLAG: &str = "1";

/// A subsystem spreadsheet and its validation results.
#[derive(Debug, Clone)]
pub struct SubsystemData {
    id: String,
    name: String,
    columns: Vec<ColumnData>,
    rows: BTreeMap<String, RowData>,
    missing_genomes: BTreeSet<String>,
    error_count: usize,
    suspect: bool,
    curator: String,
    private: bool,
    error_count_file: PathBuf,
}

impl SubsystemData {
    /// An empty subsystem with a suspect error count of zero.
    fn empty(layout: &CoreLayout, ss_id: &str) -> Self {
        SubsystemData {
            id: ss_id.to_string(),
            name: ss_id.replace('_', " "),
            columns: Vec::new(),
            rows: BTreeMap::new(),
            missing_genomes: BTreeSet::new(),
            error_count: 0,
            suspect: true,
            curator: String::new(),
            private: true,
            error_count_file: layout.error_count_file(ss_id),
        }
    }

    /// Parses a subsystem's spreadsheet and loads its rows.
    ///
    /// Returns `Ok(None)` if the subsystem has no spreadsheet. Rows whose
    /// genome is not in the store are recorded in
    /// [`SubsystemData::missing_genomes`] instead of the row set. When two
    /// rows name the same genome the later one wins.
    pub fn load<S: GenomeStore + ?Sized>(
        layout: &CoreLayout,
        store: &S,
        ss_id: &str,
        config: &ValidationConfig,
    ) -> Result<Option<Self>, CheckError> {
        let ss_file = layout.spreadsheet_file(ss_id);
        if !ss_file.is_file() {
            tracing::warn!("Subsystem {} not found at {}.", ss_id, ss_file.display());
            return Ok(None);
        }
        tracing::info!("Reading spreadsheet for {}.", ss_id);
        let sheet = Spreadsheet::read(&ss_file)?;

        let mut ss = SubsystemData::empty(layout, ss_id);
        ss.read_metadata(layout)?;
        ss.columns = sheet
            .columns
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let mut col = ColumnData::new(i, &spec.abbr, &spec.function);
                col.set_aux(sheet.aux_columns.contains(&i));
                col
            })
            .collect();

        let width = ss.columns.len();
        for line in &sheet.rows {
            let Some(row) = RowData::load(store, line, width, config)? else {
                continue;
            };
            if row.is_missing() {
                ss.missing_genomes.insert(row.genome_id().to_string());
            } else if let Some(old) = ss.rows.insert(row.genome_id().to_string(), row) {
                tracing::debug!("Duplicate row for {} replaced.", old.genome_id());
            }
        }
        tracing::info!(
            "{} rows loaded for {}, {} genomes missing.",
            ss.rows.len(),
            ss_id,
            ss.missing_genomes.len()
        );
        Ok(Some(ss))
    }

    /// Reads a subsystem's cached error count without parsing its rows.
    ///
    /// Returns `Ok(None)` if the subsystem has no spreadsheet.
    pub fn survey(
        layout: &CoreLayout,
        ss_id: &str,
        config: &ValidationConfig,
    ) -> Result<Option<Self>, CheckError> {
        SubsystemData::survey_at(layout, ss_id, config, SystemTime::now())
    }

    /// [`SubsystemData::survey`] with an explicit notion of "now".
    pub fn survey_at(
        layout: &CoreLayout,
        ss_id: &str,
        config: &ValidationConfig,
        now: SystemTime,
    ) -> Result<Option<Self>, CheckError> {
        let ss_file = layout.spreadsheet_file(ss_id);
        if !ss_file.is_file() {
            tracing::warn!("Subsystem {} not found at {}.", ss_id, ss_file.display());
            return Ok(None);
        }
        let mut ss = SubsystemData::empty(layout, ss_id);
        ss.read_metadata(layout)?;
        let cached = read_cached_count(&ss.error_count_file);
        ss.error_count = cached.map_or(0, |c| c.value);
        ss.suspect = is_stale(
            cached.as_ref(),
            file_modified(&ss_file),
            now,
            config.stale_after(),
        );
        Ok(Some(ss))
    }

    fn read_metadata(&mut self, layout: &CoreLayout) -> Result<(), CheckError> {
        self.curator = read_optional_marker(&layout.curator_file(&self.id))?.unwrap_or_default();
        self.private = read_optional_marker(&layout.exchangable_file(&self.id))?.as_deref()
            != Some(PUBLIC_FLAG);
        Ok(())
    }

    /// Checks every row against its genome's current assignments.
    ///
    /// All assignments are fetched before anything is changed, so a store
    /// failure leaves the subsystem exactly as it was. Otherwise the cells
    /// and column tallies are reset, so the pass can be repeated. Afterwards
    /// the tallies and error count are authoritative and the count is
    /// written to the cache. A failed cache write is logged and otherwise
    /// ignored.
    pub fn validate_rows<S: GenomeStore + ?Sized>(&mut self, store: &S) -> Result<(), CheckError> {
        tracing::info!("Validating subsystem {}.", self.name);
        let mut assignments = Vec::with_capacity(self.rows.len());
        for row in self.rows.values() {
            tracing::debug!("Scanning {}.", row);
            assignments.push(row.functions(store)?);
        }

        for col in &mut self.columns {
            col.reset_tallies();
        }
        for (row, functions) in self.rows.values_mut().zip(&assignments) {
            row.reset_cells();
            for (fid, function) in functions {
                for col in &self.columns {
                    row.cell_mut(col.index()).set_state(fid, function, col);
                }
            }
        }
        tracing::info!("Summarizing columns in {}.", self.name);
        for col in &mut self.columns {
            for row in self.rows.values() {
                col.count_cell(row.cell(col.index()));
            }
        }
        self.error_count = self.missing_genomes.len()
            + self
                .columns
                .iter()
                .map(ColumnData::error_count)
                .sum::<usize>();
        self.suspect = false;
        if let Err(e) = write_cached_count(&self.error_count_file, self.error_count) {
            tracing::warn!(
                "Could not save error count for {} to {}: {}",
                self.id,
                self.error_count_file.display(),
                e
            );
        }
        tracing::info!("{} errors found in {}.", self.error_count, self.name);
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The id with underscores shown as spaces.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnData] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&ColumnData> {
        self.columns.get(index)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows with a genome present in the store.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows sorted by genome name, then genome id.
    pub fn rows(&self) -> Vec<&RowData> {
        let mut rows: Vec<&RowData> = self.rows.values().collect();
        rows.sort();
        rows
    }

    pub fn row(&self, genome_id: &str) -> Option<&RowData> {
        self.rows.get(genome_id)
    }

    pub fn missing_genomes(&self) -> &BTreeSet<String> {
        &self.missing_genomes
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// True until validation has run, or when a surveyed count is stale.
    pub fn is_suspect_error_count(&self) -> bool {
        self.suspect
    }

    pub fn health(&self) -> f64 {
        health_ratio(self.error_count, self.width(), self.len())
    }

    /// The curator's name; empty if none is recorded.
    pub fn curator(&self) -> &str {
        &self.curator
    }

    pub fn is_private(&self) -> bool {
        self.private
    }

    /// Path of the error count cache.
    pub fn error_count_file(&self) -> &Path {
        &self.error_count_file
    }

    pub fn report(&self) -> SubsystemReport {
        SubsystemReport::from_subsystem(self)
    }

    pub fn survey_report(&self) -> SurveyReport {
        SurveyReport::from_subsystem(self)
    }
}

fn read_optional_marker(path: &Path) -> Result<Option<String>, CheckError> {
    read_marker(path).map_err(|e| CheckError::io(path, e))
}

/// Fraction of a subsystem's obligations met without error.
///
/// Every row owes one feature set per column plus its own existence, so the
/// total is `(columns + 1) * rows`. A subsystem without rows has health 0.
/// The result is clamped to `[0, 1]`.
pub fn health_ratio(error_count: usize, columns: usize, rows: usize) -> f64 {
    if rows == 0 {
        return 0.0;
    }
    let total = ((columns + 1) * rows) as f64;
    ((total - error_count as f64) / total).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;
    use std::fs;
    use subsys_core::PegState;
    use subsys_store::{InMemoryStore, StoreError};

    const SHEET: &str = "Thr\tThreonine stuffase\n\
                         NimT\t2-nitroimidazole transporter NimT\n\
                         //\n\
                         AUX 2\n\
                         //\n\
                         83333.1\tactive\t1\t2\n\
                         99287.1\tlikely\t10\t\n\
                         100226.1\tactive\t4\t5\n";

    fn store() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        store.add_genome("83333.1", "Escherichia coli K-12");
        store.add_genome("99287.1", "Salmonella typhimurium LT2");
        store.assign("fig|83333.1.peg.1", "Threonine stuffase");
        store.assign("fig|83333.1.peg.2", "wrong role");
        store.assign("fig|83333.1.peg.3", "2-nitroimidazole transporter NimT");
        store.assign("fig|99287.1.peg.10", "Threonine stuffase");
        store
    }

    fn core(sheet: &str) -> (tempfile::TempDir, CoreLayout) {
        let dir = tempfile::tempdir().unwrap();
        let layout = CoreLayout::new(dir.path());
        fs::create_dir_all(layout.subsystem_dir("Thr_test")).unwrap();
        fs::write(layout.spreadsheet_file("Thr_test"), sheet).unwrap();
        (dir, layout)
    }

    fn load(layout: &CoreLayout) -> SubsystemData {
        SubsystemData::load(layout, &store(), "Thr_test", &ValidationConfig::default())
            .unwrap()
            .unwrap()
    }

    #[test]
    fn load_builds_columns_and_rows() {
        let (_dir, layout) = core(SHEET);
        let ss = load(&layout);
        assert_eq!(ss.id(), "Thr_test");
        assert_eq!(ss.name(), "Thr test");
        assert_eq!(ss.width(), 2);
        assert!(!ss.columns()[0].is_aux());
        assert!(ss.columns()[1].is_aux());
        assert_eq!(ss.len(), 2);
        assert_eq!(
            ss.missing_genomes().iter().collect::<Vec<_>>(),
            vec!["100226.1"]
        );
        assert!(ss.is_suspect_error_count());
        assert_eq!(ss.error_count(), 0);
        assert!(ss.is_private());
        assert_eq!(ss.curator(), "");
        let names: Vec<&str> = ss.rows().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["Escherichia coli K-12", "Salmonella typhimurium LT2"]);
    }

    #[test]
    fn missing_subsystem_is_none() {
        let (_dir, layout) = core(SHEET);
        let config = ValidationConfig::default();
        assert!(SubsystemData::load(&layout, &store(), "Nope", &config)
            .unwrap()
            .is_none());
        assert!(SubsystemData::survey(&layout, "Nope", &config).unwrap().is_none());
    }

    #[test]
    fn validation_classifies_and_counts() {
        let (_dir, layout) = core(SHEET);
        let mut ss = load(&layout);
        ss.validate_rows(&store()).unwrap();

        let row = ss.row("83333.1").unwrap();
        assert_eq!(
            row.cell(0).status("fig|83333.1.peg.1").unwrap().state(),
            PegState::Good
        );
        let bad = row.cell(1).status("fig|83333.1.peg.2").unwrap();
        assert_eq!(bad.state(), PegState::BadRole);
        assert_eq!(bad.function(), Some("wrong role"));
        assert_eq!(
            row.cell(1).status("fig|83333.1.peg.3").unwrap().state(),
            PegState::Disconnected
        );

        let thr = &ss.columns()[0];
        assert_eq!(thr.count(PegState::Good), 2);
        assert!(!thr.has_errors());
        let nim = &ss.columns()[1];
        assert_eq!(nim.count(PegState::BadRole), 1);
        assert_eq!(nim.count(PegState::Disconnected), 1);

        // One missing genome, one bad role, one disconnected.
        assert_eq!(ss.error_count(), 3);
        assert!(!ss.is_suspect_error_count());
        assert!((ss.health() - 0.5).abs() < 1e-9);
        assert_eq!(
            fs::read_to_string(layout.error_count_file("Thr_test")).unwrap().trim(),
            "3"
        );
    }

    #[test]
    fn revalidation_gives_the_same_result() {
        let (_dir, layout) = core(SHEET);
        let mut ss = load(&layout);
        ss.validate_rows(&store()).unwrap();
        let first = serde_json::to_string(&ss.report()).unwrap();
        ss.validate_rows(&store()).unwrap();
        assert_eq!(serde_json::to_string(&ss.report()).unwrap(), first);
        assert_eq!(ss.columns()[1].total_count(), 2);
    }

    /// Fails every assignment lookup for one genome.
    struct FailingStore {
        inner: InMemoryStore,
        broken: &'static str,
    }

    impl GenomeStore for FailingStore {
        fn genome_name(&self, genome_id: &str) -> Result<Option<String>, StoreError> {
            self.inner.genome_name(genome_id)
        }

        fn deleted_features(
            &self,
            genome_id: &str,
            feature_type: &str,
        ) -> Result<BTreeSet<String>, StoreError> {
            self.inner.deleted_features(genome_id, feature_type)
        }

        fn function_assignments(
            &self,
            genome_id: &str,
        ) -> Result<HashMap<String, String>, StoreError> {
            if genome_id == self.broken {
                return Err(StoreError::Io {
                    path: PathBuf::from("assigned_functions"),
                    source: std::io::Error::new(std::io::ErrorKind::InvalidData, "unreadable"),
                });
            }
            self.inner.function_assignments(genome_id)
        }
    }

    #[test]
    fn failed_revalidation_keeps_previous_results() {
        let (_dir, layout) = core(SHEET);
        let mut ss = load(&layout);
        ss.validate_rows(&store()).unwrap();
        let before = serde_json::to_string(&ss.report()).unwrap();

        let failing = FailingStore {
            inner: store(),
            broken: "99287.1",
        };
        assert!(matches!(
            ss.validate_rows(&failing),
            Err(CheckError::Store(_))
        ));
        assert!(!ss.is_suspect_error_count());
        assert_eq!(ss.error_count(), 3);
        assert_eq!(ss.columns()[0].count(PegState::Good), 2);
        assert_eq!(serde_json::to_string(&ss.report()).unwrap(), before);
    }

    #[test]
    fn failed_first_validation_stays_suspect() {
        let (_dir, layout) = core(SHEET);
        let mut ss = load(&layout);
        let failing = FailingStore {
            inner: store(),
            broken: "83333.1",
        };
        assert!(ss.validate_rows(&failing).is_err());
        assert!(ss.is_suspect_error_count());
        assert_eq!(ss.columns()[0].total_count(), 0);
        assert!(!layout.error_count_file("Thr_test").exists());
    }

    #[test]
    fn survey_reads_metadata() {
        let (_dir, layout) = core(SHEET);
        fs::write(layout.curator_file("Thr_test"), "parrello\n").unwrap();
        fs::write(layout.exchangable_file("Thr_test"), "1\n").unwrap();
        let ss = SubsystemData::survey(&layout, "Thr_test", &ValidationConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(ss.curator(), "parrello");
        assert!(!ss.is_private());
        assert!(ss.is_suspect_error_count());
        assert_eq!(ss.error_count(), 0);
        assert_eq!(ss.width(), 0);
    }

    #[test]
    fn exchangable_zero_is_private() {
        let (_dir, layout) = core(SHEET);
        fs::write(layout.exchangable_file("Thr_test"), "0\n").unwrap();
        assert!(load(&layout).is_private());
    }

    #[test]
    fn survey_trusts_fresh_count() {
        let (_dir, layout) = core(SHEET);
        let mut ss = load(&layout);
        ss.validate_rows(&store()).unwrap();
        let ss = SubsystemData::survey(&layout, "Thr_test", &ValidationConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(ss.error_count(), 3);
        assert!(!ss.is_suspect_error_count());
    }

    #[test]
    fn survey_distrusts_old_count() {
        let (_dir, layout) = core(SHEET);
        let mut ss = load(&layout);
        ss.validate_rows(&store()).unwrap();
        let config = ValidationConfig::default();
        let later = SystemTime::now() + config.stale_after() * 2;
        let ss = SubsystemData::survey_at(&layout, "Thr_test", &config, later)
            .unwrap()
            .unwrap();
        assert_eq!(ss.error_count(), 3);
        assert!(ss.is_suspect_error_count());
    }

    #[test]
    fn health_edges() {
        assert_eq!(health_ratio(0, 5, 0), 0.0);
        assert_eq!(health_ratio(0, 5, 3), 1.0);
        assert_eq!(health_ratio(100, 1, 1), 0.0);
        assert!((health_ratio(3, 2, 2) - 0.5).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn health_is_bounded(errors in 0usize..10_000, columns in 0usize..50, rows in 0usize..200) {
            let h = health_ratio(errors, columns, rows);
            prop_assert!((0.0..=1.0).contains(&h));
            if rows > 0 {
                prop_assert_eq!(h == 1.0, errors == 0);
            }
        }
    }
}
