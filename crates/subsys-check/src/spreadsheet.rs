//! Spreadsheet file parser.
//!
//! A spreadsheet is tab-delimited text in three sections separated by lines
//! holding only `//`:
//!
//! 1. columns: `<abbreviation>\t<function>`
//! 2. groups: whitespace-separated tokens; `AUX` followed by 1-based column
//!    numbers marks those columns auxiliary, other groups are ignored
//! 3. rows: `<genome>\t<variant>\t<cell>\t<cell>...`
//!
//! Rows are kept as raw lines here; [`crate::row::RowData::load`] parses them.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::CheckError;

/// Line separating spreadsheet sections.
pub const SECTION_MARKER: &str = "//";

/// Group name marking auxiliary columns.
const AUX_GROUP: &str = "AUX";

/// One column definition from the first section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub abbr: String,
    pub function: String,
}

/// The parsed sections of a spreadsheet file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spreadsheet {
    pub columns: Vec<ColumnSpec>,
    /// 0-based indices of auxiliary columns.
    pub aux_columns: BTreeSet<usize>,
    /// Raw row lines, blank lines removed.
    pub rows: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Columns,
    Groups,
    Rows,
}

impl Spreadsheet {
    /// Reads and parses a spreadsheet file.
    pub fn read(path: &Path) -> Result<Spreadsheet, CheckError> {
        let text = std::fs::read_to_string(path).map_err(|e| CheckError::io(path, e))?;
        Spreadsheet::parse(path, &text)
    }

    /// Parses spreadsheet text. `path` is used only for error reporting.
    pub fn parse(path: &Path, text: &str) -> Result<Spreadsheet, CheckError> {
        let mut sheet = Spreadsheet::default();
        let mut aux_numbers: Vec<(usize, String)> = Vec::new();
        let mut section = Section::Columns;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim_end_matches('\r');
            if line.trim_end() == SECTION_MARKER {
                section = match section {
                    Section::Columns => Section::Groups,
                    Section::Groups | Section::Rows => Section::Rows,
                };
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            match section {
                Section::Columns => {
                    sheet.columns.push(parse_column(path, line_no, line)?);
                }
                Section::Groups => {
                    let mut tokens = line.split_whitespace();
                    if tokens
                        .next()
                        .is_some_and(|t| t.eq_ignore_ascii_case(AUX_GROUP))
                    {
                        aux_numbers.extend(tokens.map(|t| (line_no, t.to_string())));
                    }
                }
                Section::Rows => sheet.rows.push(line.to_string()),
            }
        }

        for (line_no, token) in aux_numbers {
            match token.parse::<usize>() {
                Ok(n) if n >= 1 && n <= sheet.columns.len() => {
                    sheet.aux_columns.insert(n - 1);
                }
                _ => tracing::warn!(
                    "Ignoring invalid auxiliary column \"{}\" at {} line {}.",
                    token,
                    path.display(),
                    line_no
                ),
            }
        }
        Ok(sheet)
    }
}

fn parse_column(path: &Path, line_no: usize, line: &str) -> Result<ColumnSpec, CheckError> {
    let mut parts = line.split('\t');
    let abbr = parts.next().unwrap_or("").trim();
    match parts.next() {
        Some(function) => Ok(ColumnSpec {
            abbr: abbr.to_string(),
            function: function.trim().to_string(),
        }),
        None => Err(CheckError::Malformed {
            path: PathBuf::from(path),
            line: line_no,
            reason: format!("column definition \"{line}\" has no function"),
        }),
    }
}
