//! Marker files: small files holding a single value on one line.
//!
//! The SEED layout records genome names, curators, visibility flags and the
//! cached error count this way.

use std::fmt::Display;
use std::io;
use std::path::Path;

/// Reads a marker file, returning its first line with surrounding
/// whitespace removed. A missing file is `Ok(None)`.
pub fn read_marker(path: &Path) -> io::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text.lines().next().unwrap_or("").trim().to_string())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Writes a value to a marker file, replacing any previous content.
pub fn write_marker(path: &Path, value: impl Display) -> io::Result<()> {
    std::fs::write(path, format!("{value}\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_marker_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_marker(&dir.path().join("GENOME")).unwrap(), None);
    }

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("GENOME");
        write_marker(&path, "Escherichia coli K-12").unwrap();
        assert_eq!(
            read_marker(&path).unwrap().as_deref(),
            Some("Escherichia coli K-12")
        );

        let count = dir.path().join("ERRORCOUNT");
        write_marker(&count, 11).unwrap();
        assert_eq!(std::fs::read_to_string(&count).unwrap(), "11\n");
    }

    #[test]
    fn only_first_line_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curator");
        std::fs::write(&path, "  gjo \nsecond line\n").unwrap();
        assert_eq!(read_marker(&path).unwrap().as_deref(), Some("gjo"));
    }
}
