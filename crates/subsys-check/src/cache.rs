//! The cached error count and its staleness policy.
//!
//! Validation persists a subsystem's error count to a one-line marker file.
//! A survey reads it back and decides, from file timestamps alone, whether
//! the count can be trusted. The decision itself is the pure function
//! [`is_stale`]; [`read_cached_count`] and [`file_modified`] only
//! gather its inputs.

use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};

use subsys_store::marker::{read_marker, write_marker};

/// A previously persisted error count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedCount {
    pub value: usize,
    /// When the cache artifact was last written.
    pub written_at: SystemTime,
}

/// Decides whether a cached count is untrustworthy.
///
/// Stale when there is no cache, when the source was modified after the
/// cache was written, or when the cache is older than `max_age`. An unknown
/// source modification time does not by itself make the cache stale. A
/// cache timestamp in the future counts as age zero.
pub fn is_stale(
    cached: Option<&CachedCount>,
    source_modified_at: Option<SystemTime>,
    now: SystemTime,
    max_age: Duration,
) -> bool {
    let Some(cached) = cached else {
        return true;
    };
    if source_modified_at.is_some_and(|modified| modified > cached.written_at) {
        return true;
    }
    let age = now
        .duration_since(cached.written_at)
        .unwrap_or(Duration::ZERO);
    age > max_age
}

/// Reads the cache artifact. Absent or unreadable caches are `None`.
pub fn read_cached_count(path: &Path) -> Option<CachedCount> {
    let text = match read_marker(path) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Could not read error count cache {}: {}", path.display(), e);
            return None;
        }
    };
    let Ok(value) = text.parse::<usize>() else {
        tracing::warn!(
            "Error count cache {} holds \"{}\", not a count.",
            path.display(),
            text
        );
        return None;
    };
    let written_at = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(CachedCount { value, written_at })
}

/// Persists an error count, replacing the cache artifact.
pub fn write_cached_count(path: &Path, value: usize) -> io::Result<()> {
    write_marker(path, value)
}

/// Last modification time of a file, if it can be determined.
pub fn file_modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
