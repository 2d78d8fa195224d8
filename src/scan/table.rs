// src/scan/table.rs

use std::collections::{BTreeMap, HashSet};
use std::ops::Bound;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A file the scanner has seen, with its last observed modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedPath {
    pub path: PathBuf,
    /// `None` if the file was seen but its timestamp could not be read.
    pub modified: Option<SystemTime>,
}

/// How a freshly observed path relates to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    New,
    Modified,
    Unchanged,
}

/// Authoritative record of every path observed so far.
///
/// Invariant: every key existed at its last observation. Entries are kept
/// sorted by path, so bulk operations (like deletion detection) see them in
/// a stable order.
#[derive(Debug, Clone, Default)]
pub struct WatchTable {
    entries: BTreeMap<PathBuf, Option<SystemTime>>,
}

impl WatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn get(&self, path: &Path) -> Option<WatchedPath> {
        self.entries.get(path).map(|modified| WatchedPath {
            path: path.to_path_buf(),
            modified: *modified,
        })
    }

    /// Insert or update `path`.
    pub fn record(&mut self, path: PathBuf, modified: Option<SystemTime>) {
        self.entries.insert(path, modified);
    }

    /// Returns true if `path` was present.
    pub fn remove(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(PathBuf::as_path)
    }

    pub fn entries(&self) -> impl Iterator<Item = WatchedPath> + '_ {
        self.entries.iter().map(|(path, modified)| WatchedPath {
            path: path.clone(),
            modified: *modified,
        })
    }

    /// Classify an observation of `path` with timestamp `modified`.
    ///
    /// Only a strictly newer timestamp counts as a modification; an equal
    /// one (a no-op touch within timer resolution) does not.
    pub fn classify(&self, path: &Path, modified: Option<SystemTime>) -> Change {
        match self.entries.get(path) {
            None => Change::New,
            Some(recorded) if is_newer(modified, *recorded) => Change::Modified,
            Some(_) => Change::Unchanged,
        }
    }

    /// Recorded paths strictly below the directory `dir`, in path order.
    pub fn under(&self, dir: &Path) -> Vec<PathBuf> {
        self.entries
            .range::<Path, _>((Bound::Excluded(dir), Bound::Unbounded))
            .map(|(path, _)| path)
            .take_while(|path| path.starts_with(dir))
            .cloned()
            .collect()
    }

    /// Paths in the table that are not in `seen`, in path order.
    pub fn missing_from(&self, seen: &HashSet<PathBuf>) -> Vec<PathBuf> {
        self.entries
            .keys()
            .filter(|path| !seen.contains(*path))
            .cloned()
            .collect()
    }
}

/// An unreadable current timestamp is never newer; an unreadable recorded
/// one is older than anything readable.
pub fn is_newer(current: Option<SystemTime>, recorded: Option<SystemTime>) -> bool {
    match (current, recorded) {
        (Some(current), Some(recorded)) => current > recorded,
        (Some(_), None) => true,
        (None, _) => false,
    }
}
