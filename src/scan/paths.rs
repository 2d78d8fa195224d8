// src/scan/paths.rs

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::errors::Result;

/// Normalized, absolute, de-duplicated set of root directories to watch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSet {
    roots: Vec<PathBuf>,
}

impl PathSet {
    /// Fails only if a relative path is given and the working directory
    /// cannot be read.
    pub fn new<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut set = Self::default();
        for path in paths {
            set.add(path)?;
        }
        Ok(set)
    }

    /// Add a root; duplicates (after normalization) are ignored.
    pub fn add(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = absolutize(path.as_ref())?;
        if !self.roots.contains(&path) {
            self.roots.push(path);
        }
        Ok(self)
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }
}

/// Make `path` absolute against the current directory and fold away `.` and
/// `..` components lexically. Symlinks are not resolved.
///
/// The working directory is only read for relative paths.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(normalize_against(path, Path::new("/")));
    }
    let cwd = std::env::current_dir()?;
    Ok(normalize_against(path, &cwd))
}

/// Join `path` onto the absolute `base` (unless it is absolute already) and
/// fold away `.` and `..` lexically.
pub fn normalize_against(path: &Path, base: &Path) -> PathBuf {
    let joined = base.join(path);

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
