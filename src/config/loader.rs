// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{RawScentFile, ScentFile};
use crate::errors::Result;

/// Scent file looked up in the working directory when `--scent` is not given.
pub const DEFAULT_SCENT_FILE: &str = "scent.toml";

/// Read and deserialize a scent file without semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawScentFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let raw: RawScentFile = toml::from_str(&contents)?;
    Ok(raw)
}

/// Read a scent file and validate it.
///
/// Checks that names are unique, that every `runnable` names a runner and
/// that glob patterns compile.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ScentFile> {
    let raw = load_from_path(path)?;
    ScentFile::try_from(raw)
}

pub fn default_scent_path() -> PathBuf {
    PathBuf::from(DEFAULT_SCENT_FILE)
}
