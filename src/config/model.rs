// src/config/model.rs

use serde::Deserialize;

use crate::validate::DEFAULT_EXTENSIONS;

/// A scent file as read from TOML, before validation.
///
/// ```toml
/// [watch]
/// paths = ["src", "tests"]
/// extensions = ["rs"]
///
/// [[validator]]
/// name = "rust_files"
/// extensions = ["rs"]
/// patterns = ["src/**/*.rs"]
/// runnable = "unit"
///
/// [[runner]]
/// name = "unit"
/// cmd = "cargo test --lib"
/// ```
///
/// Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawScentFile {
    #[serde(default)]
    pub watch: WatchSection,

    /// `[[validator]]` entries, in chain order.
    #[serde(default, rename = "validator")]
    pub validators: Vec<ValidatorConfig>,

    /// `[[runner]]` entries, in run order.
    #[serde(default, rename = "runner")]
    pub runners: Vec<RunnerConfig>,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Roots to watch, relative to the working directory.
    #[serde(default = "default_paths")]
    pub paths: Vec<String>,

    /// Extensions for the fallback validator used while no `[[validator]]`
    /// is defined.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_paths() -> Vec<String> {
    vec![".".to_string()]
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            paths: default_paths(),
            extensions: default_extensions(),
        }
    }
}

/// `[[validator]]` entry. A path is accepted if it matches any extension or
/// any glob pattern.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidatorConfig {
    pub name: String,

    #[serde(default)]
    pub extensions: Vec<String>,

    /// Globs matched against the path relative to the scent file's
    /// directory (or the absolute path).
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Runner this validator selects; any validator with one puts the chain
    /// in selection mode.
    #[serde(default)]
    pub runnable: Option<String>,
}

/// `[[runner]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    pub name: String,
    pub cmd: String,
}

/// A scent file that passed validation.
///
/// Only constructed through `TryFrom<RawScentFile>`.
#[derive(Debug, Clone)]
pub struct ScentFile {
    pub watch: WatchSection,
    pub validators: Vec<ValidatorConfig>,
    pub runners: Vec<RunnerConfig>,
}

impl ScentFile {
    pub(crate) fn new_unchecked(raw: RawScentFile) -> Self {
        Self {
            watch: raw.watch,
            validators: raw.validators,
            runners: raw.runners,
        }
    }
}
