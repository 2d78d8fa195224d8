// src/validate/validator.rs

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Version-control directories; any path with one of these as a segment is
/// never watched.
pub const VCS_DIRS: [&str; 5] = [".git", ".hg", ".svn", ".cvs", ".bzr"];

/// Extensions accepted by the default validator when nothing else is
/// configured.
pub const DEFAULT_EXTENSIONS: [&str; 1] = ["rs"];

/// Predicate deciding whether a candidate file path is interesting.
pub type Predicate = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// A named path predicate, optionally tagged with the runner it selects.
///
/// When any validator in a chain carries a runnable selector, the chain
/// switches to selection mode (see [`ValidatorChain`](super::ValidatorChain)).
#[derive(Clone)]
pub struct Validator {
    name: String,
    predicate: Predicate,
    runnable: Option<String>,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("name", &self.name)
            .field("runnable", &self.runnable)
            .finish_non_exhaustive()
    }
}

impl Validator {
    pub fn new<N, F>(name: N, predicate: F) -> Self
    where
        N: Into<String>,
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
            runnable: None,
        }
    }

    /// Validator accepting files whose extension is one of `extensions`.
    pub fn for_extensions<N, S>(name: N, extensions: &[S]) -> Self
    where
        N: Into<String>,
        S: AsRef<str>,
    {
        let extensions = normalize_extensions(extensions);
        Self::new(name, move |path| has_extension(path, &extensions))
    }

    /// Tag this validator with the runner it selects when it accepts a path.
    pub fn select_runnable(mut self, runner: impl Into<String>) -> Self {
        self.runnable = Some(runner.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn runnable(&self) -> Option<&str> {
        self.runnable.as_deref()
    }

    pub fn accepts(&self, path: &Path) -> bool {
        (self.predicate)(path)
    }
}

/// Fallback used only while the chain has no validators: a recognized
/// extension and a basename that is not hidden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultValidator {
    extensions: Vec<String>,
}

impl Default for DefaultValidator {
    fn default() -> Self {
        Self::new(&DEFAULT_EXTENSIONS)
    }
}

impl DefaultValidator {
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Self {
        Self {
            extensions: normalize_extensions(extensions),
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn accepts(&self, path: &Path) -> bool {
        has_extension(path, &self.extensions) && !is_hidden(path)
    }
}

/// Returns false if any segment of `path` is a version-control directory.
///
/// Both `/` and `\` count as separators so that Windows-style paths are
/// handled on every platform.
pub fn not_repo(path: &Path) -> bool {
    let text = path.to_string_lossy();
    !text
        .split(['/', '\\'])
        .any(|segment| VCS_DIRS.contains(&segment))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(OsStr::to_str)
        .is_some_and(|name| name.starts_with('.'))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

/// Accept both `"rs"` and `".rs"` spellings.
fn normalize_extensions<S: AsRef<str>>(extensions: &[S]) -> Vec<String> {
    extensions
        .iter()
        .map(|e| e.as_ref().trim().trim_start_matches('.').to_string())
        .filter(|e| !e.is_empty())
        .collect()
}
