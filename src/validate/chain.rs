// src/validate/chain.rs

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::errors::{Result, SnifferError};
use crate::validate::validator::{not_repo, DefaultValidator, Validator};

/// Outcome of running a path through the chain.
enum Verdict<'a> {
    Rejected,
    Accepted,
    /// Accepted by a validator that selects a runner.
    Selected(&'a str),
}

/// Ordered validators deciding which paths are worth reporting.
///
/// Evaluation:
/// 1. Paths under a VCS directory are always rejected.
/// 2. Pinned paths (e.g. the scent file) are always accepted.
/// 3. No validators: the [`DefaultValidator`] decides.
/// 4. Any validator carries a runnable selector (selection mode): the first
///    accepting validator wins and its selector becomes the active runner.
///    No acceptor means rejection, and the active runner is left alone.
/// 5. Otherwise (conjunctive mode): every validator must accept.
#[derive(Debug, Default)]
pub struct ValidatorChain {
    validators: Vec<Validator>,
    default: DefaultValidator,
    pinned: Vec<PathBuf>,
    active_runner: Option<String>,
}

impl ValidatorChain {
    pub fn new(default: DefaultValidator) -> Self {
        Self {
            validators: Vec::new(),
            default,
            pinned: Vec::new(),
            active_runner: None,
        }
    }

    pub fn add(&mut self, validator: Validator) {
        debug!(validator = %validator.name(), runnable = ?validator.runnable(), "validator added");
        self.validators.push(validator);
    }

    /// Remove the first validator named `name`.
    pub fn remove(&mut self, name: &str) -> Result<Validator> {
        let idx = self
            .validators
            .iter()
            .position(|v| v.name() == name)
            .ok_or_else(|| SnifferError::ValidatorNotFound(name.to_string()))?;
        debug!(validator = %name, "validator removed");
        Ok(self.validators.remove(idx))
    }

    /// Always accept `path` (subject to the VCS check), without selecting a
    /// runner.
    pub fn pin(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.pinned.contains(&path) {
            self.pinned.push(path);
        }
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn default_validator(&self) -> &DefaultValidator {
        &self.default
    }

    pub fn is_selection_mode(&self) -> bool {
        self.validators.iter().any(|v| v.runnable().is_some())
    }

    /// Runner selected by the most recent accepted path in selection mode.
    pub fn active_runner(&self) -> Option<&str> {
        self.active_runner.as_deref()
    }

    /// Verdict for `path` without touching the active runner.
    pub fn accepts(&self, path: &Path) -> bool {
        !matches!(self.verdict(path), Verdict::Rejected)
    }

    /// Verdict for `path`; in selection mode an accepted path installs its
    /// validator's runner as the active one.
    pub fn is_valid_type(&mut self, path: &Path) -> bool {
        match self.verdict(path) {
            Verdict::Rejected => false,
            Verdict::Accepted => true,
            Verdict::Selected(runner) => {
                let runner = runner.to_string();
                if self.active_runner.as_deref() != Some(runner.as_str()) {
                    debug!(runner = %runner, path = ?path, "selected runner");
                }
                self.active_runner = Some(runner);
                true
            }
        }
    }

    /// Apply queued edits from a [`ValidatorHandle`].
    pub fn apply(&mut self, edits: Vec<ChainEdit>) {
        for edit in edits {
            match edit {
                ChainEdit::Add(validator) => self.add(validator),
                ChainEdit::Remove(name) => {
                    if let Err(err) = self.remove(&name) {
                        warn!(error = %err, "queued validator removal ignored");
                    }
                }
            }
        }
    }

    fn verdict(&self, path: &Path) -> Verdict<'_> {
        if !not_repo(path) {
            return Verdict::Rejected;
        }
        if self.pinned.iter().any(|p| p == path) {
            return Verdict::Accepted;
        }
        if self.validators.is_empty() {
            return if self.default.accepts(path) {
                Verdict::Accepted
            } else {
                Verdict::Rejected
            };
        }

        if self.is_selection_mode() {
            return match self.validators.iter().find(|v| v.accepts(path)) {
                Some(v) => match v.runnable() {
                    Some(runner) => Verdict::Selected(runner),
                    None => Verdict::Accepted,
                },
                None => Verdict::Rejected,
            };
        }

        if self.validators.iter().all(|v| v.accepts(path)) {
            Verdict::Accepted
        } else {
            Verdict::Rejected
        }
    }
}

/// A pending change to a chain, queued through a [`ValidatorHandle`].
#[derive(Debug, Clone)]
pub enum ChainEdit {
    Add(Validator),
    Remove(String),
}

/// Cloneable handle for editing a scanner's chain from outside the scanner.
///
/// Edits are queued and applied by the owning scanner between dispatch
/// cycles, never in the middle of one.
#[derive(Debug, Clone, Default)]
pub struct ValidatorHandle {
    pending: Arc<Mutex<Vec<ChainEdit>>>,
}

impl ValidatorHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_validator(&self, validator: Validator) {
        self.lock().push(ChainEdit::Add(validator));
    }

    pub fn remove_validator(&self, name: impl Into<String>) {
        self.lock().push(ChainEdit::Remove(name.into()));
    }

    pub fn has_pending(&self) -> bool {
        !self.lock().is_empty()
    }

    /// Take every queued edit, oldest first.
    pub fn drain(&self) -> Vec<ChainEdit> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ChainEdit>> {
        match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
