// src/scan/session.rs

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::trace;

use crate::errors::Result;
use crate::events::{EventBus, EventKind, ScanEvent};
use crate::fs::{walk_files, FileSystem, RealFileSystem};
use crate::scan::paths::PathSet;
use crate::scan::stop::StopHandle;
use crate::scan::table::{Change, WatchTable};
use crate::validate::{DefaultValidator, Validator, ValidatorChain, ValidatorHandle};

/// State shared by every backend for one watch session.
///
/// The session owns the validator chain, the watch table and the event bus.
/// Only the scanner that owns the session mutates them; outside parties go
/// through a [`ValidatorHandle`] or a [`StopHandle`].
pub struct ScanSession {
    paths: PathSet,
    validators: ValidatorChain,
    edits: ValidatorHandle,
    table: WatchTable,
    bus: EventBus,
    stop: StopHandle,
    fs: Arc<dyn FileSystem>,
}

impl fmt::Debug for ScanSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanSession")
            .field("paths", &self.paths)
            .field("validators", &self.validators)
            .field("watched", &self.table.len())
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

impl ScanSession {
    pub fn new(paths: PathSet) -> Self {
        Self::with_fs(paths, Arc::new(RealFileSystem))
    }

    pub fn with_fs(paths: PathSet, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            paths,
            validators: ValidatorChain::default(),
            edits: ValidatorHandle::new(),
            table: WatchTable::new(),
            bus: EventBus::new(),
            stop: StopHandle::new(),
            fs,
        }
    }

    /// Replace the fallback validator used while the chain is empty.
    pub fn with_default_validator(mut self, default: DefaultValidator) -> Self {
        let mut chain = ValidatorChain::new(default);
        for v in self.validators.validators() {
            chain.add(v.clone());
        }
        self.validators = chain;
        self
    }

    pub fn paths(&self) -> &PathSet {
        &self.paths
    }

    pub fn paths_mut(&mut self) -> &mut PathSet {
        &mut self.paths
    }

    pub fn table(&self) -> &WatchTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut WatchTable {
        &mut self.table
    }

    pub fn validators(&self) -> &ValidatorChain {
        &self.validators
    }

    pub fn validators_mut(&mut self) -> &mut ValidatorChain {
        &mut self.validators
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn validator_handle(&self) -> ValidatorHandle {
        self.edits.clone()
    }

    pub fn add_validator(&mut self, validator: Validator) {
        self.validators.add(validator);
    }

    pub fn remove_validator(&mut self, name: &str) -> Result<Validator> {
        self.validators.remove(name)
    }

    pub fn is_valid_type(&mut self, path: &Path) -> bool {
        self.validators.is_valid_type(path)
    }

    /// Apply validator edits queued through the [`ValidatorHandle`].
    ///
    /// Backends call this between dispatch cycles.
    pub fn apply_pending_edits(&mut self) {
        if self.edits.has_pending() {
            let edits = self.edits.drain();
            self.validators.apply(edits);
        }
    }

    pub fn trigger_init(&mut self) -> Result<()> {
        let event = ScanEvent::init(self.active_runner());
        self.bus.trigger(&event)
    }

    /// Fire `Created` if `path` is a valid, existing file; records it.
    ///
    /// Returns whether an event was dispatched.
    pub fn trigger_created(&mut self, path: &Path) -> Result<bool> {
        if !self.fs.is_file(path) || !self.is_valid_type(path) {
            return Ok(false);
        }
        let modified = self.fs.modified(path).ok();
        self.table.record(path.to_path_buf(), modified);
        self.fire(EventKind::Created, path)?;
        Ok(true)
    }

    /// Fire `Modified` if `path` is valid and its timestamp is strictly
    /// newer than the recorded one (an unrecorded path always is).
    pub fn trigger_modified(&mut self, path: &Path) -> Result<bool> {
        if !self.fs.is_file(path) {
            return Ok(false);
        }
        let modified = match self.fs.modified(path) {
            Ok(modified) => Some(modified),
            Err(err) => {
                trace!(path = ?path, error = %err, "stat failed; ignoring modification");
                return Ok(false);
            }
        };
        if self.table.classify(path, modified) == Change::Unchanged {
            return Ok(false);
        }
        if !self.is_valid_type(path) {
            return Ok(false);
        }
        self.table.record(path.to_path_buf(), modified);
        self.fire(EventKind::Modified, path)?;
        Ok(true)
    }

    /// Fire `Deleted` if `path` is valid and no longer exists; forgets it.
    pub fn trigger_deleted(&mut self, path: &Path) -> Result<bool> {
        if self.fs.exists(path) || !self.is_valid_type(path) {
            return Ok(false);
        }
        self.table.remove(path);
        self.fire(EventKind::Deleted, path)?;
        Ok(true)
    }

    /// [`trigger_created`](Self::trigger_created) for a path that may be a
    /// directory: every file below a directory is reported. A file that is
    /// already recorded goes through [`trigger_modified`](Self::trigger_modified)
    /// instead, so a file seen both through its directory and on its own is
    /// reported once.
    ///
    /// Returns how many events were dispatched.
    pub fn trigger_created_tree(&mut self, path: &Path) -> Result<usize> {
        if !self.fs.is_dir(path) {
            return self.created_or_modified(path).map(usize::from);
        }
        let mut fired = 0;
        for file in walk_files(self.fs.as_ref(), path) {
            if self.created_or_modified(&file)? {
                fired += 1;
            }
        }
        Ok(fired)
    }

    /// [`trigger_deleted`](Self::trigger_deleted) for a path that may have
    /// been a directory: every recorded file below it is reported. Recorded
    /// files that no longer validate are forgotten without an event.
    ///
    /// Returns how many events were dispatched.
    pub fn trigger_deleted_tree(&mut self, path: &Path) -> Result<usize> {
        if self.fs.exists(path) {
            return Ok(0);
        }
        let below = self.table.under(path);
        if below.is_empty() {
            return self.trigger_deleted(path).map(usize::from);
        }
        let mut fired = 0;
        for file in below {
            if self.trigger_deleted(&file)? {
                fired += 1;
            } else {
                self.table.remove(&file);
            }
        }
        Ok(fired)
    }

    /// Record every accepted file under the roots without firing anything.
    ///
    /// Returns how many files were recorded.
    pub fn record_baseline(&mut self) -> usize {
        let mut recorded = 0;
        for root in self.paths.roots().to_vec() {
            for path in walk_files(self.fs.as_ref(), &root) {
                if !self.validators.accepts(&path) {
                    continue;
                }
                if let Ok(modified) = self.fs.modified(&path) {
                    self.table.record(path, Some(modified));
                    recorded += 1;
                }
            }
        }
        recorded
    }

    fn created_or_modified(&mut self, path: &Path) -> Result<bool> {
        if self.table.contains(path) {
            self.trigger_modified(path)
        } else {
            self.trigger_created(path)
        }
    }

    /// Re-validate `path` and fire `kind` for it, without touching the
    /// table. Used by backends that have already classified the change.
    pub(crate) fn dispatch(&mut self, kind: EventKind, path: &Path) -> Result<bool> {
        if !self.is_valid_type(path) {
            return Ok(false);
        }
        self.fire(kind, path)?;
        Ok(true)
    }

    fn fire(&self, kind: EventKind, path: &Path) -> Result<()> {
        let event = ScanEvent::for_path(kind, path, self.active_runner());
        self.bus.trigger(&event)
    }

    fn active_runner(&self) -> Option<String> {
        self.validators.active_runner().map(str::to_string)
    }
}
