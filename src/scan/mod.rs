// src/scan/mod.rs

//! Change detection backends.
//!
//! Every backend implements [`Scanner`] over a shared [`ScanSession`]:
//! - [`PollingScanner`] walks the roots on a fixed interval and diffs
//!   timestamps against the watch table.
//! - [`NotifyScanner`] translates OS push notifications (inotify, FSEvents,
//!   ReadDirectoryChanges, kqueue) into the same event vocabulary.
//! - [`select_scanner`] picks the best backend for the platform and falls
//!   back to polling.

use std::path::Path;
use std::time::Duration;

use crate::errors::{Result, SnifferError};
use crate::events::EventBus;
use crate::types::BackendKind;
use crate::validate::Validator;

pub mod native;
pub mod paths;
pub mod polling;
pub mod select;
pub mod session;
pub mod stop;
pub mod table;

pub use native::NotifyScanner;
pub use paths::PathSet;
pub use polling::{PollingScanner, ScanSummary};
pub use select::{native_preference_order, select_from, select_scanner};
pub use session::ScanSession;
pub use stop::StopHandle;
pub use table::{Change, WatchTable, WatchedPath};

/// Default delay between polling passes.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

/// A change detection backend.
///
/// Scanners are driven from a single thread: observers run on the thread
/// that called [`run_loop`](Scanner::run_loop) or [`step`](Scanner::step).
pub trait Scanner: Send {
    /// Which backend this is.
    fn kind(&self) -> BackendKind;

    fn session(&self) -> &ScanSession;
    fn session_mut(&mut self) -> &mut ScanSession;

    /// Fire `Init`, then detect and dispatch changes until stopped.
    ///
    /// `interval` is the polling delay; push backends use it only as an
    /// upper bound on how long a stop request can go unnoticed.
    fn run_loop(&mut self, interval: Duration) -> Result<()>;

    /// Run one detection cycle without firing `Init`.
    fn step(&mut self) -> Result<()>;

    /// Request that the loop end. Idempotent and safe from an observer.
    fn stop(&self) {
        self.session().stop_handle().stop();
    }

    fn stop_handle(&self) -> StopHandle {
        self.session().stop_handle()
    }

    fn trigger_init(&mut self) -> Result<()> {
        self.session_mut().trigger_init()
    }

    fn trigger_created(&mut self, path: &Path) -> Result<bool> {
        self.session_mut().trigger_created(path)
    }

    fn trigger_modified(&mut self, path: &Path) -> Result<bool> {
        self.session_mut().trigger_modified(path)
    }

    fn trigger_deleted(&mut self, path: &Path) -> Result<bool> {
        self.session_mut().trigger_deleted(path)
    }

    fn add_validator(&mut self, validator: Validator) {
        self.session_mut().add_validator(validator);
    }

    fn remove_validator(&mut self, name: &str) -> Result<Validator> {
        self.session_mut().remove_validator(name)
    }

    fn bus_mut(&mut self) -> &mut EventBus {
        self.session_mut().bus_mut()
    }
}

/// Result of a loop that ended through its [`StopHandle`].
///
/// A keyboard interrupt surfaces as [`SnifferError::Interrupted`] so the
/// caller can tell it apart from a plain stop.
pub(crate) fn finish_loop(stop: &StopHandle) -> Result<()> {
    if stop.was_interrupted() {
        Err(SnifferError::Interrupted)
    } else {
        Ok(())
    }
}
