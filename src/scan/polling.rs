// src/scan/polling.rs

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info, trace};

use crate::errors::Result;
use crate::events::EventKind;
use crate::fs::walk_files;
use crate::scan::session::ScanSession;
use crate::scan::table::Change;
use crate::scan::{finish_loop, Scanner};
use crate::types::BackendKind;

/// Counts from one polling pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub created: usize,
    pub modified: usize,
    pub deleted: usize,
    /// Accepted files whose timestamp could not be read this pass.
    pub skipped: usize,
}

impl ScanSummary {
    pub fn is_quiet(&self) -> bool {
        self.created == 0 && self.modified == 0 && self.deleted == 0
    }
}

/// Portable backend that re-walks every root on each pass.
///
/// A pass snapshots the tree, then classifies each accepted file against the
/// watch table: unseen means created, a strictly newer timestamp means
/// modified, and table entries absent from the snapshot are deleted if they
/// are gone from disk (otherwise they are dropped silently). A file created
/// and removed between two passes is never seen and fires nothing.
#[derive(Debug)]
pub struct PollingScanner {
    session: ScanSession,
}

impl PollingScanner {
    pub fn new(session: ScanSession) -> Self {
        Self { session }
    }

    pub fn into_session(self) -> ScanSession {
        self.session
    }

    /// Run one pass. With `trigger` false the table is updated silently,
    /// which is how the initial baseline is taken.
    pub fn scan(&mut self, trigger: bool) -> Result<ScanSummary> {
        self.session.apply_pending_edits();

        let mut summary = ScanSummary::default();
        let mut seen: HashSet<PathBuf> = HashSet::new();

        let roots = self.session.paths().roots().to_vec();
        for root in &roots {
            for path in walk_files(self.session.fs(), root) {
                if !self.session.validators().accepts(&path) {
                    continue;
                }
                seen.insert(path.clone());

                let modified = match self.session.fs().modified(&path) {
                    Ok(modified) => modified,
                    Err(err) => {
                        trace!(path = ?path, error = %err, "skipping file with unreadable timestamp");
                        summary.skipped += 1;
                        continue;
                    }
                };

                let kind = match self.session.table().classify(&path, Some(modified)) {
                    Change::Unchanged => continue,
                    Change::New => EventKind::Created,
                    Change::Modified => EventKind::Modified,
                };

                self.session
                    .table_mut()
                    .record(path.clone(), Some(modified));
                match kind {
                    EventKind::Created => summary.created += 1,
                    _ => summary.modified += 1,
                }
                if trigger {
                    self.session.dispatch(kind, &path)?;
                }
            }
        }

        for path in self.session.table().missing_from(&seen) {
            self.session.table_mut().remove(&path);
            if self.session.fs().exists(&path) {
                // Still on disk, it just no longer validates.
                trace!(path = ?path, "dropping file that stopped validating");
                continue;
            }
            summary.deleted += 1;
            if trigger {
                self.session.dispatch(EventKind::Deleted, &path)?;
            }
        }

        if !summary.is_quiet() {
            debug!(
                created = summary.created,
                modified = summary.modified,
                deleted = summary.deleted,
                triggered = trigger,
                "polling pass found changes"
            );
        }

        Ok(summary)
    }
}

impl Scanner for PollingScanner {
    fn kind(&self) -> BackendKind {
        BackendKind::Polling
    }

    fn session(&self) -> &ScanSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut ScanSession {
        &mut self.session
    }

    fn run_loop(&mut self, interval: Duration) -> Result<()> {
        let stop = self.session.stop_handle();
        info!(
            roots = ?self.session.paths().roots(),
            interval_ms = interval.as_millis() as u64,
            "polling for changes"
        );

        self.session.trigger_init()?;
        if stop.is_stopped() {
            return finish_loop(&stop);
        }

        let baseline = self.scan(false)?;
        debug!(files = baseline.created, "baseline recorded");

        while !stop.wait_timeout(interval) {
            self.scan(true)?;
        }

        debug!("polling loop stopped");
        finish_loop(&stop)
    }

    fn step(&mut self) -> Result<()> {
        self.scan(true).map(|_| ())
    }
}
