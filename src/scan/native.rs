// src/scan/native.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind as NotifyKind, RecursiveMode, Watcher};
use tracing::{debug, info, trace, warn};

use crate::errors::{Result, SnifferError};
use crate::scan::session::ScanSession;
use crate::scan::{finish_loop, Scanner};
use crate::types::BackendKind;

/// Longest a push loop waits on its channel before re-checking for stop.
const STOP_CHECK: Duration = Duration::from_millis(250);

/// How long `step` waits for the first native event.
const STEP_TIMEOUT: Duration = Duration::from_secs(1);

/// An open OS watcher plus the channel its callbacks feed.
///
/// The watcher's callback thread only forwards raw events; translation and
/// dispatch happen on whichever thread drains the receiver.
pub struct NativeWatch {
    kind: BackendKind,
    _watcher: Box<dyn Watcher + Send>,
    events: Receiver<notify::Result<Event>>,
}

impl fmt::Debug for NativeWatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeWatch")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl NativeWatch {
    /// Open the `kind` backend and watch every root recursively.
    ///
    /// Fails with [`SnifferError::BackendUnavailable`] if the backend does
    /// not exist on this platform, or with the watcher's own error if it
    /// cannot be initialised or a root cannot be watched.
    pub fn open(kind: BackendKind, roots: &[PathBuf]) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let mut watcher = open_watcher(kind, tx)?;
        for root in roots {
            watcher.watch(root, RecursiveMode::Recursive)?;
            debug!(backend = %kind, root = ?root, "watching root");
        }
        Ok(Self {
            kind,
            _watcher: watcher,
            events: rx,
        })
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }
}

fn open_watcher(
    kind: BackendKind,
    tx: mpsc::Sender<notify::Result<Event>>,
) -> Result<Box<dyn Watcher + Send>> {
    let config = Config::default();
    match kind {
        #[cfg(any(target_os = "linux", target_os = "android"))]
        BackendKind::Inotify => Ok(Box::new(notify::INotifyWatcher::new(tx, config)?)),
        #[cfg(target_os = "macos")]
        BackendKind::FsEvents => Ok(Box::new(notify::FsEventWatcher::new(tx, config)?)),
        #[cfg(target_os = "windows")]
        BackendKind::ReadDirectoryChanges => Ok(Box::new(
            notify::ReadDirectoryChangesWatcher::new(tx, config)?,
        )),
        #[cfg(any(
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly"
        ))]
        BackendKind::Kqueue => Ok(Box::new(notify::KqueueWatcher::new(tx, config)?)),
        other => {
            let _ = (tx, config);
            Err(SnifferError::BackendUnavailable(format!(
                "{other} is not available on this platform"
            )))
        }
    }
}

/// What a native event means for one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Created,
    Modified,
    Deleted,
}

/// Map a native event onto trigger actions, in the order they should run.
pub fn translate(event: &Event) -> Vec<(Action, PathBuf)> {
    let each = |action: Action| -> Vec<(Action, PathBuf)> {
        event.paths.iter().map(|p| (action, p.clone())).collect()
    };

    match &event.kind {
        NotifyKind::Create(_) => each(Action::Created),
        NotifyKind::Remove(_) => each(Action::Deleted),
        NotifyKind::Modify(ModifyKind::Name(mode)) => match mode {
            RenameMode::From => each(Action::Deleted),
            RenameMode::To => each(Action::Created),
            RenameMode::Both if event.paths.len() == 2 => vec![
                (Action::Deleted, event.paths[0].clone()),
                (Action::Created, event.paths[1].clone()),
            ],
            // Unknown side: each trigger checks existence itself.
            _ => event
                .paths
                .iter()
                .flat_map(|p| [(Action::Deleted, p.clone()), (Action::Created, p.clone())])
                .collect(),
        },
        NotifyKind::Modify(_) => each(Action::Modified),
        NotifyKind::Access(_) | NotifyKind::Any | NotifyKind::Other => Vec::new(),
    }
}

/// Push backend over the platform's native watcher.
#[derive(Debug)]
pub struct NotifyScanner {
    session: ScanSession,
    native: NativeWatch,
}

impl NotifyScanner {
    pub fn new(session: ScanSession, native: NativeWatch) -> Self {
        Self { session, native }
    }

    /// Open `kind` over the session's roots.
    pub fn open(session: ScanSession, kind: BackendKind) -> Result<Self> {
        let native = NativeWatch::open(kind, session.paths().roots())?;
        Ok(Self::new(session, native))
    }

    pub fn into_session(self) -> ScanSession {
        self.session
    }

    fn handle(&mut self, received: notify::Result<Event>) -> Result<()> {
        let event = match received {
            Ok(event) => event,
            Err(err) => {
                warn!(backend = %self.native.kind, error = %err, "native watcher error");
                return Ok(());
            }
        };
        trace!(?event, "native event");

        self.session.apply_pending_edits();
        for (action, path) in translate(&event) {
            self.apply(action, &path)?;
        }
        Ok(())
    }

    /// Native events name a directory when it is moved as a whole; the
    /// tree triggers expand those to the files inside.
    fn apply(&mut self, action: Action, path: &Path) -> Result<()> {
        match action {
            Action::Created => {
                self.session.trigger_created_tree(path)?;
            }
            Action::Modified => {
                self.session.trigger_modified(path)?;
            }
            Action::Deleted => {
                self.session.trigger_deleted_tree(path)?;
            }
        }
        Ok(())
    }

    fn disconnected(&self) -> SnifferError {
        SnifferError::BackendUnavailable(format!("{} watcher disconnected", self.native.kind))
    }
}

impl Scanner for NotifyScanner {
    fn kind(&self) -> BackendKind {
        self.native.kind
    }

    fn session(&self) -> &ScanSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut ScanSession {
        &mut self.session
    }

    fn run_loop(&mut self, interval: Duration) -> Result<()> {
        let stop = self.session.stop_handle();
        let tick = interval.min(STOP_CHECK);
        info!(
            backend = %self.native.kind,
            roots = ?self.session.paths().roots(),
            "watching for changes"
        );

        self.session.trigger_init()?;
        if !stop.is_stopped() {
            let recorded = self.session.record_baseline();
            debug!(files = recorded, "baseline recorded");
        }

        while !stop.is_stopped() {
            self.session.apply_pending_edits();
            match self.native.events.recv_timeout(tick) {
                Ok(received) => self.handle(received)?,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return Err(self.disconnected()),
            }
        }

        debug!(backend = %self.native.kind, "native loop stopped");
        finish_loop(&stop)
    }

    fn step(&mut self) -> Result<()> {
        self.session.apply_pending_edits();
        match self.native.events.recv_timeout(STEP_TIMEOUT) {
            Ok(received) => self.handle(received)?,
            Err(RecvTimeoutError::Timeout) => return Ok(()),
            Err(RecvTimeoutError::Disconnected) => return Err(self.disconnected()),
        }
        loop {
            match self.native.events.try_recv() {
                Ok(received) => self.handle(received)?,
                Err(TryRecvError::Empty) => return Ok(()),
                Err(TryRecvError::Disconnected) => return Err(self.disconnected()),
            }
        }
    }
}
