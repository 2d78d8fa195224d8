use std::fmt;
use std::str::FromStr;

use crate::errors::SnifferError;

/// The closed set of events a scanner can fire.
///
/// - `Created`, `Modified`, `Deleted` always carry the affected path.
/// - `Init` fires exactly once when a watch loop starts and carries no path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Created,
    Modified,
    Deleted,
    Init,
}

impl EventKind {
    /// Every event kind, in declaration order.
    pub const ALL: [EventKind; 4] = [
        EventKind::Created,
        EventKind::Modified,
        EventKind::Deleted,
        EventKind::Init,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Created => "created",
            EventKind::Modified => "modified",
            EventKind::Deleted => "deleted",
            EventKind::Init => "init",
        }
    }

    /// Whether events of this kind carry a path.
    pub fn has_path(&self) -> bool {
        !matches!(self, EventKind::Init)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = SnifferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "created" => Ok(EventKind::Created),
            "modified" => Ok(EventKind::Modified),
            "deleted" => Ok(EventKind::Deleted),
            "init" => Ok(EventKind::Init),
            other => Err(SnifferError::InvalidEventKind(other.to_string())),
        }
    }
}

/// Which scanner implementation is discovering changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Portable directory walk; no platform dependency.
    Polling,
    /// Linux inotify.
    Inotify,
    /// macOS FSEvents stream.
    FsEvents,
    /// Windows `ReadDirectoryChangesW` directory handle.
    ReadDirectoryChanges,
    /// BSD kqueue.
    Kqueue,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Polling => "polling",
            BackendKind::Inotify => "inotify",
            BackendKind::FsEvents => "fsevents",
            BackendKind::ReadDirectoryChanges => "read-directory-changes",
            BackendKind::Kqueue => "kqueue",
        }
    }

    pub fn is_native(&self) -> bool {
        !matches!(self, BackendKind::Polling)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the scanner backend is chosen at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendPreference {
    /// Probe native backends for this platform, fall back to polling.
    #[default]
    Auto,
    /// Always poll.
    Polling,
}
