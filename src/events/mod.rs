// src/events/mod.rs

//! Events fired by scanners and the bus that fans them out to observers.
//!
//! - [`ScanEvent`] is what every observer receives.
//! - [`KindSet`] lets a single registration cover several event kinds.
//! - [`bus`] holds the ordered observer lists and the dispatch logic.

use std::path::{Path, PathBuf};

use crate::errors::{Result, SnifferError};

pub mod bus;

pub use crate::types::EventKind;
pub use bus::{EventBus, Observer, ObserverId};

/// A single dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent {
    pub kind: EventKind,
    /// Absolute path of the affected file. `None` only for `Init`.
    pub path: Option<PathBuf>,
    /// Runner selector that was active when the event was dispatched.
    ///
    /// Only set once a validator in selection mode has accepted a path.
    pub runner: Option<String>,
}

impl ScanEvent {
    pub fn init(runner: Option<String>) -> Self {
        Self {
            kind: EventKind::Init,
            path: None,
            runner,
        }
    }

    pub fn for_path(kind: EventKind, path: impl Into<PathBuf>, runner: Option<String>) -> Self {
        Self {
            kind,
            path: Some(path.into()),
            runner,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Ordered, de-duplicated set of event kinds used for registrations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KindSet(Vec<EventKind>);

impl KindSet {
    /// All four event kinds.
    pub fn all() -> Self {
        Self(EventKind::ALL.to_vec())
    }

    /// Parse kind names such as `"created"`; fails on anything outside the
    /// closed set.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let mut set = KindSet::default();
        for name in names {
            set.push(name.as_ref().parse()?);
        }
        Ok(set)
    }

    pub fn iter(&self) -> impl Iterator<Item = EventKind> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, kind: EventKind) -> bool {
        self.0.contains(&kind)
    }

    /// Reject empty registrations; an observer attached to nothing is a
    /// programming error.
    pub(crate) fn ensure_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            return Err(SnifferError::InvalidEventKind("<empty set>".to_string()));
        }
        Ok(())
    }

    fn push(&mut self, kind: EventKind) {
        if !self.0.contains(&kind) {
            self.0.push(kind);
        }
    }
}

impl From<EventKind> for KindSet {
    fn from(kind: EventKind) -> Self {
        Self(vec![kind])
    }
}

impl From<&[EventKind]> for KindSet {
    fn from(kinds: &[EventKind]) -> Self {
        let mut set = KindSet::default();
        for &kind in kinds {
            set.push(kind);
        }
        set
    }
}

impl<const N: usize> From<[EventKind; N]> for KindSet {
    fn from(kinds: [EventKind; N]) -> Self {
        KindSet::from(&kinds[..])
    }
}

impl From<Vec<EventKind>> for KindSet {
    fn from(kinds: Vec<EventKind>) -> Self {
        KindSet::from(&kinds[..])
    }
}
