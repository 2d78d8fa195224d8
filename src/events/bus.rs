// src/events/bus.rs

//! Ordered observer registry with synchronous fan-out dispatch.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::errors::{Result, SnifferError};
use crate::events::{EventKind, KindSet, ScanEvent};

/// Callback attached to one or more event kinds.
///
/// Returning `Err` aborts the dispatch: the remaining observers for that
/// event are not invoked and the error reaches whoever triggered the event.
pub type Observer = Arc<dyn Fn(&ScanEvent) -> anyhow::Result<()> + Send + Sync>;

/// Identity of a registration, returned by [`EventBus::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Registration {
    id: ObserverId,
    callback: Observer,
}

/// Maps each [`EventKind`] to its observers, kept in registration order.
///
/// Registration order is dispatch order. Callers rely on this: e.g. console
/// clearing must run before the test runner.
pub struct EventBus {
    observers: HashMap<EventKind, Vec<Registration>>,
    next_id: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: Vec<(EventKind, usize)> = self
            .observers
            .iter()
            .map(|(kind, list)| (*kind, list.len()))
            .collect();
        counts.sort();
        f.debug_struct("EventBus")
            .field("observers", &counts)
            .finish_non_exhaustive()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let observers = EventKind::ALL
            .iter()
            .map(|kind| (*kind, Vec::new()))
            .collect();
        Self {
            observers,
            next_id: 0,
        }
    }

    /// Append `callback` to the observer list of every kind in `kinds`.
    ///
    /// The same [`ObserverId`] is used for all of them, so a single
    /// `unobserve` with the same kinds detaches it everywhere.
    pub fn observe<K, F>(&mut self, kinds: K, callback: F) -> Result<ObserverId>
    where
        K: Into<KindSet>,
        F: Fn(&ScanEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let kinds = kinds.into();
        kinds.ensure_not_empty()?;

        let id = ObserverId(self.next_id);
        self.next_id += 1;

        let callback: Observer = Arc::new(callback);
        for kind in kinds.iter() {
            debug!(observer = %id, event = %kind, "observer attached");
            self.observers.entry(kind).or_default().push(Registration {
                id,
                callback: Arc::clone(&callback),
            });
        }

        Ok(id)
    }

    /// Like [`observe`](Self::observe), but with kinds given by name.
    pub fn observe_named<S, F>(&mut self, names: &[S], callback: F) -> Result<ObserverId>
    where
        S: AsRef<str>,
        F: Fn(&ScanEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let kinds = KindSet::parse(names)?;
        self.observe(kinds, callback)
    }

    /// Detach the observer `id` from every kind in `kinds`.
    ///
    /// Fails with [`SnifferError::ObserverNotFound`] if `id` is not attached
    /// to one of the kinds; in that case nothing is removed.
    pub fn unobserve<K: Into<KindSet>>(&mut self, kinds: K, id: ObserverId) -> Result<()> {
        let kinds = kinds.into();
        kinds.ensure_not_empty()?;

        for kind in kinds.iter() {
            let attached = self
                .observers
                .get(&kind)
                .is_some_and(|list| list.iter().any(|r| r.id == id));
            if !attached {
                return Err(SnifferError::ObserverNotFound { kind, id });
            }
        }

        for kind in kinds.iter() {
            if let Some(list) = self.observers.get_mut(&kind) {
                list.retain(|r| r.id != id);
                debug!(observer = %id, event = %kind, "observer detached");
            }
        }

        Ok(())
    }

    /// Invoke every observer registered for `event.kind`, in order.
    pub fn trigger(&self, event: &ScanEvent) -> Result<()> {
        let Some(list) = self.observers.get(&event.kind) else {
            return Ok(());
        };

        debug!(
            event = %event.kind,
            path = ?event.path,
            runner = ?event.runner,
            observers = list.len(),
            "dispatching event"
        );

        for registration in list {
            (registration.callback)(event).map_err(|source| SnifferError::ObserverFailed {
                kind: event.kind,
                source,
            })?;
        }

        Ok(())
    }

    /// Number of observers attached to `kind`.
    pub fn observer_count(&self, kind: EventKind) -> usize {
        self.observers.get(&kind).map_or(0, Vec::len)
    }
}
