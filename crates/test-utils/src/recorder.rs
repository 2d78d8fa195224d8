use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use sniffer::events::{EventKind, ScanEvent};

/// Shared log of dispatched events, for asserting on what observers saw.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<(String, ScanEvent)>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observer that records every event under the label `"log"`.
    pub fn observer(&self) -> impl Fn(&ScanEvent) -> anyhow::Result<()> + Send + Sync + 'static {
        self.labelled("log")
    }

    /// Observer that records every event under `label`, so several
    /// observers sharing one log can be told apart.
    pub fn labelled(
        &self,
        label: &str,
    ) -> impl Fn(&ScanEvent) -> anyhow::Result<()> + Send + Sync + 'static {
        let events = Arc::clone(&self.events);
        let label = label.to_string();
        move |event| {
            events.lock().unwrap().push((label.clone(), event.clone()));
            Ok(())
        }
    }

    pub fn events(&self) -> Vec<ScanEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, e)| e.clone())
            .collect()
    }

    /// Labels in dispatch order.
    pub fn labels(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(l, _)| l.clone())
            .collect()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events().into_iter().map(|e| e.kind).collect()
    }

    /// Paths of every recorded event of `kind`, in order.
    pub fn paths_of(&self, kind: EventKind) -> Vec<PathBuf> {
        self.events()
            .into_iter()
            .filter(|e| e.kind == kind)
            .filter_map(|e| e.path)
            .collect()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events().iter().filter(|e| e.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}
