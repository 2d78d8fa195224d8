// src/engine/sniffer.rs

use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crossterm::{cursor, execute, terminal};
use tracing::{debug, error, info, warn};

use crate::config::Scent;
use crate::errors::Result;
use crate::events::{EventKind, ScanEvent};
use crate::exec::{default_test_runner, Runner};
use crate::scan::{Scanner, StopHandle};
use crate::validate::ValidatorHandle;

/// User-facing switches for a watch session.
#[derive(Debug, Clone)]
pub struct SnifferOptions {
    /// Clear the console before each test run.
    pub clear: bool,
    /// Echo every created/modified/deleted path.
    pub debug: bool,
    /// Extra arguments appended to every runner invocation.
    pub test_args: Vec<String>,
}

impl Default for SnifferOptions {
    fn default() -> Self {
        Self {
            clear: true,
            debug: false,
            test_args: Vec::new(),
        }
    }
}

/// Handles kept for each scanner the sniffer is attached to.
#[derive(Debug, Clone)]
struct Attached {
    stop: StopHandle,
    validators: ValidatorHandle,
}

struct Inner {
    options: SnifferOptions,
    scent: Mutex<Option<Scent>>,
    default_runner: Arc<dyn Runner>,
    scanners: Mutex<Vec<Attached>>,
}

/// Wires scanners to the scent and the test runners.
///
/// Cloning is cheap; clones share the same scent and scanner list. This is
/// what the observers registered by [`observe_scanner`] hold on to.
///
/// [`observe_scanner`]: Sniffer::observe_scanner
#[derive(Clone)]
pub struct Sniffer {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Sniffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sniffer")
            .field("options", &self.inner.options)
            .field("default_runner", &self.inner.default_runner)
            .finish_non_exhaustive()
    }
}

impl Sniffer {
    pub fn new(options: SnifferOptions, scent: Option<Scent>) -> Self {
        Self::with_runner(options, scent, Arc::new(default_test_runner()))
    }

    /// Like [`new`](Self::new), with an explicit fallback runner used when
    /// the scent defines none.
    pub fn with_runner(
        options: SnifferOptions,
        scent: Option<Scent>,
        default_runner: Arc<dyn Runner>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                options,
                scent: Mutex::new(scent),
                default_runner,
                scanners: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn options(&self) -> &SnifferOptions {
        &self.inner.options
    }

    /// Snapshot of the current scent.
    pub fn scent(&self) -> Option<Scent> {
        self.scent_lock().clone()
    }

    /// Number of scanners attached through [`observe_scanner`](Self::observe_scanner).
    pub fn scanner_count(&self) -> usize {
        self.scanners_lock().len()
    }

    /// Attach to `scanner`.
    ///
    /// Observers are registered in this order: scent refresh (created and
    /// modified), console clear (if enabled), test run, then the debug
    /// echoes (if enabled). The scent's validators are added to the chain
    /// and the scent file itself is pinned so its edits are always seen.
    pub fn observe_scanner(&self, scanner: &mut dyn Scanner) -> Result<()> {
        if let Some(scent) = self.scent() {
            let validators = scanner.session_mut().validators_mut();
            validators.pin(scent.path());
            for v in scent.validators() {
                if self.inner.options.debug {
                    println!("Added {v:?}");
                }
                validators.add(v.clone());
            }
        }

        let bus = scanner.bus_mut();

        let sniffer = self.clone();
        bus.observe([EventKind::Created, EventKind::Modified], move |event| {
            if let Some(path) = event.path() {
                sniffer.refresh_scent(path);
            }
            Ok(())
        })?;

        if self.inner.options.clear {
            bus.observe(EventKind::ALL, |_| {
                if let Err(err) = clear_console() {
                    debug!(error = %err, "could not clear console");
                }
                Ok(())
            })?;
        }

        let sniffer = self.clone();
        bus.observe(EventKind::ALL, move |event| sniffer.on_event(event))?;

        if self.inner.options.debug {
            bus.observe(EventKind::Created, echo("created "))?;
            bus.observe(EventKind::Modified, echo("changed "))?;
            bus.observe(EventKind::Deleted, echo("deleted "))?;
        }

        let attached = Attached {
            stop: scanner.stop_handle(),
            validators: scanner.session().validator_handle(),
        };
        self.scanners_lock().push(attached);
        debug!(backend = %scanner.kind(), "sniffer attached to scanner");
        Ok(())
    }

    /// Stop every attached scanner.
    pub fn stop_all(&self) {
        for attached in self.scanners_lock().iter() {
            attached.stop.stop();
        }
    }

    /// Run the tests once: the scent's runners if it has any, otherwise the
    /// fallback runner.
    pub fn run_tests(&self, selected: Option<&str>) -> anyhow::Result<bool> {
        let args = &self.inner.options.test_args;
        match self.scent() {
            Some(scent) if !scent.runners().is_empty() => {
                info!(scent = ?scent.path(), runner = ?selected, "running scent runners");
                scent.run(args, selected)
            }
            _ => {
                info!(runner = %self.inner.default_runner.name(), "no scent runners; using default");
                self.inner.default_runner.run(args)
            }
        }
    }

    /// Reload the scent if `path` is the scent file.
    ///
    /// Returns true if a new scent was swapped in. On a failed reload the
    /// previous scent stays active.
    pub fn refresh_scent(&self, path: &Path) -> bool {
        let Some(current) = self.scent() else {
            return false;
        };
        if current.path() != path {
            return false;
        }

        println!("Reloaded Scent: {}", path.display());
        let reloaded = match current.reload() {
            Ok(scent) => scent,
            Err(err) => {
                warn!(path = ?path, error = %err, "scent reload failed");
                println!("Still using previously valid scent.");
                return false;
            }
        };

        for attached in self.scanners_lock().iter() {
            for v in current.validators() {
                if self.inner.options.debug {
                    println!("Removed {v:?}");
                }
                attached.validators.remove_validator(v.name());
            }
            for v in reloaded.validators() {
                if self.inner.options.debug {
                    println!("Added {v:?}");
                }
                attached.validators.add_validator(v.clone());
            }
        }

        *self.scent_lock() = Some(reloaded);
        true
    }

    fn on_event(&self, event: &ScanEvent) -> anyhow::Result<()> {
        match self.run_tests(event.runner.as_deref()) {
            Ok(true) => {
                println!("In good standing");
                Ok(())
            }
            Ok(false) => {
                println!("Failed - Back to work!");
                Ok(())
            }
            Err(err) => {
                error!(error = ?err, "test run aborted; stopping scanners");
                self.stop_all();
                Err(err)
            }
        }
    }

    fn scent_lock(&self) -> MutexGuard<'_, Option<Scent>> {
        match self.inner.scent.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn scanners_lock(&self) -> MutexGuard<'_, Vec<Attached>> {
        match self.inner.scanners.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn echo(label: &'static str) -> impl Fn(&ScanEvent) -> anyhow::Result<()> + Send + Sync + 'static {
    move |event| {
        if let Some(path) = event.path() {
            println!("callback - {label} {}", path.display());
        }
        Ok(())
    }
}

fn clear_console() -> io::Result<()> {
    let mut out = io::stdout();
    execute!(
        out,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )?;
    out.flush()
}
